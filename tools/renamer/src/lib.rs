//! 批量重命名工具.
//!
//! 对若干目录中扩展名匹配的文件, 依次应用一组子串替换规则, 并就地改名.
//! 没有回滚: 中途失败时, 已完成的改名保持原样.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 参考数据中需要重命名的目录.
pub const DEFAULT_FOLDERS: [&str; 2] = ["Defect_Class0", "Defect_Class1"];

/// 参考数据中的替换规则.
pub const DEFAULT_RULES: [&str; 2] = ["defect0=powder", "defect1=printed"];

/// 参考数据中的图像扩展名.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// 重命名错误.
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    /// 规则不是 `old=new` 形式, 或 `old` 为空.
    #[error("invalid rule `{0}`, expected `old=new`")]
    InvalidRule(String),

    /// 目标文件已存在, 或已被本批次中先处理的文件占用.
    #[error("cannot rename `{from}`: `{to}` already exists")]
    Collision {
        /// 原文件.
        from: PathBuf,
        /// 已存在的目标文件.
        to: PathBuf,
    },

    /// 底层 I/O 错误.
    #[error("I/O error on `{path}`")]
    Io {
        /// 出错的路径.
        path: PathBuf,
        /// 底层错误.
        #[source]
        source: std::io::Error,
    },
}

/// 子串替换规则: 把文件名中所有 `from` 替换为 `to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    from: String,
    to: String,
}

impl Rule {
    /// 构建规则. `from` 为空时返回 `None`.
    pub fn new<S: Into<String>, T: Into<String>>(from: S, to: T) -> Option<Self> {
        let from = from.into();
        (!from.is_empty()).then(|| Self { from, to: to.into() })
    }
}

impl FromStr for Rule {
    type Err = RenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_once('=')
            .and_then(|(from, to)| Rule::new(from, to))
            .ok_or_else(|| RenameError::InvalidRule(s.to_owned()))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.from, self.to)
    }
}

/// 一次改名.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renamed {
    /// 原路径.
    pub from: PathBuf,
    /// 新路径.
    pub to: PathBuf,
}

/// 依次应用 `rules`. 后一条规则作用于前一条的结果.
pub fn rewrite(name: &str, rules: &[Rule]) -> String {
    rules
        .iter()
        .fold(name.to_owned(), |acc, r| acc.replace(&r.from, &r.to))
}

/// 文件名是否以 `.{ext}` 结尾 (区分大小写)?
fn has_extension(name: &str, exts: &[String]) -> bool {
    exts.iter().any(|ext| {
        name.strip_suffix(ext.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// 对 `folder` 中的文件按文件名顺序执行改名.
///
/// 文件名不含任何规则旧子串的文件保持不变. `dry_run` 为 `true` 时只返回计划,
/// 不改动文件系统. 两个文件改名后重名时, 试运行与实际运行都报告 [`RenameError::Collision`].
pub fn rename_in_folder(
    folder: &Path,
    rules: &[Rule],
    exts: &[String],
    dry_run: bool,
) -> Result<Vec<Renamed>, RenameError> {
    let io_err = |path: &Path| {
        let path = path.to_owned();
        move |source: std::io::Error| RenameError::Io { path, source }
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(folder).map_err(io_err(folder))? {
        let entry = entry.map_err(io_err(folder))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if entry.path().is_file() && has_extension(&name, exts) {
            names.push(name);
        }
    }
    names.sort_unstable();

    let mut done = Vec::new();
    let mut planned = HashSet::new();
    for name in names {
        let new_name = rewrite(&name, rules);
        if new_name == name {
            continue;
        }
        let from = folder.join(&name);
        let to = folder.join(&new_name);
        if to.exists() || !planned.insert(new_name) {
            return Err(RenameError::Collision { from, to });
        }
        if !dry_run {
            fs::rename(&from, &to).map_err(io_err(&from))?;
        }
        log::debug!("{} -> {}", from.display(), to.display());
        done.push(Renamed { from, to });
    }
    Ok(done)
}

/// 依次处理所有目录. 遇到第一个错误即停止.
pub fn rename_all<P: AsRef<Path>>(
    folders: &[P],
    rules: &[Rule],
    exts: &[String],
    dry_run: bool,
) -> Result<Vec<Renamed>, RenameError> {
    let mut all = Vec::new();
    for folder in folders {
        all.extend(rename_in_folder(folder.as_ref(), rules, exts, dry_run)?);
    }
    Ok(all)
}
