//! 数据集运行时错误和配置诊断.

use std::fmt;
use std::path::PathBuf;

/// 配置不合法. 数据集构造时检出, 构造失败.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// 类别映射表中同一个源类别出现了多次.
    #[error("类别映射表中源类别 {0} 重复")]
    DuplicateSource(u8),

    /// 同一个源类别绑定了多个掩膜目录.
    #[error("源类别 {0} 绑定了多个掩膜目录")]
    DuplicateBinding(u8),

    /// 两个源类别被映射到同一个目标值, 但配置未允许合并类别.
    #[error("源类别 {first} 和 {second} 都映射到目标值 {target}, 但未允许合并类别")]
    CollidingTarget {
        /// 冲突的目标值.
        target: u8,
        /// 先出现的源类别.
        first: u8,
        /// 后出现的源类别.
        second: u8,
    },

    /// 图像目录不存在或不是目录.
    #[error("图像目录 `{0}` 不存在或不是目录")]
    NotADirectory(PathBuf),

    /// 掩膜目录路径存在, 但不是目录.
    #[error("源类别 {class} 的掩膜路径 `{path}` 存在但不是目录")]
    MaskNotADirectory {
        /// 源类别.
        class: u8,
        /// 出错的路径.
        path: PathBuf,
    },
}

/// 数据集构造或取样失败.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// 配置不合法.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 列目录或探测文件是否存在时发生的底层 I/O 错误.
    #[error("访问 `{path}` 时发生 I/O 错误")]
    Io {
        /// 出错的路径.
        path: PathBuf,
        /// 底层错误.
        #[source]
        source: std::io::Error,
    },

    /// 索引越界. 合法范围为 `[0, len)`.
    #[error("索引 {index} 越界, 数据集大小为 {len}")]
    OutOfBounds {
        /// 请求的索引.
        index: usize,
        /// 数据集大小.
        len: usize,
    },

    /// 图像或掩膜文件缺失、不可读或不是合法图像.
    #[error("无法解码 `{path}`")]
    Decode {
        /// 出错的文件.
        path: PathBuf,
        /// 底层错误.
        #[source]
        source: image::ImageError,
    },

    /// 掩膜的 (高, 宽) 与图像张量不一致.
    #[error("掩膜 `{path}` 形状为 {found:?}, 图像张量形状为 {expected:?}")]
    ShapeMismatch {
        /// 出错的掩膜文件.
        path: PathBuf,
        /// 图像张量的 (高, 宽).
        expected: (usize, usize),
        /// 掩膜的 (高, 宽).
        found: (usize, usize),
    },
}

/// 数据集构造或取样结果.
pub type LoadResult<T> = Result<T, LoadError>;

/// 配置一致性警告: 某掩膜目录绑定的源类别不在类别映射表中.
///
/// 这不是错误. 该类别的像素永远不会被写入标签图.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigWarning {
    /// 未映射的源类别.
    pub class: u8,
    /// 该类别绑定的掩膜目录.
    pub dir: PathBuf,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class {} (mask dir `{}`) is not in the class mapping; its pixels are ignored",
            self.class,
            self.dir.display()
        )
    }
}
