//! 对 `defect-berry::dataset` 的更一层封装. 提供更直接的数据集加载器.

use defect_berry::dataset::{DatasetConfig, DefectDataset, LoadResult};
use std::env;
use std::path::{Path, PathBuf};

/// 数据集根目录的环境变量名.
pub const ROOT_ENV: &str = "DEFECT_DATASET_DIR";

/// 获取熔融缺陷数据集根目录.
///
/// 1. 若环境变量 `$DEFECT_DATASET_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/defect`.
///
/// 两者都无法确定时返回 `None`.
pub fn root_dir_from_env_or_home() -> Option<PathBuf> {
    match env::var(ROOT_ENV) {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => defect_berry::dataset::home_dataset_dir_with(["defect"]),
    }
}

/// 以参考布局打开 `root` 下的数据集.
pub fn melting_dataset<P: AsRef<Path>>(root: P) -> LoadResult<DefectDataset> {
    DefectDataset::open(DatasetConfig::melting_layout(root))
}

/// 把 `root` 下的相对目录名列表展开为完整路径.
pub fn dirs_under<P: AsRef<Path>, S: AsRef<Path>>(root: P, names: &[S]) -> Vec<PathBuf> {
    names.iter().map(|n| root.as_ref().join(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_under() {
        let v = dirs_under("/r", &["a", "b"]);
        assert_eq!(v, vec![PathBuf::from("/r/a"), PathBuf::from("/r/b")]);
    }

    #[test]
    fn test_missing_layout() {
        let temp = tempfile::tempdir().unwrap();
        assert!(melting_dataset(temp.path()).is_err());
    }
}
