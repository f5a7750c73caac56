//! `.npy` 导出.

use super::{ImageTensor, LabelMap};
use ndarray_npy::{write_npy, WriteNpyError};
use std::path::Path;

/// 表明一个可以写成 numpy `.npy` 文件的对象.
pub trait NpyWrite {
    /// 写入 `path`. 已有文件会被覆盖.
    fn write_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteNpyError>;
}

/// 以 `uint8`, 形状 (H, W) 写出.
impl NpyWrite for LabelMap {
    fn write_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteNpyError> {
        write_npy(path, &self.array_view())
    }
}

/// 以 `float32`, 形状 (C, H, W) 写出.
impl NpyWrite for ImageTensor {
    fn write_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteNpyError> {
        write_npy(path, &self.array_view())
    }
}
