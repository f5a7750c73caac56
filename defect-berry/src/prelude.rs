//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx2d;

pub use crate::data::{ImageTensor, ImgWriteRaw, ImgWriteVis, LabelMap};

#[cfg(feature = "npy")]
pub use crate::data::NpyWrite;

pub use crate::consts::gray::BACKGROUND;
pub use crate::consts::{MELTING_IMAGE_DIR, MELTING_MASK_DIRS, MELTING_NUM_CLASSES};

pub use crate::dataset::home_dataset_dir_with;
pub use crate::dataset::{
    self, ClassMapping, ConfigWarning, DatasetConfig, DefectDataset, LoadError, LoadResult,
    MergePolicy, Sample, ShapePolicy,
};

pub use crate::transform::{Normalize, Resize, ToTensor, Transform};
