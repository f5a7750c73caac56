//! 单个样本的数据结构: 稠密标签图和通道优先的图像张量.

mod label;
mod save;
mod tensor;

pub use label::LabelMap;
pub use save::{ImgWriteRaw, ImgWriteVis};
pub use tensor::ImageTensor;

cfg_if::cfg_if! {
    if #[cfg(feature = "npy")] {
        mod npy;

        pub use npy::NpyWrite;
    }
}
