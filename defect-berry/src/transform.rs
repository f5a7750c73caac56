//! 图像变换. 把解码后的 RGB 图像转换为通道优先的 [`ImageTensor`].
//!
//! 变换只作用于图像, 不作用于掩膜. 改变空间尺寸的变换 (如 [`Resize`])
//! 需要配合 [`crate::dataset::ShapePolicy::ResizeNearest`] 使用,
//! 否则掩膜与张量形状不符时取样会失败.

use crate::consts::RGB_CHANNELS;
use crate::ImageTensor;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array3;

/// 纯函数式图像变换.
///
/// 实现必须是确定性的 (或在文档中说明其随机性), 并且输出张量的
/// (H, W) 决定标签图的形状.
pub trait Transform: Send + Sync {
    /// 对一张 RGB 图像做变换.
    fn apply(&self, img: &RgbImage) -> ImageTensor;
}

impl<F> Transform for F
where
    F: Fn(&RgbImage) -> ImageTensor + Send + Sync,
{
    #[inline]
    fn apply(&self, img: &RgbImage) -> ImageTensor {
        self(img)
    }
}

/// 默认变换: 转换为 (3, H, W), 像素值缩放到 `[0, 1]`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ToTensor;

impl Transform for ToTensor {
    fn apply(&self, img: &RgbImage) -> ImageTensor {
        let (width, height) = img.dimensions();
        let mut data = Array3::<f32>::zeros((RGB_CHANNELS, height as usize, width as usize));
        for (x, y, pix) in img.enumerate_pixels() {
            for (c, &v) in pix.0.iter().enumerate() {
                data[[c, y as usize, x as usize]] = f32::from(v) / 255.0;
            }
        }
        ImageTensor::from(data)
    }
}

/// 在 [`ToTensor`] 之后逐通道做 `(x - mean) / std`.
#[derive(Copy, Clone, Debug)]
pub struct Normalize {
    mean: [f32; RGB_CHANNELS],
    std: [f32; RGB_CHANNELS],
}

impl Normalize {
    /// 构建归一化变换. `std` 的任一分量不是正有限数时返回 `None`.
    pub fn new(mean: [f32; RGB_CHANNELS], std: [f32; RGB_CHANNELS]) -> Option<Self> {
        if std.iter().all(|s| s.is_finite() && *s > 0.0) && mean.iter().all(|m| m.is_finite()) {
            Some(Self { mean, std })
        } else {
            None
        }
    }

    /// ImageNet 统计量.
    #[inline]
    pub const fn imagenet() -> Self {
        Self {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

impl Transform for Normalize {
    fn apply(&self, img: &RgbImage) -> ImageTensor {
        let mut data = ToTensor.apply(img).into_array();
        for (c, mut channel) in data.outer_iter_mut().enumerate() {
            let (m, s) = (self.mean[c], self.std[c]);
            channel.mapv_inplace(|v| (v - m) / s);
        }
        ImageTensor::from(data)
    }
}

/// 双线性缩放到固定的 (高, 宽), 然后 [`ToTensor`].
#[derive(Copy, Clone, Debug)]
pub struct Resize {
    height: u32,
    width: u32,
}

impl Resize {
    /// 构建缩放变换. 任一边长为 0 时返回 `None`.
    pub fn new(height: u32, width: u32) -> Option<Self> {
        (height > 0 && width > 0).then_some(Self { height, width })
    }
}

impl Transform for Resize {
    fn apply(&self, img: &RgbImage) -> ImageTensor {
        if img.dimensions() == (self.width, self.height) {
            return ToTensor.apply(img);
        }
        let resized = imageops::resize(img, self.width, self.height, FilterType::Triangle);
        ToTensor.apply(&resized)
    }
}
