use crate::Idx2d;
use ndarray::{Array3, ArrayView3, Axis};

/// 通道优先 (C, H, W) 的 `f32` 图像张量.
///
/// 由 [`crate::transform::Transform`] 产出. 标签图的形状取自该张量的 (H, W).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageTensor {
    data: Array3<f32>,
}

impl From<Array3<f32>> for ImageTensor {
    #[inline]
    fn from(data: Array3<f32>) -> Self {
        Self { data }
    }
}

impl ImageTensor {
    /// 获得底层数据的不可变视图.
    #[inline]
    pub fn array_view(&self) -> ArrayView3<f32> {
        self.data.view()
    }

    /// 交出底层数组.
    #[inline]
    pub fn into_array(self) -> Array3<f32> {
        self.data
    }

    /// 张量形状 (通道, 高, 宽).
    #[inline]
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// 通道数.
    #[inline]
    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// 图像的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// 图像的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// 空间分辨率 (高, 宽).
    #[inline]
    pub fn spatial_shape(&self) -> Idx2d {
        (self.height(), self.width())
    }
}
