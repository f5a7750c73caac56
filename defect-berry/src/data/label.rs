use crate::consts::gray::*;
use crate::Idx2d;
use ndarray::iter::Iter;
use ndarray::{Array2, ArrayView2, Ix2};
use std::collections::BTreeMap;
use std::ops::Index;

/// 拥有所有权的二维稠密多类别标签图.
///
/// 每个像素恰好存放一个标签值: 要么是某个类别映射后的目标值,
/// 要么是背景 [`BACKGROUND`]. 形状为 (高, 宽), 与对应图像张量的空间尺寸一致.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelMap {
    data: Array2<u8>,
}

impl Index<Idx2d> for LabelMap {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl From<Array2<u8>> for LabelMap {
    #[inline]
    fn from(data: Array2<u8>) -> Self {
        Self { data }
    }
}

impl LabelMap {
    /// 创建给定形状 (高, 宽) 的全背景标签图.
    #[inline]
    pub fn background(shape: Idx2d) -> Self {
        Self {
            data: Array2::from_elem(shape, BACKGROUND),
        }
    }

    /// 获得 **底层** 数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<u8> {
        self.data.view()
    }

    /// 交出底层数组.
    #[inline]
    pub fn into_array(self) -> Array2<u8> {
        self.data
    }

    /// 获取可以迭代图像像素的迭代器.
    #[inline]
    pub fn iter(&self) -> Iter<'_, u8, Ix2> {
        self.data.iter()
    }

    /// 以行优先规则, 获取能迭代图像所有 `(索引, 像素值)` 的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Idx2d, &u8)> {
        self.data.indexed_iter()
    }

    /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&u8> {
        self.data.get(pos)
    }

    /// 获取给定位置 (高, 宽) 的像素值, 并可就地修改. 越界时返回 `None`.
    #[inline]
    pub(crate) fn get_mut(&mut self, pos: Idx2d) -> Option<&mut u8> {
        self.data.get_mut(pos)
    }

    /// 图像的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获得图像的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// 获得图像的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// 图像的像素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 该图是否为全背景图?
    #[inline]
    pub fn is_background(&self) -> bool {
        self.data.iter().copied().all(is_background)
    }

    /// 统计图像中值为 `label` 的像素总个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|&p| *p == label).count()
    }

    /// 按标签值统计像素个数. 只包含实际出现过的标签值, 按值升序.
    pub fn histogram(&self) -> BTreeMap<u8, usize> {
        let mut ans = BTreeMap::new();
        for &pix in self.data.iter() {
            *ans.entry(pix).or_insert(0usize) += 1;
        }
        ans
    }

    /// 转换为 `i64` 标签图, 便于直接喂给以长整型为类别索引的损失函数.
    pub fn to_long(&self) -> Array2<i64> {
        self.data.mapv(i64::from)
    }

    /// 将图像转化为行优先的序列化存储.
    pub fn as_row_major_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size());
        buf.extend(self.iter());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::LabelMap;
    use ndarray::array;

    #[test]
    fn test_background_map() {
        let m = LabelMap::background((3, 4));
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.height(), 3);
        assert_eq!(m.width(), 4);
        assert!(m.is_background());
        assert_eq!(m.count(0), 12);
        assert_eq!(m.histogram().into_iter().collect::<Vec<_>>(), vec![(0, 12)]);
    }

    #[test]
    fn test_statistics() {
        let m = LabelMap::from(array![[0, 1, 1], [2, 0, 5]]);
        assert!(!m.is_background());
        assert_eq!(m.count(1), 2);
        assert_eq!(m.count(3), 0);
        assert_eq!(
            m.histogram().into_iter().collect::<Vec<_>>(),
            vec![(0, 2), (1, 2), (2, 1), (5, 1)]
        );
        assert_eq!(m[(1, 2)], 5);
        assert_eq!(m.get((2, 0)), None);
        assert_eq!(m.as_row_major_vec(), vec![0, 1, 1, 2, 0, 5]);
    }

    #[test]
    fn test_to_long() {
        let m = LabelMap::from(array![[0, 255], [3, 4]]);
        assert_eq!(m.to_long(), array![[0i64, 255], [3, 4]]);
    }
}
