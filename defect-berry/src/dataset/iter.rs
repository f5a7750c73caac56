use super::defect::{DefectDataset, Sample};
use super::error::LoadResult;
use crate::transform::Transform;
use std::ops::Range;

/// 按索引序逐个取样的迭代器.
///
/// 每一项为 `(索引, 取样结果)`. 单个样本失败不会中断迭代.
#[derive(Debug)]
pub struct SampleIter<'a, T> {
    dataset: &'a DefectDataset<T>,
    range: Range<usize>,
}

impl<'a, T> SampleIter<'a, T> {
    #[inline]
    pub(crate) fn new(dataset: &'a DefectDataset<T>) -> Self {
        Self {
            dataset,
            range: 0..dataset.len(),
        }
    }
}

impl<T: Transform> Iterator for SampleIter<'_, T> {
    type Item = (usize, LoadResult<Sample>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.range.next()?;
        Some((idx, self.dataset.get(idx)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<T: Transform> ExactSizeIterator for SampleIter<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.range.len()
    }
}
