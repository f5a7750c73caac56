//! 把逐类二值掩膜合成为稠密标签图.

use super::config::{MergePolicy, ShapePolicy};
use super::error::{LoadError, LoadResult};
use crate::consts::gray::is_marked;
use crate::{Idx2d, LabelMap};
use image::imageops::{self, FilterType};
use image::GrayImage;
use ndarray::Array2;
use std::path::Path;

/// 合成中的标签图.
///
/// `claimed` 只在 [`MergePolicy::FirstWins`] 下存在, 记录哪些像素已被某个掩膜占据.
pub(crate) struct Canvas {
    label: LabelMap,
    claimed: Option<Array2<bool>>,
}

impl Canvas {
    /// 全背景画布.
    pub(crate) fn new(shape: Idx2d, policy: MergePolicy) -> Self {
        let claimed = match policy {
            MergePolicy::LastWins => None,
            MergePolicy::FirstWins => Some(Array2::from_elem(shape, false)),
        };
        Self {
            label: LabelMap::background(shape),
            claimed,
        }
    }

    /// 把 `mask` 中所有非零像素写为 `target`.
    ///
    /// `mask` 的尺寸必须已与画布一致, 多出的部分会被忽略.
    pub(crate) fn paint(&mut self, mask: &GrayImage, target: u8) {
        for (x, y, pix) in mask.enumerate_pixels() {
            if !is_marked(pix.0[0]) {
                continue;
            }
            let pos = (y as usize, x as usize);
            if let Some(claimed) = self.claimed.as_mut() {
                match claimed.get_mut(pos) {
                    Some(c) if !*c => *c = true,
                    _ => continue,
                }
            }
            if let Some(cell) = self.label.get_mut(pos) {
                *cell = target;
            }
        }
    }

    #[inline]
    pub(crate) fn finish(self) -> LabelMap {
        self.label
    }
}

/// 按 `policy` 让掩膜的 (高, 宽) 与 `shape` 一致.
pub(crate) fn fit_mask(
    mask: GrayImage,
    shape: Idx2d,
    policy: ShapePolicy,
    path: &Path,
) -> LoadResult<GrayImage> {
    let (width, height) = mask.dimensions();
    let found = (height as usize, width as usize);
    if found == shape {
        return Ok(mask);
    }
    match policy {
        ShapePolicy::Strict => Err(LoadError::ShapeMismatch {
            path: path.to_owned(),
            expected: shape,
            found,
        }),
        ShapePolicy::ResizeNearest => Ok(imageops::resize(
            &mask,
            shape.1 as u32,
            shape.0 as u32,
            FilterType::Nearest,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use ndarray::array;

    /// 2x3 掩膜, `on` 中的 (高, 宽) 位置为 255.
    fn mask(on: &[Idx2d]) -> GrayImage {
        GrayImage::from_fn(3, 2, |x, y| {
            if on.contains(&(y as usize, x as usize)) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_last_wins() {
        let mut c = Canvas::new((2, 3), MergePolicy::LastWins);
        c.paint(&mask(&[(0, 0), (0, 1)]), 1);
        c.paint(&mask(&[(0, 1), (1, 2)]), 2);
        assert_eq!(c.finish(), LabelMap::from(array![[1, 2, 0], [0, 0, 2]]));
    }

    #[test]
    fn test_first_wins() {
        let mut c = Canvas::new((2, 3), MergePolicy::FirstWins);
        c.paint(&mask(&[(0, 0), (0, 1)]), 1);
        c.paint(&mask(&[(0, 1), (1, 2)]), 2);
        assert_eq!(c.finish(), LabelMap::from(array![[1, 1, 0], [0, 0, 2]]));
    }

    #[test]
    fn test_first_wins_background_claims() {
        let mut c = Canvas::new((2, 3), MergePolicy::FirstWins);
        c.paint(&mask(&[(1, 1)]), 0);
        c.paint(&mask(&[(1, 1), (1, 0)]), 4);
        assert_eq!(c.finish(), LabelMap::from(array![[0, 0, 0], [4, 0, 0]]));
    }

    #[test]
    fn test_any_nonzero_marks() {
        let m = GrayImage::from_raw(3, 2, vec![0, 1, 127, 128, 255, 0]).unwrap();
        let mut c = Canvas::new((2, 3), MergePolicy::LastWins);
        c.paint(&m, 3);
        assert_eq!(c.finish(), LabelMap::from(array![[0, 3, 3], [3, 3, 0]]));
    }

    #[test]
    fn test_fit_mask() {
        let p = Path::new("m.png");
        let m = mask(&[(0, 0)]);
        assert_eq!(fit_mask(m.clone(), (2, 3), ShapePolicy::Strict, p).unwrap(), m);

        let err = fit_mask(m.clone(), (4, 6), ShapePolicy::Strict, p).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ShapeMismatch {
                expected: (4, 6),
                found: (2, 3),
                ..
            }
        ));

        let big = fit_mask(m, (4, 6), ShapePolicy::ResizeNearest, p).unwrap();
        assert_eq!(big.dimensions(), (6, 4));
        assert_eq!(big.get_pixel(0, 0).0, [255]);
        assert_eq!(big.get_pixel(5, 3).0, [0]);
    }
}
