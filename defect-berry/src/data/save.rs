//! 标签图的持久化存储.

use super::LabelMap;
use image::ImageResult;
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// 标签图中的类别值通常很小 (0, 1, 2, ...), 直接保存时肉眼几乎看不出区别.
/// 该 trait 在保存时把它们拉伸到易区分的灰度.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 表明一个可以通过 **按原样** 模式持久化存储的图像对象.
///
/// 按原样保存的标签图可以再次作为单类掩膜或多类标签读入.
pub trait ImgWriteRaw {
    /// 按原样将图片保存到 `path` 路径.
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 相邻类别之间的灰度间隔.
const VIS_STEP: u16 = 40;

/// 使像素更有利于单通道可视化.
#[inline]
pub(crate) fn pretty(label: u8) -> u8 {
    use crate::consts::gray::*;
    match label {
        // 背景为黑色
        BACKGROUND => BLACK,

        // 超出可区分范围的类别一律为白色
        v => (u16::from(v) * VIS_STEP).min(u16::from(WHITE)) as u8,
    }
}

impl LabelMap {
    fn to_gray_image(&self, f: impl Fn(u8) -> u8) -> image::GrayImage {
        let (height, width) = self.shape();
        let mut buf = image::GrayImage::new(width as u32, height as u32);
        for ((h, w), &pix) in self.indexed_iter() {
            buf.put_pixel(w as u32, h as u32, image::Luma([f(pix)]));
        }
        buf
    }
}

/// 背景为黑色, 类别 `v` 映射为灰度 `40 * v` (至多为白色).
impl ImgWriteVis for LabelMap {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray_image(pretty).save(path)
    }
}

/// 按原样存储.
impl ImgWriteRaw for LabelMap {
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray_image(|p| p).save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::gray::{BLACK, WHITE};
    use ndarray::array;

    #[test]
    fn test_pretty() {
        assert_eq!(pretty(0), BLACK);
        assert_eq!(pretty(1), 40);
        assert_eq!(pretty(5), 200);
        assert_eq!(pretty(6), 240);
        assert_eq!(pretty(7), WHITE);
        assert_eq!(pretty(255), WHITE);
    }

    #[test]
    fn test_save_raw_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.png");
        let m = LabelMap::from(array![[0, 1, 2], [3, 4, 5]]);
        m.save_raw(&path).unwrap();

        let back = image::open(&path).unwrap().to_luma8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [5]);
        assert_eq!(back.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_save_vis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vis.png");
        let m = LabelMap::from(array![[0, 1], [2, 9]]);
        m.save(&path).unwrap();

        let back = image::open(&path).unwrap().to_luma8();
        assert_eq!(back.get_pixel(1, 0).0, [40]);
        assert_eq!(back.get_pixel(0, 1).0, [80]);
        assert_eq!(back.get_pixel(1, 1).0, [WHITE]);
    }
}
