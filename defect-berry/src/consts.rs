//! 通用常量.

/// 单通道颜色.
pub mod gray {
    /// 稠密标签图中, 未被任何掩膜覆盖的像素值.
    pub const BACKGROUND: u8 = 0;

    /// 单通道黑色.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道白色.
    pub const WHITE: u8 = 0b_1111_1111;

    /// 像素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        matches!(p, BACKGROUND)
    }

    /// 掩膜像素是否表示 "该类存在"? 任何非零灰度都算.
    #[inline]
    pub const fn is_marked(p: u8) -> bool {
        p > 0
    }
}

/// 熔融后图像目录名 (参考数据布局).
pub const MELTING_IMAGE_DIR: &str = "Img.After.Melting";

/// 参考数据布局中的掩膜目录名. 数组下标即源类别编号.
pub const MELTING_MASK_DIRS: [&str; 6] = [
    "Defect_Class0",
    "Defect_Class5",
    "Defect_Class8",
    "Defect_Class9",
    "Defect_Class10",
    "Defect_Class11",
];

/// 参考数据布局的类别数 (含背景).
pub const MELTING_NUM_CLASSES: usize = MELTING_MASK_DIRS.len();

/// 图像张量的通道数. 所有图像在变换前都被转换为 RGB.
pub const RGB_CHANNELS: usize = 3;
