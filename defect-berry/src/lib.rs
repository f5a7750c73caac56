#![warn(missing_docs)]

//! 核心库. 从 "每个缺陷类别一个稀疏掩膜目录" 的数据布局中, 按需为每张图像
//! 合成一张互斥的稠密多类别标签图.
//!
//! # 数据布局
//!
//! ```text
//! <root>/
//!   <图像目录>/            每个身份一个文件, 如 "image001.png"
//!   <类别 0 掩膜目录>/     仅当图像含有类别 0 时才存在同名文件
//!   <类别 1 掩膜目录>/
//!   ...
//! ```
//!
//! 掩膜文件与图像文件同名, 解码为单通道灰度图, 任何非零像素都表示该类别存在.
//!
//! # 约定
//!
//! 1. 身份集合只由图像目录的列表决定, 构造时按文件名字典序排序, 此后不再扫描.
//! 2. 掩膜文件不存在表示该类别不存在, 不是错误.
//! 3. 合并顺序即掩膜绑定的配置顺序, 重叠像素的归属由 [`dataset::MergePolicy`] 决定.
//! 4. 绑定了掩膜目录但不在类别映射表中的类别只产生 [`dataset::ConfigWarning`],
//!   其像素永远不会写入标签图.
//! 5. 掩膜与图像张量尺寸不一致时的行为由 [`dataset::ShapePolicy`] 决定,
//!   默认取样失败.
//!
//! # Features
//!
//! - `npy`: 通过 [`NpyWrite`] 导出 `.npy` 文件.
//! - `serde`: 为配置与数据结构派生 `Serialize`/`Deserialize`.

/// 二维索引 (高, 宽).
pub type Idx2d = (usize, usize);

mod data;

pub use data::{ImageTensor, ImgWriteRaw, ImgWriteVis, LabelMap};

#[cfg(feature = "npy")]
pub use data::NpyWrite;

pub mod consts;

pub mod dataset;

pub mod transform;

pub mod prelude;
