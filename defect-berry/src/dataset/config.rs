//! 数据集配置.
//!
//! 配置在数据集构造时一次性确定, 此后不可变.

use super::error::ConfigError;
use crate::consts::{MELTING_IMAGE_DIR, MELTING_MASK_DIRS};
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// 有序的 `源类别 -> 目标标签值` 映射表.
///
/// 源类别决定读哪个掩膜目录, 目标标签值是写进稠密标签图的整数.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassMapping {
    pairs: Vec<(u8, u8)>,
}

impl ClassMapping {
    /// 从 `(源类别, 目标值)` 序列构建. 不做校验, 校验在数据集构造时进行.
    pub fn from_pairs<I: IntoIterator<Item = (u8, u8)>>(it: I) -> Self {
        Self {
            pairs: it.into_iter().collect(),
        }
    }

    /// 源类别 `class` 的目标值. 未映射时返回 `None`.
    #[inline]
    pub fn get(&self, class: u8) -> Option<u8> {
        self.pairs
            .iter()
            .find_map(|&(src, dst)| (src == class).then_some(dst))
    }

    /// 源类别 `class` 是否已被映射?
    #[inline]
    pub fn contains(&self, class: u8) -> bool {
        self.get(class).is_some()
    }

    /// 映射条目数.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// 映射表是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 按配置顺序迭代 `(源类别, 目标值)`.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.pairs.iter().copied()
    }

    fn push(&mut self, class: u8, target: u8) {
        self.pairs.push((class, target));
    }

    /// 源类别唯一; 除非 `allow_merged_targets`, 目标值也唯一.
    fn validate(&self, allow_merged_targets: bool) -> Result<(), ConfigError> {
        if let Some(dup) = self.pairs.iter().map(|(src, _)| *src).duplicates().next() {
            return Err(ConfigError::DuplicateSource(dup));
        }
        if allow_merged_targets {
            return Ok(());
        }
        for (i, &(second, target)) in self.pairs.iter().enumerate() {
            if let Some(&(first, _)) = self.pairs[..i].iter().find(|(_, t)| *t == target) {
                return Err(ConfigError::CollidingTarget {
                    target,
                    first,
                    second,
                });
            }
        }
        Ok(())
    }
}

/// 源类别到掩膜目录的绑定.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskBinding {
    /// 源类别.
    pub class: u8,
    /// 掩膜目录. 相对路径以数据集根目录为基准.
    pub dir: PathBuf,
}

/// 多个掩膜在同一像素上重叠时的合并规则.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergePolicy {
    /// 按掩膜绑定顺序依次写入, 后写覆盖先写.
    #[default]
    LastWins,

    /// 第一个覆盖该像素的掩膜胜出. 映射到背景的掩膜同样会占据像素.
    FirstWins,
}

/// 掩膜与图像张量空间尺寸不一致时的处理规则.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapePolicy {
    /// 尺寸不一致时取样失败.
    #[default]
    Strict,

    /// 以最近邻插值把掩膜缩放到图像张量的 (高, 宽).
    ResizeNearest,
}

/// 数据集配置.
///
/// ```no_run
/// use defect_berry::dataset::{DatasetConfig, MergePolicy};
///
/// let config = DatasetConfig::new("/data/melt", "images")
///     .class(1, 1)
///     .class(2, 2)
///     .mask_dir(1, "porosity")
///     .mask_dir(2, "crack")
///     .merge_policy(MergePolicy::LastWins);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetConfig {
    root: PathBuf,
    image_dir: PathBuf,
    mapping: ClassMapping,
    masks: Vec<MaskBinding>,
    merge: MergePolicy,
    shape: ShapePolicy,
    extensions: Option<Vec<String>>,
    allow_merged_targets: bool,
}

impl DatasetConfig {
    /// 以根目录和图像目录构建一个空配置 (无类别, 无掩膜).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(root: P, image_dir: Q) -> Self {
        Self {
            root: root.as_ref().to_owned(),
            image_dir: image_dir.as_ref().to_owned(),
            mapping: ClassMapping::default(),
            masks: Vec::new(),
            merge: MergePolicy::default(),
            shape: ShapePolicy::default(),
            extensions: None,
            allow_merged_targets: false,
        }
    }

    /// 熔融缺陷数据的参考布局.
    ///
    /// 图像位于 `root/Img.After.Melting`; 源类别 `i` 绑定
    /// [`MELTING_MASK_DIRS`]`[i]`, 并映射到目标值 `i`.
    pub fn melting_layout<P: AsRef<Path>>(root: P) -> Self {
        MELTING_MASK_DIRS.iter().zip(0u8..).fold(
            Self::new(root, MELTING_IMAGE_DIR),
            |config, (dir, class)| config.class(class, class).mask_dir(class, dir),
        )
    }

    /// 追加一条类别映射.
    pub fn class(mut self, class: u8, target: u8) -> Self {
        self.mapping.push(class, target);
        self
    }

    /// 整体替换类别映射表.
    pub fn mapping(mut self, mapping: ClassMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// 追加一个掩膜目录绑定. 绑定顺序即合并顺序.
    pub fn mask_dir<P: AsRef<Path>>(mut self, class: u8, dir: P) -> Self {
        self.masks.push(MaskBinding {
            class,
            dir: dir.as_ref().to_owned(),
        });
        self
    }

    /// 设置合并规则.
    pub fn merge_policy(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }

    /// 设置尺寸不一致时的处理规则.
    pub fn shape_policy(mut self, shape: ShapePolicy) -> Self {
        self.shape = shape;
        self
    }

    /// 只把扩展名 (不区分大小写, 不含 `.`) 在 `exts` 中的文件视为图像.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(exts.into_iter().map(Into::into).collect());
        self
    }

    /// 允许多个源类别映射到同一个目标值 (有意合并类别).
    pub fn allow_merged_targets(mut self, allow: bool) -> Self {
        self.allow_merged_targets = allow;
        self
    }

    /// 数据集根目录.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 图像目录的完整路径.
    #[inline]
    pub fn image_path(&self) -> PathBuf {
        self.root.join(&self.image_dir)
    }

    /// 类别映射表.
    #[inline]
    pub fn class_mapping(&self) -> &ClassMapping {
        &self.mapping
    }

    /// 按合并顺序排列的掩膜绑定.
    #[inline]
    pub fn mask_bindings(&self) -> &[MaskBinding] {
        &self.masks
    }

    /// 合并规则.
    #[inline]
    pub fn merge(&self) -> MergePolicy {
        self.merge
    }

    /// 尺寸规则.
    #[inline]
    pub fn shape(&self) -> ShapePolicy {
        self.shape
    }

    /// 文件名 `name` 是否通过扩展名过滤?
    pub fn accepts(&self, name: &str) -> bool {
        let Some(exts) = &self.extensions else {
            return true;
        };
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        exts.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// 校验配置. 不访问文件系统.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mapping.validate(self.allow_merged_targets)?;
        if let Some(dup) = self.masks.iter().map(|b| b.class).duplicates().next() {
            return Err(ConfigError::DuplicateBinding(dup));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MELTING_NUM_CLASSES;

    #[test]
    fn test_melting_layout() {
        let c = DatasetConfig::melting_layout("/data");
        assert_eq!(c.image_path(), PathBuf::from("/data/Img.After.Melting"));
        assert_eq!(c.class_mapping().len(), MELTING_NUM_CLASSES);
        assert_eq!(c.mask_bindings().len(), MELTING_NUM_CLASSES);
        assert_eq!(c.mask_bindings()[3].class, 3);
        assert_eq!(c.mask_bindings()[3].dir, PathBuf::from("Defect_Class9"));
        assert_eq!(c.class_mapping().get(5), Some(5));
        assert_eq!(c.class_mapping().get(6), None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_duplicate_source() {
        let c = DatasetConfig::new("r", "i").class(1, 1).class(2, 2).class(1, 3);
        assert_eq!(c.validate(), Err(ConfigError::DuplicateSource(1)));
    }

    #[test]
    fn test_colliding_target() {
        let c = DatasetConfig::new("r", "i").class(1, 7).class(2, 3).class(4, 7);
        assert_eq!(
            c.validate(),
            Err(ConfigError::CollidingTarget {
                target: 7,
                first: 1,
                second: 4
            })
        );
        assert!(c.allow_merged_targets(true).validate().is_ok());
    }

    #[test]
    fn test_duplicate_binding() {
        let c = DatasetConfig::new("r", "i")
            .class(1, 1)
            .mask_dir(1, "a")
            .mask_dir(1, "b");
        assert_eq!(c.validate(), Err(ConfigError::DuplicateBinding(1)));
    }

    #[test]
    fn test_extension_filter() {
        let c = DatasetConfig::new("r", "i");
        assert!(c.accepts("anything"));

        let c = c.extensions(["png", "JPG"]);
        assert!(c.accepts("a.png"));
        assert!(c.accepts("a.PNG"));
        assert!(c.accepts("b.c.jpg"));
        assert!(!c.accepts("a.tif"));
        assert!(!c.accepts("png"));
    }
}
