//! 按需合成标签的缺陷分割数据集.

use super::config::{DatasetConfig, MaskBinding};
use super::error::{ConfigError, ConfigWarning, LoadError, LoadResult};
use super::iter::SampleIter;
use super::merge::{fit_mask, Canvas};
use crate::transform::{ToTensor, Transform};
use crate::{Idx2d, ImageTensor, LabelMap};
use image::io::Reader;
use image::{DynamicImage, ImageError};
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// 一次取样的结果.
#[derive(Clone, Debug)]
pub struct Sample {
    /// 样本身份, 即图像文件名.
    pub identity: String,

    /// 变换后的图像张量 (C, H, W).
    pub image: ImageTensor,

    /// 稠密标签图 (H, W).
    pub label: LabelMap,

    /// 本次取样中遇到的配置一致性警告. 每个存在掩膜文件但未映射的类别恰好一条.
    pub warnings: Vec<ConfigWarning>,
}

impl Sample {
    /// 拆成 `(图像张量, 标签图)`.
    #[inline]
    pub fn into_pair(self) -> (ImageTensor, LabelMap) {
        (self.image, self.label)
    }
}

/// 解析后的掩膜绑定.
struct MaskSource {
    class: u8,
    dir: PathBuf,

    /// 映射后的目标值. `None` 表示该类别未映射.
    target: Option<u8>,

    /// 未映射警告是否已写入日志.
    warned: AtomicBool,
}

impl MaskSource {
    fn warning(&self) -> ConfigWarning {
        ConfigWarning {
            class: self.class,
            dir: self.dir.clone(),
        }
    }

    fn warn_once(&self) {
        if !self.warned.swap(true, Ordering::Relaxed) {
            warn!("{}", self.warning());
        }
    }
}

/// 多类别缺陷语义分割数据集.
///
/// 构造时列一次图像目录并按文件名字典序排序, 此后索引 `i` 恒对应同一个身份.
/// 每个身份的标签图在取样时由各类别的稀疏掩膜目录现场合成, 不缓存.
///
/// 数据集在构造后没有可变的共享状态 (除了只影响日志的警告标记),
/// 因此可以在多个线程中并发取样.
///
/// # 注意
///
/// 1. 身份集合只由图像目录决定; 掩膜目录中多出的文件永远不会被读取.
/// 2. 某类别的掩膜文件不存在, 表示该图像中没有该类别, 不是错误.
pub struct DefectDataset<T = ToTensor> {
    config: DatasetConfig,
    image_dir: PathBuf,
    masks: Vec<MaskSource>,
    identities: Vec<String>,
    transform: T,
}

impl<T> fmt::Debug for DefectDataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefectDataset")
            .field("image_dir", &self.image_dir)
            .field("len", &self.identities.len())
            .field("masks", &self.masks.len())
            .finish_non_exhaustive()
    }
}

impl DefectDataset<ToTensor> {
    /// 以默认变换 [`ToTensor`] 打开数据集.
    #[inline]
    pub fn open(config: DatasetConfig) -> LoadResult<Self> {
        Self::with_transform(config, ToTensor)
    }
}

impl<T: Transform> DefectDataset<T> {
    /// 以指定变换打开数据集.
    ///
    /// 校验配置, 并列出图像目录作为身份快照. 配置非法、图像目录不存在
    /// 或无法列出时返回 `Err`. 掩膜目录不存在只记录警告;
    /// 掩膜路径存在但不是目录时返回 [`ConfigError::MaskNotADirectory`].
    pub fn with_transform(config: DatasetConfig, transform: T) -> LoadResult<Self> {
        config.validate()?;

        let image_dir = config.image_path();
        if !image_dir.is_dir() {
            return Err(ConfigError::NotADirectory(image_dir).into());
        }
        let identities = list_identities(&config, &image_dir)?;
        debug!(
            "found {} images in `{}`",
            identities.len(),
            image_dir.display()
        );

        let masks = config
            .mask_bindings()
            .iter()
            .map(|MaskBinding { class, dir }| -> LoadResult<MaskSource> {
                let dir = config.root().join(dir);
                match fs::metadata(&dir) {
                    Ok(meta) if !meta.is_dir() => {
                        return Err(ConfigError::MaskNotADirectory {
                            class: *class,
                            path: dir,
                        }
                        .into());
                    }
                    Ok(_) => {}
                    Err(_) => warn!(
                        "mask directory `{}` for class {class} does not exist",
                        dir.display()
                    ),
                }
                Ok(MaskSource {
                    class: *class,
                    dir,
                    target: config.class_mapping().get(*class),
                    warned: AtomicBool::new(false),
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(Self {
            config,
            image_dir,
            masks,
            identities,
            transform,
        })
    }

    /// 获取第 `index` 个样本.
    ///
    /// 1. 索引越界时返回 [`LoadError::OutOfBounds`].
    /// 2. 图像缺失或无法解码时返回 [`LoadError::Decode`]; 不会用空白图像代替.
    /// 3. 存在但无法解码的掩膜同样返回 [`LoadError::Decode`].
    /// 4. 要么返回完整合成的样本, 要么返回错误, 没有部分结果.
    pub fn get(&self, index: usize) -> LoadResult<Sample> {
        let identity = self
            .identities
            .get(index)
            .ok_or(LoadError::OutOfBounds {
                index,
                len: self.len(),
            })?;

        let image = decode(&self.image_dir.join(identity))?.to_rgb8();
        let image = self.transform.apply(&image);
        let (label, warnings) = self.compose(identity, image.spatial_shape())?;

        Ok(Sample {
            identity: identity.clone(),
            image,
            label,
            warnings,
        })
    }

    /// 按合并顺序把 `identity` 的各类掩膜写进形状为 `shape` 的全背景标签图.
    fn compose(&self, identity: &str, shape: Idx2d) -> LoadResult<(LabelMap, Vec<ConfigWarning>)> {
        let mut canvas = Canvas::new(shape, self.config.merge());
        let mut warnings = Vec::new();

        for mask in self.masks.iter() {
            let path = mask.dir.join(identity);
            if !probe(&path)? {
                continue;
            }
            let gray = decode(&path)?.to_luma8();

            let Some(target) = mask.target else {
                mask.warn_once();
                warnings.push(mask.warning());
                continue;
            };
            let gray = fit_mask(gray, shape, self.config.shape(), &path)?;
            canvas.paint(&gray, target);
        }
        Ok((canvas.finish(), warnings))
    }

    /// 按索引序迭代所有样本.
    #[inline]
    pub fn iter(&self) -> SampleIter<'_, T> {
        SampleIter::new(self)
    }
}

impl<T> DefectDataset<T> {
    /// 样本个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// 数据集是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// 第 `index` 个样本的身份. 越界时返回 `None`.
    #[inline]
    pub fn identity(&self, index: usize) -> Option<&str> {
        self.identities.get(index).map(String::as_str)
    }

    /// 按索引序排列的全部身份.
    #[inline]
    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    /// 身份 `name` 对应的索引.
    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.identities
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }

    /// 构造所用的配置.
    #[inline]
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// 所有绑定了掩膜目录却未出现在类别映射表中的类别.
    ///
    /// 这是配置的静态性质, 与具体样本无关.
    pub fn config_warnings(&self) -> Vec<ConfigWarning> {
        self.masks
            .iter()
            .filter(|m| m.target.is_none())
            .map(MaskSource::warning)
            .collect()
    }
}

/// 列出 `dir` 下的普通文件名, 按字典序排序.
fn list_identities(config: &DatasetConfig, dir: &Path) -> LoadResult<Vec<String>> {
    let io_err = |source: std::io::Error| LoadError::Io {
        path: dir.to_owned(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if config.accepts(&name) => names.push(name),
            Ok(_) => {}
            Err(name) => warn!("skipping non UTF-8 file name {name:?} in `{}`", dir.display()),
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// 探测 `path` 是否为已存在的文件. 不存在不是错误.
fn probe(path: &Path) -> LoadResult<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(LoadError::Io {
            path: path.to_owned(),
            source,
        }),
    }
}

/// 按文件内容 (而非扩展名) 判断格式并解码.
fn decode(path: &Path) -> LoadResult<DynamicImage> {
    let wrap = |source: ImageError| LoadError::Decode {
        path: path.to_owned(),
        source,
    };
    Reader::open(path)
        .and_then(Reader::with_guessed_format)
        .map_err(|e| wrap(ImageError::IoError(e)))?
        .decode()
        .map_err(wrap)
}
