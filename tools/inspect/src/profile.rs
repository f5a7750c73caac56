//! 检查结果.

use defect_berry::dataset::{ConfigWarning, Sample};
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};

/// 单个标签值的统计.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassStat {
    /// 含有该标签值的图像数.
    pub images: usize,
    /// 该标签值的像素总数.
    pub pixels: usize,
}

/// 整个数据集的统计结果. 可以分片统计后合并.
#[derive(Debug, Default)]
pub struct Profile {
    images: usize,
    classes: BTreeMap<u8, ClassStat>,
    warnings: HashSet<ConfigWarning>,
    failures: Vec<(String, String)>,
}

impl Profile {
    /// 记录一个成功的样本.
    pub fn record(&mut self, sample: &Sample) {
        self.images += 1;
        for (label, pixels) in sample.label.histogram() {
            let stat = self.classes.entry(label).or_default();
            stat.images += 1;
            stat.pixels += pixels;
        }
        self.warnings.extend(sample.warnings.iter().cloned());
    }

    /// 记录一个失败的样本.
    pub fn fail(&mut self, identity: String, reason: String) {
        self.failures.push((identity, reason));
    }

    /// 合并两份统计.
    pub fn merge(mut self, other: Self) -> Self {
        self.images += other.images;
        for (label, stat) in other.classes {
            let s = self.classes.entry(label).or_default();
            s.images += stat.images;
            s.pixels += stat.pixels;
        }
        self.warnings.extend(other.warnings);
        self.failures.extend(other.failures);
        self
    }

    /// 成功样本数.
    #[inline]
    pub fn images(&self) -> usize {
        self.images
    }

    /// 按标签值排列的统计.
    #[inline]
    pub fn classes(&self) -> &BTreeMap<u8, ClassStat> {
        &self.classes
    }

    /// 失败样本 `(身份, 原因)`.
    #[inline]
    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    /// 将结果写进 `w` 中.
    pub fn describe_into<W: Write>(&self, w: &mut W) -> io::Result<()> {
        const S4: &str = "    ";

        writeln!(w, "Images composed: {}", self.images)?;
        for (label, stat) in self.classes.iter() {
            writeln!(
                w,
                "{S4}label {label:>3}: {:>6} images, {:>12} pixels",
                stat.images, stat.pixels
            )?;
        }

        let mut warnings: Vec<&ConfigWarning> = self.warnings.iter().collect();
        warnings.sort_by_key(|w| w.class);
        for warning in warnings {
            writeln!(w, "Warning: {warning}")?;
        }

        let mut failures: Vec<&(String, String)> = self.failures.iter().collect();
        failures.sort();
        writeln!(w, "Failures: {}", failures.len())?;
        for (identity, reason) in failures {
            writeln!(w, "{S4}{identity}: {reason}")?;
        }
        Ok(())
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);
        match self.describe_into(&mut buf) {
            Ok(()) => print!("{}", String::from_utf8_lossy(&buf)),
            Err(e) => log::error!("cannot render report: {e}"),
        }
        utils::sep();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use defect_berry::{ImageTensor, LabelMap};
    use ndarray::{array, Array3};
    use std::path::PathBuf;

    fn sample(label: LabelMap, warnings: Vec<ConfigWarning>) -> Sample {
        Sample {
            identity: "x.png".into(),
            image: ImageTensor::from(Array3::zeros((3, 2, 2))),
            label,
            warnings,
        }
    }

    #[test]
    fn test_record_and_merge() {
        let warning = ConfigWarning {
            class: 7,
            dir: PathBuf::from("/r/spatter"),
        };

        let mut a = Profile::default();
        a.record(&sample(LabelMap::from(array![[0, 1], [1, 2]]), vec![warning.clone()]));
        let mut b = Profile::default();
        b.record(&sample(LabelMap::from(array![[0, 0], [0, 1]]), vec![warning]));
        b.fail("bad.png".into(), "broken".into());

        let p = a.merge(b);
        assert_eq!(p.images(), 2);
        assert_eq!(p.classes()[&0], ClassStat { images: 2, pixels: 4 });
        assert_eq!(p.classes()[&1], ClassStat { images: 2, pixels: 3 });
        assert_eq!(p.classes()[&2], ClassStat { images: 1, pixels: 1 });
        assert_eq!(p.failures().len(), 1);

        let mut out = Vec::new();
        p.describe_into(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Warning:").count(), 1);
        assert!(text.contains("bad.png: broken"));
    }
}
