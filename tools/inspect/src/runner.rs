//! 程序运行函数.

use crate::profile::Profile;
use defect_berry::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// 运行失败.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// 数据集无法打开.
    #[error("cannot open dataset: {0}")]
    Open(#[source] LoadError),

    /// 导出目录无法创建.
    #[error("cannot create export directory: {0}")]
    Export(#[source] std::io::Error),

    /// 线程池无法创建.
    #[error("cannot build thread pool: {0}")]
    Pool(#[source] rayon::ThreadPoolBuildError),
}

/// 实际运行.
pub fn run(root: &Path, export: Option<&Path>, threads: Option<usize>) -> Result<Profile, RunError> {
    let ds = utils::loader::melting_dataset(root).map_err(RunError::Open)?;
    if let Some(dir) = export {
        fs::create_dir_all(dir).map_err(RunError::Export)?;
    }
    for w in ds.config_warnings() {
        log::warn!("{w}");
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or_else(utils::cpus))
        .build()
        .map_err(RunError::Pool)?;

    log::info!("Inspecting {} images under `{}`...", ds.len(), root.display());
    let profile = pool.install(|| {
        (0..ds.len())
            .into_par_iter()
            .map(|idx| {
                let name = ds.identity(idx).unwrap_or_default().to_owned();
                let outcome = ds
                    .get(idx)
                    .map_err(|e| e.to_string())
                    .and_then(|s| match export {
                        Some(dir) => export_sample(&s, dir).map(|_| s),
                        None => Ok(s),
                    });
                (name, outcome)
            })
            .fold(Profile::default, |mut p, (name, outcome)| {
                match outcome {
                    Ok(sample) => p.record(&sample),
                    Err(e) => p.fail(name, e),
                }
                p
            })
            .reduce(Profile::default, Profile::merge)
    });
    Ok(profile)
}

/// 写出 `{identity}.npy` 和 `{identity}.vis.png`.
///
/// 用完整文件名而非主干命名, 因此 `a.png` 与 `a.jpg` 的导出互不覆盖.
fn export_sample(sample: &Sample, dir: &Path) -> Result<(), String> {
    let name = &sample.identity;
    sample
        .label
        .write_npy(dir.join(format!("{name}.npy")))
        .map_err(|e| format!("export npy: {e}"))?;
    sample
        .label
        .save(dir.join(format!("{name}.vis.png")))
        .map_err(|e| format!("export png: {e}"))
}
