//! 数据集检查工具: 统计每个类别的图像数和像素数, 并可导出合成后的标签图.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod profile;
mod runner;

/// Inspect a melting-defect segmentation dataset.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Dataset root. Defaults to `$DEFECT_DATASET_DIR` or `~/dataset/defect`.
    root: Option<PathBuf>,

    /// Write every composed label map as `.npy` and a visualisation PNG into this directory.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Worker threads. Defaults to the number of available cores.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> ExitCode {
    simple_logger::init_with_level(log::Level::Info).expect("logger initialised twice");
    let args = Args::parse();

    let Some(root) = args.root.or_else(utils::loader::root_dir_from_env_or_home) else {
        log::error!("cannot determine dataset root; pass it explicitly");
        return ExitCode::FAILURE;
    };

    match runner::run(&root, args.export.as_deref(), args.threads) {
        Ok(profile) => {
            profile.analyze();
            if profile.failures().is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
