//! 批量重命名命令行入口.

use clap::Parser;
use renamer::{Rule, DEFAULT_EXTENSIONS, DEFAULT_FOLDERS, DEFAULT_RULES};
use std::path::PathBuf;
use std::process::ExitCode;

/// Rename files in place by sequential substring substitution.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Dataset root. Defaults to `$DEFECT_DATASET_DIR` or `~/dataset/defect`.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Folders to process, relative to the root.
    #[arg(long = "folder", default_values_t = DEFAULT_FOLDERS.map(String::from))]
    folders: Vec<String>,

    /// Substitution rules `old=new`, applied in order.
    #[arg(long = "rule", default_values_t = DEFAULT_RULES.map(String::from))]
    rules: Vec<String>,

    /// File extensions to consider (case-sensitive, without the dot).
    #[arg(long = "ext", default_values_t = DEFAULT_EXTENSIONS.map(String::from))]
    exts: Vec<String>,

    /// Only print what would be renamed.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    simple_logger::init_with_level(log::Level::Info).expect("logger initialised twice");
    let args = Args::parse();

    let Some(root) = args.root.or_else(utils::loader::root_dir_from_env_or_home) else {
        log::error!("cannot determine dataset root; pass --root");
        return ExitCode::FAILURE;
    };
    let rules = match args.rules.iter().map(|r| r.parse()).collect::<Result<Vec<Rule>, _>>() {
        Ok(r) => r,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let folders = utils::loader::dirs_under(&root, &args.folders);

    match renamer::rename_all(&folders, &rules, &args.exts, args.dry_run) {
        Ok(done) => {
            for r in done.iter() {
                println!("{} -> {}", r.from.display(), r.to.display());
            }
            log::info!(
                "{} {} file(s) in {} folder(s)",
                if args.dry_run { "Would rename" } else { "Renamed" },
                done.len(),
                folders.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
