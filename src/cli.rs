use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Kiln - incremental build orchestrator
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON events)
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v reports change batches)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by `build` and `watch`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Project root (defaults to the workspace root or `build.project_root`)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Output directory, relative to the workspace root
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Cache directory, relative to the workspace root
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Poll the file system every MS milliseconds instead of using OS events
    #[arg(long, value_name = "MS")]
    pub poll: Option<u64>,

    /// Watch the whole project root, not only reported dependencies
    #[arg(long)]
    pub watch_root: bool,

    /// Build without writing files (report only)
    #[arg(long)]
    pub no_write: bool,

    /// Empty the output directory before the first build
    #[arg(long)]
    pub delete_output_path: bool,

    /// Do not report build start/finish
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the project once, or keep rebuilding with --watch
    Build {
        /// Rebuild whenever watched files change
        #[arg(short, long)]
        watch: bool,

        #[command(flatten)]
        args: BuildArgs,
    },

    /// Build and keep rebuilding on changes (same as `build --watch`)
    Watch {
        #[command(flatten)]
        args: BuildArgs,
    },
}
