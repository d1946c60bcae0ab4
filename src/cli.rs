use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-credits",
    about = "Collect source-file license headers into a single credits document",
    version
)]
pub struct Cli {
    /// Source tree root
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Files to process (absolute or relative to the root); walks the root when omitted
    pub files: Vec<PathBuf>,

    /// Config file [default: ./.license-credits/config.toml, fallback ~/.config/license-credits/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the credits here instead of the configured output file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory holding the per-bucket license texts
    #[arg(long, value_name = "DIR")]
    pub license_dir: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Classify and render, but do not write the credits file
    #[arg(long)]
    pub dry_run: bool,

    /// List every file's classification; repeat for debug logs
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
