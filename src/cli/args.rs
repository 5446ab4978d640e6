use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sizecmp",
    version,
    about = "Compare two `size` reports and print per-section deltas"
)]
pub struct Cli {
    /// Report of the baseline build (`size` output, optionally gzipped)
    pub old: PathBuf,

    /// Report of the build to compare against the baseline
    pub new: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}
