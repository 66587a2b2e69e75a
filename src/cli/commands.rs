//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "techscope",
    version,
    about = "Map a project tree into a technology component graph"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and emit the component graph
    Scan(ScanArgs),
    /// Print the active rule set
    Rules(RulesArgs),
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Rule file (JSON or YAML) replacing the built-in rules
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Explicit root identifier override
    #[arg(long)]
    pub root_id: Option<String>,

    /// Version-control remote URL for deterministic root IDs
    #[arg(long)]
    pub remote_url: Option<String>,

    /// Sub-path of the scan root within the repository
    #[arg(long)]
    pub repo_subpath: Option<String>,

    /// Fail instead of generating a random root identifier
    #[arg(long)]
    pub deterministic: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Rule file (JSON or YAML) replacing the built-in rules
    #[arg(long)]
    pub rules: Option<PathBuf>,
}
