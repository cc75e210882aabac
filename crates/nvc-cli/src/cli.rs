//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use nvc_core::Hash;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nvc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the table of contents of an archive
    List(ListArgs),
    /// Extract archive members
    Extract(ExtractArgs),
    /// Create a new archive
    Create(CreateArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Only show entries with these hashes (16 hex digits)
    #[arg(value_name = "HASH")]
    pub hashes: Vec<Hash>,

    /// File with one known member path per line, used to name entries
    #[arg(short, long, value_name = "PATHLIST")]
    pub pathlist: Option<PathBuf>,

    /// Show offsets, sizes and flags for each entry
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// File with one known member path per line
    #[arg(short, long, value_name = "PATHLIST")]
    pub pathlist: Option<PathBuf>,

    /// Also extract members not named in the path list, under data/
    #[arg(short, long)]
    pub unknown: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Compress members with zlib at this level (1-9); stored if omitted
    #[arg(
        short = 'c',
        long = "compress",
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u32).range(1..=9)
    )]
    pub compression_level: Option<u32>,

    /// Strip path prefix from member paths before hashing
    #[arg(long, value_name = "PREFIX")]
    pub strip_prefix: Option<PathBuf>,

    /// Include hidden files
    #[arg(long)]
    pub include_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}
