//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rulemerge")]
#[command(author, version, about = "Proxy routing rule list aggregator")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "rulemerge.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all sources and write one merged, deduplicated output file
    Merge {
        /// Directory of source files (one URL per line)
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Directory to write output into
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Output filename
        #[arg(long)]
        output: Option<String>,
    },

    /// Fetch all sources and write one output file per source
    Split {
        /// Directory of source files (one URL per line)
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Directory to write outputs into
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Convert a local Clash YAML payload file to list format
    Convert {
        /// Input YAML file
        input: PathBuf,

        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show statistics for the last run
    Stats {
        /// Output directory holding the run state
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Show version
    Version,
}
