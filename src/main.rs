//! rulemerge - Proxy routing rule list aggregator
//!
//! Fetches rule lists from remote sources, classifies and deduplicates
//! them, and writes per-category output files.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rulemerge::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Merge {
            source_dir,
            output_dir,
            output,
        } => rulemerge::commands::merge::run(source_dir, output_dir, output, &cli.config).await,
        Commands::Split {
            source_dir,
            output_dir,
        } => rulemerge::commands::split::run(source_dir, output_dir, &cli.config).await,
        Commands::Convert { input, output } => {
            rulemerge::commands::convert::run(&input, output.as_deref())
        }
        Commands::Stats { output_dir } => rulemerge::commands::stats::run(output_dir, &cli.config),
        Commands::Version => {
            println!("rulemerge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
