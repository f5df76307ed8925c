//! Merge command: one global rule set across all sources.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregator::RuleSet;
use crate::config::Config;
use crate::lock::LockGuard;
use crate::sources;
use crate::state::{RunState, SourceStats};
use crate::utils::format_count;
use crate::writer::{self, HeaderMeta};

pub async fn run(
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    output: Option<String>,
    config_path: &Path,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(dir) = source_dir {
        config.source_dir = dir;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(file) = output {
        config.output_file = file;
    }

    let _lock = LockGuard::acquire(&config.output_dir)?;

    let source_list = sources::read_sources(&config.source_dir)?;
    info!(
        "Read {} sources from {:?}",
        source_list.len(),
        config.source_dir
    );

    let collected = super::collect(&config, &source_list).await?;

    // Per-source identity is discarded: one global set deduplicates
    // across everything.
    let mut set = RuleSet::new(&config.header.name);
    for source in &collected {
        set.extend(source.rules.iter().cloned());
    }

    let rejected: usize = collected.iter().map(|s| s.rejected).sum();
    info!(
        "Aggregated {} unique rules ({} lines rejected)",
        format_count(set.total()),
        format_count(rejected)
    );

    let updated = Utc::now();
    let meta = HeaderMeta {
        name: config.header.name.clone(),
        author: config.header.author.clone(),
        repo: config.header.repo.clone(),
    };
    let content = writer::render(&set, &meta, updated);
    let path = config.output_dir.join(&config.output_file);
    writer::write_atomic(&path, &content)
        .with_context(|| format!("Failed to write merged output to {:?}", path))?;

    let stats = collected
        .iter()
        .map(|s| SourceStats {
            name: s.name.clone(),
            urls: s.urls,
            rules: s.rules.len(),
            rejected: s.rejected,
        })
        .collect();
    let mut state = RunState::load(&config.output_dir).unwrap_or_default();
    state.update_sources("merged", stats, updated);
    state.save(&config.output_dir)?;

    println!(
        "[OK] {} rules written to {}",
        format_count(set.total()),
        path.display()
    );

    Ok(())
}
