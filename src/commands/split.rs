//! Split command: one independent rule set and output file per source.

use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{error, info};

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
    config_path: &Path,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(dir) = source_dir {
        config.source_dir = dir;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let _lock = LockGuard::acquire(&config.output_dir)?;

    let source_list = sources::read_sources(&config.source_dir)?;
    info!(
        "Read {} sources from {:?}",
        source_list.len(),
        config.source_dir
    );

    let collected = super::collect(&config, &source_list).await?;
    let updated = Utc::now();

    // Each source aggregates independently: no cross-source dedup, and a
    // write failure for one file leaves the others untouched.
    let mut written = 0usize;
    let mut failed: Vec<String> = Vec::new();
    for source in &collected {
        let mut set = RuleSet::new(&source.name);
        set.extend(source.rules.iter().cloned());

        let meta = HeaderMeta {
            name: source.name.clone(),
            author: config.header.author.clone(),
            repo: config.header.repo.clone(),
        };
        let content = writer::render(&set, &meta, updated);
        let path = config
            .output_dir
            .join(format!("{}.{}", source.name, config.extension));

        match writer::write_atomic(&path, &content) {
            Ok(()) => {
                info!(
                    "Wrote {} rules to {}",
                    format_count(set.total()),
                    path.display()
                );
                written += 1;
            }
            Err(e) => {
                error!("Failed to write {}: {:#}", path.display(), e);
                failed.push(source.name.clone());
            }
        }
    }

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
    state.update_sources("split", stats, updated);
    state.save(&config.output_dir)?;

    println!(
        "[OK] {} output files written to {}",
        written,
        config.output_dir.display()
    );

    if !failed.is_empty() {
        anyhow::bail!("Failed to write outputs for: {}", failed.join(", "));
    }

    Ok(())
}
