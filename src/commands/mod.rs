//! CLI command implementations.

pub mod convert;
pub mod merge;
pub mod split;
pub mod stats;

use crate::classifier::{classify_lines, ClassifiedRule};
use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::payload::extract_rules;
use crate::sources::RuleSource;
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Rules collected for one source across all of its URLs.
#[derive(Debug, Default)]
pub(crate) struct SourceRules {
    pub name: String,
    pub urls: usize,
    pub rules: Vec<ClassifiedRule>,
    pub rejected: usize,
}

/// Fetch every URL of every source, extract and classify the content, and
/// group the results per source (in source order).
///
/// Individual fetch failures are logged and skipped. Only the total loss
/// of every URL is fatal: with nothing fetched there is nothing to write.
pub(crate) async fn collect(config: &Config, sources: &[RuleSource]) -> Result<Vec<SourceRules>> {
    let fetcher = Fetcher::new(&config.fetch)?;
    let outcomes = fetcher.fetch_sources(sources).await;

    let mut by_source: BTreeMap<&str, SourceRules> = sources
        .iter()
        .map(|s| {
            (
                s.name.as_str(),
                SourceRules {
                    name: s.name.clone(),
                    urls: s.urls.len(),
                    ..SourceRules::default()
                },
            )
        })
        .collect();

    let mut fetched_total = 0usize;
    for outcome in &outcomes {
        let Some(entry) = by_source.get_mut(outcome.job.source.as_str()) else {
            continue;
        };
        match &outcome.result {
            Ok(content) => {
                fetched_total += 1;
                let lines = extract_rules(&outcome.job.url, content);
                let classified = classify_lines(&lines);
                info!(
                    "Fetched {} - {} rules ({} rejected)",
                    outcome.job.url,
                    classified.rules.len(),
                    classified.rejected
                );
                entry.rules.extend(classified.rules);
                entry.rejected += classified.rejected;
            }
            Err(e) => {
                warn!("Skipping {}: {}", outcome.job.url, e);
            }
        }
    }

    if fetched_total == 0 {
        anyhow::bail!("All fetches failed; nothing to aggregate");
    }

    // BTreeMap iteration order matches the sorted source order.
    Ok(by_source.into_values().collect())
}
