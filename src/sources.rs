//! Source list reading.
//!
//! A source is a `.txt` file in the source directory: one remote URL per
//! line, `#` comments and blank lines ignored. The file stem names the
//! source and, in per-source mode, its output file.

use crate::error::RulemergeError;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

/// A named, ordered list of URLs read from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    pub name: String,
    pub urls: Vec<String>,
}

/// Read every `.txt` file in `dir` into a [`RuleSource`], sorted by name
/// for deterministic processing order.
///
/// A missing directory or a directory without any `.txt` file is fatal:
/// the run cannot proceed without sources.
pub fn read_sources(dir: &Path) -> Result<Vec<RuleSource>> {
    if !dir.is_dir() {
        return Err(RulemergeError::SourceDirMissing(dir.to_path_buf()).into());
    }

    let mut sources = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read source directory {:?}", dir))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read source file {:?}", path))?;
        let urls = parse_urls(&content);

        if urls.is_empty() {
            warn!("Source {} contains no URLs, skipping", name);
            continue;
        }

        debug!("Read {} URLs from {}", urls.len(), name);
        sources.push(RuleSource {
            name: name.to_string(),
            urls,
        });
    }

    if sources.is_empty() {
        return Err(RulemergeError::NoSourceFiles(dir.to_path_buf()).into());
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

/// Candidate URLs from one source file: trimmed lines, minus blanks and
/// `#` comments. No further validation; malformed URLs surface as fetch
/// failures downstream.
fn parse_urls(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
