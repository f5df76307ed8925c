//! Output file rendering and atomic writing.
//!
//! Each output file is fully rendered in memory, then written through a
//! tempfile-and-rename so a crash mid-write never leaves a truncated file
//! behind.

use crate::aggregator::RuleSet;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Header fields stamped onto a rendered file.
#[derive(Debug, Clone)]
pub struct HeaderMeta {
    pub name: String,
    pub author: String,
    pub repo: String,
}

/// Render a rule set with its header.
///
/// The timestamp is passed in rather than sampled here, which keeps
/// rendering a pure function of its inputs.
pub fn render(set: &RuleSet, meta: &HeaderMeta, updated: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str(&format!("# NAME: {}\n", meta.name));
    out.push_str(&format!("# AUTHOR: {}\n", meta.author));
    out.push_str(&format!("# REPO: {}\n", meta.repo));
    out.push_str(&format!(
        "# UPDATED: {}\n",
        updated.format("%Y-%m-%d %H:%M:%S")
    ));
    for (category, rules) in set.iter() {
        out.push_str(&format!("# {}: {}\n", category, rules.len()));
    }
    out.push_str(&format!("# TOTAL: {}\n", set.total()));
    out.push('\n');

    for (_, rules) in set.iter() {
        for rule in rules {
            out.push_str(&rule.to_string());
            out.push('\n');
        }
    }

    out
}

/// Write `content` to `path` atomically, overwriting any existing file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let parent_dir = path.parent().unwrap_or(Path::new("."));
    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent_dir))?;

    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist output file: {:?}", path))?;

    Ok(())
}
