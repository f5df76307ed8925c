//! Run state persistence and statistics display.

use crate::utils::{format_count, truncate};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STATE_FILE: &str = ".rulemerge-state.json";

/// Persistent state of the last completed run, written next to the output
/// files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunState {
    pub last_update: Option<DateTime<Utc>>,
    pub mode: String,
    pub sources: Vec<SourceStats>,
    pub total_rules: usize,
    pub total_rejected: usize,
}

/// Statistics for a single source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStats {
    pub name: String,
    pub urls: usize,
    pub rules: usize,
    pub rejected: usize,
}

impl RunState {
    pub fn path(output_dir: &Path) -> PathBuf {
        output_dir.join(STATE_FILE)
    }

    /// Load state from the output directory, defaulting when absent.
    pub fn load(output_dir: &Path) -> Result<Self> {
        let path = Self::path(output_dir);
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, output_dir: &Path) -> Result<()> {
        let path = Self::path(output_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace source stats and recompute totals.
    pub fn update_sources(&mut self, mode: &str, sources: Vec<SourceStats>, now: DateTime<Utc>) {
        self.total_rules = sources.iter().map(|s| s.rules).sum();
        self.total_rejected = sources.iter().map(|s| s.rejected).sum();
        self.sources = sources;
        self.mode = mode.to_string();
        self.last_update = Some(now);
    }
}

/// Display formatted statistics for the last run.
pub fn display_stats(output_dir: &Path) -> Result<()> {
    let state = RunState::load(output_dir).unwrap_or_default();

    println!();
    println!("══════════════════════════════════════════════════════");
    println!(" RULEMERGE RUN STATISTICS");
    println!("══════════════════════════════════════════════════════");
    println!();

    if state.sources.is_empty() {
        println!(" No recorded runs in {:?}", output_dir);
        println!();
        return Ok(());
    }

    println!(" Mode: {}", state.mode);
    println!();
    println!(" SOURCE              URLS     RULES    REJECTED");
    println!(" ────────────────── ──────── ──────── ────────");

    for source in &state.sources {
        println!(
            " {:<18} {:>8} {:>8} {:>8}",
            truncate(&source.name, 18),
            source.urls,
            format_count(source.rules),
            format_count(source.rejected),
        );
    }

    println!(" ────────────────── ──────── ──────── ────────");
    println!(
        " {:<18} {:>8} {:>8} {:>8}",
        "TOTAL",
        state.sources.iter().map(|s| s.urls).sum::<usize>(),
        format_count(state.total_rules),
        format_count(state.total_rejected),
    );
    println!();

    if let Some(last_update) = state.last_update {
        let local: DateTime<Local> = last_update.into();
        println!(
            " Last update: {} ({})",
            local.format("%Y-%m-%d %H:%M:%S"),
            format_duration_ago(last_update)
        );
    } else {
        println!(" Last update: never");
    }

    println!("══════════════════════════════════════════════════════");
    println!();

    Ok(())
}

/// Format duration since a timestamp.
fn format_duration_ago(dt: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(dt).num_seconds();
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86400)
    }
}
