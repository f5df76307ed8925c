//! Configuration management for rulemerge.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
///
/// Every component receives the piece of this it needs at construction, so
/// the classifier and aggregator stay testable without touching the
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of source files (one URL per line)
    pub source_dir: PathBuf,

    /// Directory output files are written to
    pub output_dir: PathBuf,

    /// Output filename in merged mode
    pub output_file: String,

    /// Output extension in per-source mode
    pub extension: String,

    /// Header metadata stamped onto every output file
    pub header: HeaderConfig,

    /// Network tuning for the fetcher
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("sources"),
            output_dir: PathBuf::from("dist"),
            output_file: "merged_rules.list".to_string(),
            extension: "list".to_string(),
            header: HeaderConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Header metadata fields for generated files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub name: String,
    pub author: String,
    pub repo: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            name: "Merged Rules".to_string(),
            author: "rulemerge".to_string(),
            repo: "https://github.com/rulemerge/rulemerge".to_string(),
        }
    }
}

/// Network tuning for the fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per URL before giving up
    pub max_retries: u32,

    /// Delay between attempts in seconds
    pub retry_delay_secs: u64,

    /// Concurrent downloads
    pub max_concurrent: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-document size cap in bytes
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_retries: 3,
            retry_delay_secs: 2,
            max_concurrent: 10,
            user_agent: format!("rulemerge/{}", env!("CARGO_PKG_VERSION")),
            // Rule lists are a few thousand lines; 10 MB is ample margin.
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the config file when present, otherwise fall back to the
    /// conventional defaults. Scheduled invocations run without any config
    /// file at all.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be greater than zero");
        }
        if self.fetch.max_retries == 0 {
            anyhow::bail!("fetch.max_retries must be at least 1");
        }
        if self.fetch.max_concurrent == 0 {
            anyhow::bail!("fetch.max_concurrent must be at least 1");
        }
        if self.output_file.is_empty() {
            anyhow::bail!("output_file must not be empty");
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            anyhow::bail!(
                "extension must be a bare extension without the leading dot, got '{}'",
                self.extension
            );
        }
        Ok(())
    }

    /// Save configuration to a YAML file atomically.
    ///
    /// Uses tempfile + rename to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        let parent_dir = path.parent().unwrap_or(Path::new("."));
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }
}
