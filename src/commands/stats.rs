//! Stats command: display the recorded state of the last run.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::state;

pub fn run(output_dir: Option<PathBuf>, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let dir = output_dir.unwrap_or(config.output_dir);
    state::display_stats(&dir)
}
