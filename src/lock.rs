//! File-based locking to prevent concurrent execution.
//!
//! Scheduled invocations can overlap when a run takes longer than the
//! schedule interval; an advisory lock in the output directory makes the
//! second run fail fast instead of racing on the output files.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

const LOCK_FILE: &str = ".rulemerge.lock";

/// A guard that holds an exclusive lock on the output directory.
/// The lock is released when the guard is dropped.
pub struct LockGuard {
    _file: File,
}

impl LockGuard {
    /// Attempt to acquire an exclusive lock for `output_dir`.
    /// Returns an error if another instance is already running.
    ///
    /// Opens with create+read+write (no truncate) to avoid a TOCTOU race
    /// between file creation and lock acquisition.
    pub fn acquire(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;
        let lock_path = output_dir.join(LOCK_FILE);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

        file.try_lock_exclusive().map_err(|_| {
            anyhow::anyhow!(
                "Another instance of rulemerge is already running.\n\
                 Wait for it to complete, or remove the lock file: {:?}",
                lock_path
            )
        })?;

        Ok(Self { _file: file })
    }
}
