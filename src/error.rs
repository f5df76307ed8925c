//! Error types for rulemerge.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulemergeError {
    #[error("Source directory {0:?} does not exist or is not a directory")]
    SourceDirMissing(PathBuf),

    #[error("No source files (*.txt) found in {0:?}")]
    NoSourceFiles(PathBuf),
}

/// Failure modes of a single URL fetch. Never fatal to a run: the caller
/// logs the error and skips the URL.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} too large: {len} bytes (max {max})")]
    TooLarge { url: String, len: usize, max: usize },

    #[error("Request to {url} failed after all retry attempts")]
    Exhausted { url: String },
}
