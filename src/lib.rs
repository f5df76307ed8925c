//! # rulemerge - Proxy Routing Rule List Aggregator
//!
//! A batch tool that aggregates proxy-routing rule lists (domain, IP, and
//! process-name matchers) from multiple remote text sources, deduplicates
//! and classifies them, and emits per-category output files. Designed to
//! run unattended on a schedule; a full run completes in minutes and is
//! idempotent.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      rulemerge                          │
//! ├─────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                             │
//! │    └── Commands: merge, split, convert, stats           │
//! ├─────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                    │
//! │    └── Paths, header metadata, fetch tuning             │
//! ├─────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                             │
//! │    └── Bounded-parallel downloads with retry            │
//! ├─────────────────────────────────────────────────────────┤
//! │  Payload (plain lists, Clash YAML payload blocks)       │
//! ├─────────────────────────────────────────────────────────┤
//! │  Classifier (ipnet)                                     │
//! │    └── Explicit prefixes, then ordered shape inference  │
//! ├─────────────────────────────────────────────────────────┤
//! │  Aggregator                                             │
//! │    └── Category-partitioned dedup, merged or per-source │
//! ├─────────────────────────────────────────────────────────┤
//! │  Writer                                                 │
//! │    └── Counted header + sorted rules, atomic writes     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Category-partitioned rule sets with deduplication
//! - [`classifier`] - Rule line classification
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Typed error definitions
//! - [`fetcher`] - HTTP client for downloading rule lists
//! - [`lock`] - File locking for concurrent execution prevention
//! - [`payload`] - Document-shape detection and payload extraction
//! - [`sources`] - Source list reading
//! - [`state`] - Run state persistence and statistics
//! - [`utils`] - Common formatting helpers
//! - [`writer`] - Output rendering and atomic writing

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod lock;
pub mod payload;
pub mod sources;
pub mod state;
pub mod utils;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
