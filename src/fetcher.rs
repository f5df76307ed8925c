//! HTTP fetcher for downloading rule lists.

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::sources::RuleSource;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// One (source, URL) download unit.
#[derive(Debug, Clone)]
pub struct FetchJob {
    pub source: String,
    pub url: String,
}

/// The outcome of one job: the document text, or the error that exhausted
/// the retries.
#[derive(Debug)]
pub struct FetchOutcome {
    pub job: FetchJob,
    pub result: std::result::Result<String, FetchError>,
}

/// HTTP client for fetching rule lists.
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
    max_concurrent: usize,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_delay: Duration::from_secs(config.retry_delay_secs),
            max_concurrent: config.max_concurrent,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Expand sources into jobs and fetch them all with bounded
    /// parallelism. Failures are returned alongside successes; a failing
    /// URL never aborts the run.
    pub async fn fetch_sources(&self, sources: &[RuleSource]) -> Vec<FetchOutcome> {
        let jobs: Vec<FetchJob> = sources
            .iter()
            .flat_map(|source| {
                source.urls.iter().map(|url| FetchJob {
                    source: source.name.clone(),
                    url: url.clone(),
                })
            })
            .collect();

        stream::iter(jobs.into_iter().map(|job| async move {
            let result = self.fetch(&job.url).await;
            FetchOutcome { job, result }
        }))
        .buffer_unordered(self.max_concurrent)
        .collect()
        .await
    }

    /// Fetch one URL with retry. Retries transient failures (timeout,
    /// connection error, 5xx); 4xx client errors fail immediately since
    /// retrying a 404 is pointless.
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let mut last_error = None;

        for attempt in 0..self.max_retries.max(1) {
            if attempt > 0 {
                debug!("Retry {} for {}", attempt, url);
                tokio::time::sleep(self.retry_delay).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return self.read_body(url, response).await;
                    }
                    let err = FetchError::Status {
                        url: url.to_string(),
                        status,
                    };
                    if status.is_client_error() {
                        return Err(err);
                    }
                    last_error = Some(err);
                }
                Err(e) => {
                    last_error = Some(FetchError::Transport {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Exhausted {
            url: url.to_string(),
        }))
    }

    async fn read_body(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> std::result::Result<String, FetchError> {
        if let Some(len) = response.content_length() {
            if len as usize > self.max_body_bytes {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                    len: len as usize,
                    max: self.max_body_bytes,
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        // Content-Length is not always sent; check the actual size too.
        if body.len() > self.max_body_bytes {
            warn!("Response from {} over size cap after download", url);
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                len: body.len(),
                max: self.max_body_bytes,
            });
        }

        Ok(body)
    }
}
