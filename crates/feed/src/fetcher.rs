//! Concurrent retrieval of rate documents.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use xrate_shared::{AppError, FeedConfig};

/// Failure to retrieve one document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No complete response within the per-fetch timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection, TLS or body read failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

/// Retrieves the raw body of a document.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetches `url` and returns its body.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// HTTP implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `request_timeout`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be built.
    pub fn new(user_agent: &str, request_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(user_agent)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// Creates a fetcher from feed configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ExternalService` if the HTTP client cannot be built.
    pub fn from_config(config: &FeedConfig) -> Result<Self, AppError> {
        Ok(Self::new(&config.user_agent, config.timeout())?)
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

/// Bounds applied to a batch of fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Timeout for each fetch on its own.
    pub timeout: Duration,
    /// Maximum number of fetches in flight.
    pub max_concurrent: usize,
}

impl FetchLimits {
    /// Limits taken from feed configuration.
    #[must_use]
    pub const fn from_config(config: &FeedConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_concurrent: config.max_concurrent_fetches,
        }
    }
}

/// Result of fetching one URL.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The fetched URL.
    pub url: String,
    /// Body, or why there is none.
    pub result: Result<Bytes, FetchError>,
}

/// Outcomes of a batch, one per requested URL, in request order.
#[derive(Debug, Clone, Default)]
pub struct FetchBatch {
    outcomes: Vec<FetchOutcome>,
}

impl FetchBatch {
    /// Outcome for `url`, if it was part of the batch.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&Result<Bytes, FetchError>> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.url == url)
            .map(|outcome| &outcome.result)
    }

    /// Outcomes in request order.
    pub fn iter(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes.iter()
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if the batch was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of URLs that produced a body.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }
}

impl IntoIterator for FetchBatch {
    type Item = FetchOutcome;
    type IntoIter = std::vec::IntoIter<FetchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

/// Fetches one URL, giving up after `limit`.
///
/// # Errors
///
/// Returns `FetchError::Timeout` when `limit` elapses, or the fetcher's own error.
pub async fn fetch_with_timeout(
    fetcher: &dyn DocumentFetcher,
    url: &str,
    limit: Duration,
) -> Result<Bytes, FetchError> {
    timeout(limit, fetcher.fetch(url))
        .await
        .unwrap_or(Err(FetchError::Timeout))
}

/// Fetches a single URL with a timeout and logs the outcome.
async fn fetch_one(fetcher: &dyn DocumentFetcher, url: &String, limit: Duration) -> FetchOutcome {
    let result = fetch_with_timeout(fetcher, url, limit).await;
    match &result {
        Ok(body) => debug!(url = %url, bytes = body.len(), "Fetched rate document"),
        Err(e) => warn!(url = %url, error = %e, "Failed to fetch rate document"),
    }
    FetchOutcome {
        url: url.clone(),
        result,
    }
}

/// Fetches every URL concurrently and waits for all of them.
///
/// At most `limits.max_concurrent` fetches run at once and each has its own
/// timeout. A failed URL is logged and recorded in the batch; it never stops
/// the others.
pub async fn fetch_all(
    fetcher: &dyn DocumentFetcher,
    urls: &[String],
    limits: FetchLimits,
) -> FetchBatch {
    info!(sources = urls.len(), "Crawling rate sources");

    let fetches: Vec<_> = urls
        .iter()
        .map(|url| fetch_one(fetcher, url, limits.timeout))
        .collect();
    let outcomes: Vec<FetchOutcome> = stream::iter(fetches)
        .buffered(limits.max_concurrent.max(1))
        .collect()
        .await;

    let batch = FetchBatch { outcomes };
    info!(
        succeeded = batch.succeeded(),
        failed = batch.len() - batch.succeeded(),
        "Crawl finished"
    );
    batch
}
