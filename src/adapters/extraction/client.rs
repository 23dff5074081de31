//! HTTP client for the extraction service

use super::parse::{parse_extraction_output, ParsedExtraction};
use crate::config::schema::ExtractionConfig;
use crate::domain::venue::Venue;
use crate::domain::{CuratorError, ExtractionError, Result};
use futures::stream::{self, StreamExt};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Body POSTed to the extraction endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRequest {
    /// Pages to extract exhibitions from
    pub urls: Vec<String>,
    /// Extraction instruction
    pub prompt: String,
}

impl ExtractionRequest {
    /// Request for a single venue's scrape page, if it has one
    pub fn for_venue(venue: &Venue, prompt: &str) -> Option<Self> {
        let url = venue.scrape_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(Self {
            urls: vec![url.to_string()],
            prompt: prompt.to_string(),
        })
    }
}

/// Result of extracting a list of venues
#[derive(Debug, Clone, Default)]
pub struct ExtractionRun {
    /// Records from every venue that succeeded
    pub parsed: ParsedExtraction,
    /// Venues whose extraction failed after retries
    pub failed_venues: Vec<String>,
    /// Venues skipped because they have no scrape URL
    pub skipped_venues: usize,
}

/// Extraction service client
pub struct ExtractionClient {
    client: Client,
    config: ExtractionConfig,
}

impl ExtractionClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                CuratorError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Run one extraction request and parse the output
    ///
    /// Transient failures (connection errors, timeouts, 5xx) are retried with
    /// exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns the last `ExtractionError` once retries are exhausted, or
    /// immediately for client errors and unrecognizable output.
    pub async fn run_extraction(&self, request: &ExtractionRequest) -> Result<ParsedExtraction> {
        let output = self.retry_request(|| self.post_once(request)).await?;
        parse_extraction_output(output)
    }

    /// Extract every venue that has a scrape URL, a bounded number at a time
    ///
    /// A failing venue is logged and listed in the result; it does not stop
    /// the others.
    pub async fn run_for_venues(&self, venues: &[Venue]) -> ExtractionRun {
        let mut run = ExtractionRun::default();
        let mut requests = Vec::with_capacity(venues.len());
        for venue in venues {
            match ExtractionRequest::for_venue(venue, &self.config.prompt) {
                Some(request) => requests.push((venue.name.clone(), request)),
                None => {
                    tracing::debug!(venue = %venue.name, "Venue has no scrape URL, skipping");
                    run.skipped_venues += 1;
                }
            }
        }

        let results: Vec<(String, Result<ParsedExtraction>)> = stream::iter(requests)
            .map(|(name, request)| async move {
                let result = self.run_extraction(&request).await;
                (name, result)
            })
            .buffer_unordered(self.config.max_concurrent_venues.max(1))
            .collect()
            .await;

        for (name, result) in results {
            match result {
                Ok(parsed) => {
                    tracing::info!(
                        venue = %name,
                        records = parsed.records.len(),
                        rejected = parsed.rejected,
                        "Extracted venue"
                    );
                    run.parsed.extend(parsed);
                }
                Err(e) => {
                    tracing::error!(venue = %name, error = %e, "Extraction failed");
                    run.failed_venues.push(name);
                }
            }
        }

        run
    }

    async fn post_once(&self, request: &ExtractionRequest) -> Result<Value> {
        let mut builder = self.client.post(&self.config.endpoint).json(request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key.expose_secret().as_ref());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionError::Timeout(e.to_string())
            } else {
                ExtractionError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(status_error(status, message).into());
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()).into())
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let max_attempts = retry.max_retries + 1;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    let transient =
                        matches!(&e, CuratorError::Extraction(inner) if inner.is_transient());
                    if !transient || attempt >= max_attempts {
                        return Err(e);
                    }

                    let delay_ms = backoff_delay_ms(
                        retry.initial_delay_ms,
                        retry.backoff_multiplier,
                        retry.max_delay_ms,
                        attempt,
                    );
                    crate::log_retry_attempt!(attempt, max_attempts, e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

fn status_error(status: StatusCode, message: String) -> ExtractionError {
    if status.is_server_error() {
        ExtractionError::ServerError {
            status: status.as_u16(),
            message,
        }
    } else {
        ExtractionError::ClientError {
            status: status.as_u16(),
            message,
        }
    }
}

/// Delay before retry number `attempt` (1-based)
fn backoff_delay_ms(initial_ms: u64, multiplier: f64, max_ms: u64, attempt: usize) -> u64 {
    let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
    let delay = initial_ms as f64 * multiplier.powi(exponent);
    if delay.is_finite() && delay < max_ms as f64 {
        delay as u64
    } else {
        max_ms
    }
}
