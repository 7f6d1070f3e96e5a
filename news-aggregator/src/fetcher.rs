use crate::types::{AggregatorError, FetchConfig, FetchResult, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use url::Url;

/// Shared HTTP front door for every source.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    rate_limiter: Arc<Mutex<HashMap<String, Instant>>>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            config,
            rate_limiter: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Fetches a feed body, retrying transport errors and 5xx responses with
    /// exponential backoff. Failures are reported in the returned
    /// [`FetchResult`] rather than as an `Err`.
    pub async fn fetch_feed(&self, url: &str) -> Result<FetchResult> {
        let start_time = Instant::now();
        let fetch_time = Utc::now();

        debug!("Fetching feed: {}", url);

        self.apply_rate_limit(url).await?;

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 30)),
            ..Default::default()
        };

        let mut last_error = None;
        let mut last_status = None;

        for attempt in 0..=self.config.max_retries {
            let retryable = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    last_status = Some(status.as_u16());

                    if status.is_success() {
                        return self.read_body(url, response, fetch_time, start_time).await;
                    }

                    last_error = Some(format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    ));
                    is_retryable(status)
                }
                Err(e) => {
                    last_error = Some(AggregatorError::Http(e).to_string());
                    true
                }
            };

            if !retryable || attempt >= self.config.max_retries {
                break;
            }

            match backoff.next_backoff() {
                Some(delay) => {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                }
                None => break,
            }
        }

        let error_msg = last_error.unwrap_or_else(|| "Unknown error".to_string());
        error!("Failed to fetch feed {}: {}", url, error_msg);

        Ok(FetchResult {
            url: url.to_string(),
            success: false,
            error: Some(error_msg),
            fetch_time,
            response_time_ms: start_time.elapsed().as_millis() as u64,
            http_status: last_status,
            content: None,
        })
    }

    async fn read_body(
        &self,
        url: &str,
        response: Response,
        fetch_time: chrono::DateTime<Utc>,
        start_time: Instant,
    ) -> Result<FetchResult> {
        let status = response.status();

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Ok(FetchResult {
                    url: url.to_string(),
                    success: false,
                    error: Some(AggregatorError::FeedTooLarge { size_mb }.to_string()),
                    fetch_time,
                    response_time_ms: start_time.elapsed().as_millis() as u64,
                    http_status: Some(status.as_u16()),
                    content: None,
                });
            }
        }

        let content = response.text().await?;
        info!("Successfully fetched feed: {} ({} bytes)", url, content.len());

        Ok(FetchResult {
            url: url.to_string(),
            success: true,
            error: None,
            fetch_time,
            response_time_ms: start_time.elapsed().as_millis() as u64,
            http_status: Some(status.as_u16()),
            content: Some(content),
        })
    }

    /// Single GET with query parameters, decoding a JSON body.
    ///
    /// No retries: search APIs meter every request.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T> {
        self.apply_rate_limit(url).await?;

        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AggregatorError::Api {
                status: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Spaces out requests to the same host by `min_host_interval_ms`.
    async fn apply_rate_limit(&self, url: &str) -> Result<()> {
        let parsed_url = Url::parse(url)?;
        let host = parsed_url.host_str().unwrap_or("").to_string();
        let min_interval = Duration::from_millis(self.config.min_host_interval_ms);

        let wait_time = {
            let mut rate_limiter = self.rate_limiter.lock().await;
            let now = Instant::now();
            let next_slot = match rate_limiter.get(&host) {
                Some(last_request) if *last_request + min_interval > now => {
                    *last_request + min_interval
                }
                _ => now,
            };
            rate_limiter.insert(host.clone(), next_slot);
            next_slot.saturating_duration_since(now)
        };

        if !wait_time.is_zero() {
            debug!("Rate limiting {}: waiting {:?}", host, wait_time);
            tokio::time::sleep(wait_time).await;
        }

        Ok(())
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
