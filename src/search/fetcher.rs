// src/search/fetcher.rs
use super::rate_limit::RateLimiter;
use crate::config::FetchConfig;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

/// Statuses worth another attempt. Anything else non-2xx fails outright.
const RETRYABLE_STATUS: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error("network error: {0}")]
    Network(String),
}

/// Outcome of one logical fetch, retries included. A failure carries no
/// partial body.
#[derive(Debug)]
pub enum FetchResult {
    Success { status: StatusCode, body: String },
    Failure(FetchError),
}

/// Throttled, retrying GET client for the listing site.
///
/// The reqwest client is built once (fixed User-Agent, fixed per-attempt
/// timeout) and reused so the connection pool is shared across requests.
pub struct Fetcher {
    client: Client,
    limiter: RateLimiter,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;
        let limiter = RateLimiter::new(config.max_calls_per_period, config.rate_period);

        Ok(Self {
            client,
            limiter,
            config,
        })
    }

    /// Issues a throttled GET, retrying transient failures with doubling
    /// delays. Every attempt counts against the rate window. Failures come
    /// back as values, never as panics; the caller decides what an empty
    /// page means.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut last_failure = None;

        for attempt in 1..=self.config.max_attempts {
            if attempt > 1 {
                let delay = self.config.backoff_base * 2u32.pow(attempt - 2);
                sleep(delay).await;
            }
            self.limiter.acquire().await;

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        match response.text().await {
                            Ok(body) => {
                                info!("Fetched {} ({})", url, status);
                                return FetchResult::Success { status, body };
                            }
                            Err(e) => {
                                warn!(
                                    "Attempt {}/{}: failed to read body from {}: {}",
                                    attempt, self.config.max_attempts, url, e
                                );
                                last_failure = Some(FetchError::Network(e.to_string()));
                            }
                        }
                    } else if RETRYABLE_STATUS.contains(&status) {
                        warn!(
                            "Attempt {}/{}: {} returned {}",
                            attempt, self.config.max_attempts, url, status
                        );
                        last_failure = Some(FetchError::Status(status));
                    } else {
                        warn!("Request to {} failed with status {}", url, status);
                        return FetchResult::Failure(FetchError::Status(status));
                    }
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: request to {} failed: {}",
                        attempt, self.config.max_attempts, url, e
                    );
                    last_failure = Some(FetchError::Network(e.to_string()));
                }
            }
        }

        warn!(
            "Giving up on {} after {} attempts",
            url, self.config.max_attempts
        );
        FetchResult::Failure(last_failure.unwrap_or_else(|| {
            FetchError::Network("no fetch attempts were configured".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Serves each canned response to one connection, in order, then stops
    // accepting.
    async fn scripted_server(responses: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf).await;
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{}/", addr)
    }

    fn quick_config() -> FetchConfig {
        FetchConfig::default().with_backoff_base(Duration::from_millis(5))
    }

    const UNAVAILABLE: &str =
        "HTTP/1.1 503 Service Unavailable\r\nconnection: close\r\ncontent-length: 0\r\n\r\n";
    const OK_HELLO: &str =
        "HTTP/1.1 200 OK\r\nconnection: close\r\ncontent-length: 5\r\n\r\nhello";
    const NOT_FOUND: &str =
        "HTTP/1.1 404 Not Found\r\nconnection: close\r\ncontent-length: 0\r\n\r\n";

    #[tokio::test]
    async fn recovers_from_transient_errors_within_retry_budget() {
        let url = scripted_server(vec![UNAVAILABLE, UNAVAILABLE, OK_HELLO]).await;
        let fetcher = Fetcher::new(quick_config()).unwrap();

        match fetcher.fetch(&url).await {
            FetchResult::Success { status, body } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body, "hello");
            }
            FetchResult::Failure(e) => panic!("expected success, got {}", e),
        }
    }

    #[tokio::test]
    async fn exhausted_retries_return_the_last_status() {
        let url = scripted_server(vec![UNAVAILABLE, UNAVAILABLE, UNAVAILABLE]).await;
        let fetcher = Fetcher::new(quick_config()).unwrap();

        match fetcher.fetch(&url).await {
            FetchResult::Failure(FetchError::Status(status)) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            }
            other => panic!("expected status failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_retryable_status_fails_on_first_attempt() {
        // Only one scripted response: a retry would hang on the second
        // accept, so completing at all proves a single attempt was made.
        let url = scripted_server(vec![NOT_FOUND]).await;
        let fetcher = Fetcher::new(quick_config()).unwrap();

        match fetcher.fetch(&url).await {
            FetchResult::Failure(FetchError::Status(status)) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
            }
            other => panic!("expected status failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn throttle_delays_attempts_past_the_window_cap() {
        let url = scripted_server(vec![OK_HELLO, OK_HELLO, OK_HELLO]).await;
        let config = quick_config().with_rate_limit(2, Duration::from_millis(100));
        let fetcher = Fetcher::new(config).unwrap();

        let started = std::time::Instant::now();
        for _ in 0..3 {
            match fetcher.fetch(&url).await {
                FetchResult::Success { .. } => {}
                FetchResult::Failure(e) => panic!("expected success, got {}", e),
            }
        }

        // The third call only fits in the next window.
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn connection_errors_become_failure_values() {
        let fetcher = Fetcher::new(quick_config().with_max_attempts(1)).unwrap();

        match fetcher.fetch("http://127.0.0.1:9/").await {
            FetchResult::Failure(FetchError::Network(_)) => {}
            other => panic!("expected network failure, got {:?}", other),
        }
    }
}
