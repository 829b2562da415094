//! HTTP client wrapper with retry logic.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::config::{PolygonConfig, RetryConfig};
use crate::application::ports::ProviderError;

/// HTTP client for the Polygon REST API with retry logic.
#[derive(Clone)]
pub struct PolygonHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for PolygonHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonHttpClient")
            .field("base_url", &self.base_url)
            .field("retry_config", &self.retry_config)
            .finish_non_exhaustive()
    }
}

impl PolygonHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &PolygonConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Unauthorized);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            retry_config: config.retry.clone(),
        })
    }

    /// API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` (relative to the base URL) or an absolute URL on the same
    /// host, such as a `next_url` cursor.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path_or_url: &str,
        query: &[(&str, String)],
        subject: &str,
    ) -> Result<T, ProviderError> {
        let url = if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}{path_or_url}", self.base_url)
        };
        let mut backoff = ExponentialBackoff::new(&self.retry_config);

        loop {
            let request = self
                .client
                .get(&url)
                .query(query)
                .query(&[("apiKey", self.api_key.as_str())]);

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    // Request URLs carry the API key
                    let e = e.without_url();
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(ProviderError::Transport {
                        message: e.to_string(),
                    });
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response.text().await.map_err(|e| ProviderError::Transport {
                    message: e.without_url().to_string(),
                })?;
                return serde_json::from_str(&text).map_err(|e| ProviderError::Parse {
                    message: e.to_string(),
                });
            }

            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            let error_body = response.text().await.unwrap_or_default();

            match categorize_status(status) {
                ErrorCategory::RateLimited => {
                    if let Some(delay) = backoff.next_backoff() {
                        let delay = retry_after
                            .map_or(delay, Duration::from_secs)
                            .min(self.retry_config.max_backoff);
                        tracing::warn!(
                            subject = %subject,
                            delay_ms = delay.as_millis(),
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(ProviderError::RateLimited {
                        message: error_body,
                    });
                }
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            subject = %subject,
                            status = status.as_u16(),
                            delay_ms = delay.as_millis(),
                            "Retryable error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(ProviderError::Status {
                        status: status.as_u16(),
                        message: error_body,
                    });
                }
                ErrorCategory::NonRetryable => {
                    return match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            Err(ProviderError::Unauthorized)
                        }
                        StatusCode::NOT_FOUND => Err(ProviderError::NotFound {
                            symbol: subject.to_string(),
                        }),
                        _ => Err(ProviderError::Status {
                            status: status.as_u16(),
                            message: error_body,
                        }),
                    };
                }
            }
        }
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500..=599 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_retries: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_retries: config.max_retries,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_retries {
            return None;
        }
        self.attempt += 1;

        let backoff = self.current_backoff.min(self.max_backoff);
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}
