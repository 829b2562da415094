//! Polygon adapter configuration.

use std::time::Duration;

use crate::config::ProviderConfig;

/// How `get_quote` prices a symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteMode {
    /// Last trade (`/v2/last/trade/{sym}`).
    #[default]
    LastTrade,
    /// Previous session close (`/v2/aggs/ticker/{sym}/prev`).
    PreviousClose,
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

/// Configuration for the Polygon market data adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonConfig {
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// API key.
    pub api_key: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Retry policy configuration.
    pub retry: RetryConfig,
    /// Maximum pages followed per listing.
    pub max_pages: usize,
    /// Quote source.
    pub quote_mode: QuoteMode,
}

impl PolygonConfig {
    /// Create a new configuration with default timeout and retry settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            max_pages: 10,
            quote_mode: QuoteMode::default(),
        }
    }

    /// Build from the provider section of the engine config.
    #[must_use]
    pub fn from_provider_config(config: &ProviderConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            retry: RetryConfig {
                max_retries: config.max_retries,
                initial_backoff: Duration::from_millis(config.initial_backoff_ms),
                max_backoff: Duration::from_millis(config.max_backoff_ms),
                multiplier: 2.0,
            },
            max_pages: config.max_pages,
            ..Self::new(config.base_url.as_str(), config.api_key.as_str())
        }
    }

    /// Set the quote source.
    #[must_use]
    pub const fn with_quote_mode(mut self, quote_mode: QuoteMode) -> Self {
        self.quote_mode = quote_mode;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_provider_config_maps_fields() {
        let provider = ProviderConfig {
            base_url: "http://localhost:9000/".to_string(),
            api_key: "key".to_string(),
            timeout_ms: 1_500,
            max_retries: 1,
            initial_backoff_ms: 10,
            max_backoff_ms: 40,
            max_pages: 2,
        };
        let config = PolygonConfig::from_provider_config(&provider);

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_millis(1_500));
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.max_backoff, Duration::from_millis(40));
        assert_eq!(config.max_pages, 2);
        assert_eq!(config.quote_mode, QuoteMode::LastTrade);
    }
}
