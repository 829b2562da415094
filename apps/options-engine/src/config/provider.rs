//! Market data provider configuration.

use serde::{Deserialize, Serialize};

/// REST provider connection and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key, usually `${POLYGON_API_KEY}`.
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after the first attempt for retryable failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First retry delay in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Retry delay ceiling in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Maximum pages followed per paginated listing.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            max_pages: default_max_pages(),
        }
    }
}

/// Caller-side timeout for the live-then-daily quote fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteFallbackConfig {
    /// Timeout applied to each quote source, in milliseconds.
    #[serde(default = "default_fallback_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for QuoteFallbackConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_fallback_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.polygon.io".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    250
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

const fn default_max_pages() -> usize {
    10
}

const fn default_fallback_timeout_ms() -> u64 {
    2_500
}
