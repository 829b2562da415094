//! Market Data Port (Driven Port)
//!
//! Interface for fetching quotes and raw option contract records from an
//! external provider. The gateway wraps this port with caching and request
//! coalescing; adapters live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::market_data::Quote;

/// One contract as the provider reports it, before normalization.
///
/// Every field except `ticker` is optional because providers omit fields
/// freely; normalization decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Provider contract ticker (OCC-style, e.g. `O:SPY260320C00105000`).
    pub ticker: Option<String>,
    /// Declared contract type (`call` / `put`).
    pub contract_type: Option<String>,
    /// Expiration date string, expected as `YYYY-MM-DD`.
    pub expiration_date: Option<String>,
    /// Strike price.
    pub strike_price: Option<f64>,
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Session volume.
    pub volume: Option<u64>,
    /// Open interest.
    pub open_interest: Option<u64>,
    /// Implied volatility as a decimal.
    pub implied_volatility: Option<f64>,
    /// Delta.
    pub delta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
}

/// Raw chain snapshot for one underlying and expiration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying price, when the provider includes it.
    pub underlying_price: Option<f64>,
    /// Snapshot time, when the provider includes it.
    pub as_of: Option<DateTime<Utc>>,
    /// Contract records (may include other expirations).
    pub records: Vec<ContractRecord>,
}

/// Provider failure.
///
/// `Clone` so every caller coalesced onto one provider call receives the
/// same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Connection or I/O failure.
    #[error("Provider transport error: {message}")]
    Transport {
        /// Error details.
        message: String,
    },

    /// Unexpected HTTP status.
    #[error("Provider returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Rate limited by the provider.
    #[error("Provider rate limited: {message}")]
    RateLimited {
        /// Error details.
        message: String,
    },

    /// Unknown symbol or contract.
    #[error("Not found: {symbol}")]
    NotFound {
        /// The symbol requested.
        symbol: String,
    },

    /// Credentials rejected.
    #[error("Provider authentication failed")]
    Unauthorized,

    /// Response could not be decoded.
    #[error("Failed to parse provider response: {message}")]
    Parse {
        /// Error details.
        message: String,
    },

    /// The task running the provider call panicked or was cancelled.
    #[error("Provider task failed: {message}")]
    TaskFailed {
        /// Error details.
        message: String,
    },
}

impl ProviderError {
    /// Whether a fresh call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::RateLimited { .. } | Self::TaskFailed { .. }
        ) || matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}

/// Port for fetching market data from an external provider.
///
/// Symbols arrive already normalized (trimmed, upper-cased).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Latest price for a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError>;

    /// Every listed contract for an underlying, across expirations.
    async fn list_contracts(&self, symbol: &str) -> Result<Vec<ContractRecord>, ProviderError>;

    /// Chain snapshot for one expiration.
    async fn get_chain_snapshot(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<ChainSnapshot, ProviderError>;
}
