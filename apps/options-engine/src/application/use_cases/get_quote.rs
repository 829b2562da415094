//! Get Quote Use Case
//!
//! Live price first, previous daily close second. Each source gets the same
//! caller-side timeout; the gateways themselves never time out.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::MarketDataGateway;
use crate::domain::market_data::Quote;
use crate::error::EngineError;

/// Which source answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// Live last-trade price.
    Live,
    /// Previous session's daily bar.
    DailyHistory,
}

/// Quote plus the source that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedQuote {
    /// The quote.
    pub quote: Arc<Quote>,
    /// Where it came from.
    pub source: QuoteSource,
}

/// Use case for fetching an underlying price with a daily-history fallback.
#[derive(Debug, Clone)]
pub struct GetQuoteUseCase {
    live: MarketDataGateway,
    daily: MarketDataGateway,
    timeout: Duration,
}

impl GetQuoteUseCase {
    /// Create a new GetQuoteUseCase.
    #[must_use]
    pub const fn new(live: MarketDataGateway, daily: MarketDataGateway, timeout: Duration) -> Self {
        Self {
            live,
            daily,
            timeout,
        }
    }

    async fn fetch(
        &self,
        gateway: &MarketDataGateway,
        symbol: &str,
        operation: &str,
    ) -> Result<Arc<Quote>, EngineError> {
        match tokio::time::timeout(self.timeout, gateway.get_quote(symbol)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(EngineError::Timeout {
                operation: operation.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns the daily-history error when both sources fail.
    pub async fn execute(&self, symbol: &str) -> Result<SourcedQuote, EngineError> {
        match self.fetch(&self.live, symbol, "live quote").await {
            Ok(quote) => {
                return Ok(SourcedQuote {
                    quote,
                    source: QuoteSource::Live,
                });
            }
            Err(error) => {
                tracing::warn!(
                    symbol = %symbol,
                    error = %error,
                    "Live quote unavailable, falling back to daily history"
                );
            }
        }

        let quote = self.fetch(&self.daily, symbol, "daily quote").await?;
        Ok(SourcedQuote {
            quote,
            source: QuoteSource::DailyHistory,
        })
    }
}
