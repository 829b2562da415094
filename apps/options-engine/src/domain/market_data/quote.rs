//! Underlying quote value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest price for a symbol as reported by a provider.
///
/// Immutable once produced. A cached quote's lifetime is a gateway policy and
/// says nothing about whether the price is still current in the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol (e.g., "SPY").
    pub symbol: String,
    /// Last price.
    pub price: f64,
    /// Provider timestamp for the price, when known.
    pub as_of: Option<DateTime<Utc>>,
}

impl Quote {
    /// Create a new quote.
    #[must_use]
    pub fn new(symbol: impl Into<String>, price: f64, as_of: Option<DateTime<Utc>>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            as_of,
        }
    }

    /// Whether the price is usable as an underlying price.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
