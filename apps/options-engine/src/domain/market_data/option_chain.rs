//! Option chain value objects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl OptionType {
    /// Intrinsic value per share at the given underlying price.
    #[must_use]
    pub fn intrinsic(self, underlying: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (underlying - strike).max(0.0),
            Self::Put => (strike - underlying).max(0.0),
        }
    }

    /// Parse a provider contract type ("call", "PUT", "c", ...).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Some(Self::Call),
            "put" | "p" => Some(Self::Put),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// One side of an option contract at a single strike and expiration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainLeg {
    /// Strike price.
    pub strike: f64,
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Session volume.
    pub volume: Option<u64>,
    /// Open interest.
    pub open_interest: Option<u64>,
    /// Implied volatility in decimal form (0.25 = 25%).
    pub implied_volatility: Option<f64>,
    /// Delta.
    pub delta: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
    /// Provider contract ticker.
    pub ticker: Option<String>,
}

impl ChainLeg {
    /// Create a leg with only a strike and a two-sided market.
    #[must_use]
    pub fn quoted(strike: f64, bid: f64, ask: f64) -> Self {
        Self {
            strike,
            bid: Some(bid),
            ask: Some(ask),
            ..Self::default()
        }
    }

    /// Set volume and open interest.
    #[must_use]
    pub const fn with_liquidity(mut self, volume: u64, open_interest: u64) -> Self {
        self.volume = Some(volume);
        self.open_interest = Some(open_interest);
        self
    }

    /// Set implied volatility.
    #[must_use]
    pub const fn with_iv(mut self, implied_volatility: f64) -> Self {
        self.implied_volatility = Some(implied_volatility);
        self
    }

    /// A leg is tradeable only with both bid and ask present.
    #[must_use]
    pub const fn is_tradeable(&self) -> bool {
        self.bid.is_some() && self.ask.is_some()
    }

    /// Midpoint of bid and ask.
    #[must_use]
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(bid.midpoint(ask)),
            _ => None,
        }
    }

    /// Bid/ask spread as a fraction of the midpoint.
    #[must_use]
    pub fn spread_pct(&self) -> Option<f64> {
        let (bid, ask) = (self.bid?, self.ask?);
        let mid = bid.midpoint(ask);
        if mid > 0.0 { Some((ask - bid) / mid) } else { None }
    }
}

/// Calls and puts for one underlying and one expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    /// Underlying symbol.
    pub symbol: String,
    /// Underlying price.
    pub underlying: f64,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Calls, ascending by strike.
    pub calls: Vec<ChainLeg>,
    /// Puts, ascending by strike.
    pub puts: Vec<ChainLeg>,
    /// Snapshot timestamp.
    pub as_of: DateTime<Utc>,
}

impl OptionChain {
    /// Total number of legs on both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    /// Whether the chain has no legs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}
