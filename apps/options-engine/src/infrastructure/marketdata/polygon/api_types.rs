//! Polygon REST response types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::application::ports::ContractRecord;

/// `/v2/last/trade/{sym}` response.
#[derive(Debug, Deserialize)]
pub struct LastTradeResponse {
    /// Trade, absent for unknown symbols.
    pub results: Option<LastTrade>,
}

/// A single trade.
#[derive(Debug, Deserialize)]
pub struct LastTrade {
    /// Trade price.
    #[serde(rename = "p")]
    pub price: f64,
    /// SIP timestamp in nanoseconds.
    #[serde(rename = "t")]
    pub timestamp_ns: Option<i64>,
}

/// `/v2/aggs/ticker/{sym}/prev` response.
#[derive(Debug, Deserialize)]
pub struct PreviousCloseResponse {
    /// Daily bars (one for a known symbol).
    #[serde(default)]
    pub results: Vec<DailyBar>,
}

/// Daily aggregate bar.
#[derive(Debug, Deserialize)]
pub struct DailyBar {
    /// Close price.
    #[serde(rename = "c")]
    pub close: f64,
    /// Bar start in milliseconds.
    #[serde(rename = "t")]
    pub timestamp_ms: Option<i64>,
}

/// Paginated listing envelope.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Absolute URL of the next page.
    pub next_url: Option<String>,
}

/// `/v3/reference/options/contracts` item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractReference {
    /// Contract ticker.
    pub ticker: Option<String>,
    /// `call` / `put`.
    pub contract_type: Option<String>,
    /// `YYYY-MM-DD`.
    pub expiration_date: Option<String>,
    /// Strike price.
    pub strike_price: Option<f64>,
}

impl From<ContractReference> for ContractRecord {
    fn from(reference: ContractReference) -> Self {
        Self {
            ticker: reference.ticker,
            contract_type: reference.contract_type,
            expiration_date: reference.expiration_date,
            strike_price: reference.strike_price,
            ..Self::default()
        }
    }
}

/// `/v3/snapshot/options/{sym}` item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionSnapshot {
    /// Contract details.
    #[serde(default)]
    pub details: ContractReference,
    /// Latest NBBO.
    pub last_quote: Option<SnapshotQuote>,
    /// Session aggregate.
    pub day: Option<SnapshotDay>,
    /// Open interest.
    pub open_interest: Option<u64>,
    /// Implied volatility.
    pub implied_volatility: Option<f64>,
    /// Greeks.
    pub greeks: Option<SnapshotGreeks>,
    /// Underlying price.
    pub underlying_asset: Option<UnderlyingAsset>,
}

/// Snapshot NBBO.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotQuote {
    /// Bid.
    pub bid: Option<f64>,
    /// Ask.
    pub ask: Option<f64>,
    /// Last update in nanoseconds.
    pub last_updated: Option<i64>,
}

/// Snapshot session aggregate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotDay {
    /// Session volume.
    pub volume: Option<f64>,
}

/// Snapshot Greeks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotGreeks {
    /// Delta.
    pub delta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
}

/// Snapshot underlying.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnderlyingAsset {
    /// Underlying price.
    pub price: Option<f64>,
}

impl OptionSnapshot {
    /// Quote timestamp, when present.
    pub fn quoted_at(&self) -> Option<DateTime<Utc>> {
        self.last_quote
            .as_ref()
            .and_then(|quote| quote.last_updated)
            .map(DateTime::from_timestamp_nanos)
    }

    /// Underlying price, when present.
    pub fn underlying_price(&self) -> Option<f64> {
        self.underlying_asset.as_ref().and_then(|asset| asset.price)
    }
}

impl From<OptionSnapshot> for ContractRecord {
    fn from(snapshot: OptionSnapshot) -> Self {
        let quote = snapshot.last_quote.unwrap_or_default();
        let greeks = snapshot.greeks.unwrap_or_default();
        let volume = snapshot
            .day
            .and_then(|day| day.volume)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64);
        Self {
            bid: quote.bid,
            ask: quote.ask,
            volume,
            open_interest: snapshot.open_interest,
            implied_volatility: snapshot.implied_volatility,
            delta: greeks.delta,
            gamma: greeks.gamma,
            theta: greeks.theta,
            vega: greeks.vega,
            ..Self::from(snapshot.details)
        }
    }
}
