//! Scan outputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::RankBy;

/// One leg of a candidate: the strike and the executable price used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CondorLeg {
    /// Strike price.
    pub strike: f64,
    /// Bid for short legs, ask for long legs.
    pub price: f64,
}

/// A ranked four-leg structure. All money values are per share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondorCandidate {
    /// Bought put (lower wing).
    pub put_long: CondorLeg,
    /// Sold put.
    pub put_short: CondorLeg,
    /// Sold call.
    pub call_short: CondorLeg,
    /// Bought call (upper wing).
    pub call_long: CondorLeg,
    /// Put wing width.
    pub put_width: f64,
    /// Call wing width.
    pub call_width: f64,
    /// Net credit received.
    pub credit: f64,
    /// Equal to the credit.
    pub max_profit: f64,
    /// Wider wing minus credit.
    pub max_loss: f64,
    /// `max_profit / max_loss`.
    pub return_on_risk: f64,
    /// Short put strike minus credit.
    pub lower_breakeven: f64,
    /// Short call strike plus credit.
    pub upper_breakeven: f64,
    /// Lognormal probability of finishing between the breakevens.
    pub probability_of_profit: Option<f64>,
}

impl CondorCandidate {
    /// The value this candidate is ranked on.
    #[must_use]
    pub const fn rank_value(&self, rank_by: RankBy) -> Option<f64> {
        match rank_by {
            RankBy::ReturnOnRisk => Some(self.return_on_risk),
            RankBy::Pop => self.probability_of_profit,
            RankBy::Credit => Some(self.credit),
        }
    }
}

/// Outcome of a scan, with notes explaining any gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondorScanResult {
    /// Underlying symbol.
    pub symbol: String,
    /// Expiration as requested.
    pub expiration: String,
    /// Underlying price used.
    pub underlying: f64,
    /// Chain observation time.
    pub as_of: DateTime<Utc>,
    /// Median implied volatility near the money.
    pub iv_estimate: Option<f64>,
    /// Time to expiration in years.
    pub years_to_expiry: Option<f64>,
    /// Put-spread and call-spread combinations examined.
    pub evaluated: usize,
    /// Best candidates, ranked.
    pub candidates: Vec<CondorCandidate>,
    /// Why results are missing or degraded.
    pub notes: Vec<String>,
}
