//! Scan inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::market_data::{ChainLeg, OptionChain};

/// Default number of candidates returned.
pub const DEFAULT_TOP_N: usize = 10;

/// Hard ceiling on candidates returned.
pub const MAX_TOP_N: usize = 50;

/// Default maximum wing width as a fraction of the underlying.
pub const DEFAULT_MAX_WIDTH_PCT: f64 = 0.10;

/// Ordering applied to surviving candidates (always descending).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Max profit over max loss.
    #[default]
    ReturnOnRisk,
    /// Lognormal probability of profit.
    Pop,
    /// Net credit per share.
    Credit,
}

/// Minimum liquidity a leg must show to be considered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityFilter {
    /// Minimum open interest (missing counts as zero).
    #[serde(default)]
    pub min_open_interest: u64,
    /// Minimum session volume (missing counts as zero).
    #[serde(default)]
    pub min_volume: u64,
    /// Maximum `(ask - bid) / mid`.
    #[serde(default = "default_max_spread_pct")]
    pub max_spread_pct: f64,
}

const fn default_max_spread_pct() -> f64 {
    0.5
}

impl Default for LiquidityFilter {
    fn default() -> Self {
        Self {
            min_open_interest: 0,
            min_volume: 0,
            max_spread_pct: default_max_spread_pct(),
        }
    }
}

/// Everything the scanner needs, already fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondorScanRequest {
    /// Underlying symbol.
    pub symbol: String,
    /// Expiration as `YYYY-MM-DD`.
    pub expiration: String,
    /// Underlying price.
    pub underlying: f64,
    /// Time the chain was observed.
    pub as_of: DateTime<Utc>,
    /// Raw call legs.
    pub calls: Vec<ChainLeg>,
    /// Raw put legs.
    pub puts: Vec<ChainLeg>,
    /// Number of candidates to return, clamped to `[1, 50]`.
    pub top_n: usize,
    /// Ranking policy.
    pub rank_by: RankBy,
    /// Leg liquidity requirements.
    pub liquidity: LiquidityFilter,
    /// Maximum wing width as a fraction of the underlying.
    pub max_width_pct: f64,
}

impl CondorScanRequest {
    /// Build a request from a fetched chain with default scan settings.
    #[must_use]
    pub fn from_chain(chain: &OptionChain) -> Self {
        Self {
            symbol: chain.symbol.clone(),
            expiration: chain.expiration.format("%Y-%m-%d").to_string(),
            underlying: chain.underlying,
            as_of: chain.as_of,
            calls: chain.calls.clone(),
            puts: chain.puts.clone(),
            top_n: DEFAULT_TOP_N,
            rank_by: RankBy::default(),
            liquidity: LiquidityFilter::default(),
            max_width_pct: DEFAULT_MAX_WIDTH_PCT,
        }
    }

    /// Set the number of candidates to return.
    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the ranking policy.
    #[must_use]
    pub const fn with_rank_by(mut self, rank_by: RankBy) -> Self {
        self.rank_by = rank_by;
        self
    }

    /// Set the liquidity filter.
    #[must_use]
    pub const fn with_liquidity(mut self, liquidity: LiquidityFilter) -> Self {
        self.liquidity = liquidity;
        self
    }

    /// Set the maximum wing width fraction.
    #[must_use]
    pub const fn with_max_width_pct(mut self, max_width_pct: f64) -> Self {
        self.max_width_pct = max_width_pct;
        self
    }

    /// `top_n` clamped to `[1, MAX_TOP_N]`.
    #[must_use]
    pub fn effective_top_n(&self) -> usize {
        self.top_n.clamp(1, MAX_TOP_N)
    }
}
