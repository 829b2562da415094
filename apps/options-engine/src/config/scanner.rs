//! Iron condor scanner defaults.

use serde::{Deserialize, Serialize};

use crate::domain::condor::{DEFAULT_MAX_WIDTH_PCT, DEFAULT_TOP_N, LiquidityFilter, RankBy};

/// Default scan settings applied by `ScanIronCondorsUseCase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Candidates returned.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Ranking policy.
    #[serde(default)]
    pub rank_by: RankBy,
    /// Minimum open interest per leg.
    #[serde(default = "default_min_open_interest")]
    pub min_open_interest: u64,
    /// Minimum volume per leg.
    #[serde(default)]
    pub min_volume: u64,
    /// Maximum `(ask - bid) / mid` per leg.
    #[serde(default = "default_max_spread_pct")]
    pub max_spread_pct: f64,
    /// Maximum wing width as a fraction of the underlying.
    #[serde(default = "default_max_width_pct")]
    pub max_width_pct: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            rank_by: RankBy::default(),
            min_open_interest: default_min_open_interest(),
            min_volume: 0,
            max_spread_pct: default_max_spread_pct(),
            max_width_pct: default_max_width_pct(),
        }
    }
}

impl ScannerConfig {
    /// Liquidity filter built from the configured minimums.
    #[must_use]
    pub const fn liquidity(&self) -> LiquidityFilter {
        LiquidityFilter {
            min_open_interest: self.min_open_interest,
            min_volume: self.min_volume,
            max_spread_pct: self.max_spread_pct,
        }
    }
}

const fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

const fn default_min_open_interest() -> u64 {
    10
}

const fn default_max_spread_pct() -> f64 {
    0.5
}

const fn default_max_width_pct() -> f64 {
    DEFAULT_MAX_WIDTH_PCT
}
