//! Scan Iron Condors Use Case

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::services::MarketDataGateway;
use crate::config::ScannerConfig;
use crate::domain::condor::{
    CondorScanRequest, CondorScanResult, LiquidityFilter, RankBy, scan_iron_condors,
};
use crate::error::EngineError;
use crate::observability::record_condor_scan;

/// Per-request overrides of the configured scan defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanOverrides {
    /// Candidates returned.
    pub top_n: Option<usize>,
    /// Ranking policy.
    pub rank_by: Option<RankBy>,
    /// Leg liquidity requirements.
    pub liquidity: Option<LiquidityFilter>,
    /// Maximum wing width as a fraction of the underlying.
    pub max_width_pct: Option<f64>,
}

/// Use case for fetching a chain and ranking iron condors on it.
#[derive(Debug, Clone)]
pub struct ScanIronCondorsUseCase {
    gateway: MarketDataGateway,
    defaults: ScannerConfig,
}

impl ScanIronCondorsUseCase {
    /// Create a new ScanIronCondorsUseCase.
    #[must_use]
    pub const fn new(gateway: MarketDataGateway, defaults: ScannerConfig) -> Self {
        Self { gateway, defaults }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain cannot be fetched. An empty or degraded
    /// scan is not an error; see the result's notes.
    pub async fn execute(
        &self,
        symbol: &str,
        expiration: NaiveDate,
        overrides: ScanOverrides,
    ) -> Result<CondorScanResult, EngineError> {
        let chain = self.gateway.get_chain(symbol, expiration).await?;

        let request = CondorScanRequest::from_chain(&chain)
            .with_top_n(overrides.top_n.unwrap_or(self.defaults.top_n))
            .with_rank_by(overrides.rank_by.unwrap_or(self.defaults.rank_by))
            .with_liquidity(
                overrides
                    .liquidity
                    .unwrap_or_else(|| self.defaults.liquidity()),
            )
            .with_max_width_pct(
                overrides
                    .max_width_pct
                    .unwrap_or(self.defaults.max_width_pct),
            );

        let result = scan_iron_condors(&request);
        record_condor_scan(result.candidates.len());
        tracing::info!(
            symbol = %result.symbol,
            expiration = %result.expiration,
            evaluated = result.evaluated,
            candidates = result.candidates.len(),
            notes = result.notes.len(),
            "Iron condor scan complete"
        );
        Ok(result)
    }
}
