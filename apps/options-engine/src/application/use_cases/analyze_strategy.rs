//! Analyze Strategy Use Case
//!
//! Prices the underlying through [`GetQuoteUseCase`], fills in Greeks the
//! caller did not supply with Black-Scholes, and runs the evaluator.

use chrono::{DateTime, Utc};

use super::get_quote::GetQuoteUseCase;
use crate::config::PricingConfig;
use crate::domain::condor::years_until;
use crate::domain::pricing::black_scholes_greeks;
use crate::domain::strategy::{StrategyAnalysis, StrategyLeg, analyze_strategy};
use crate::error::EngineError;

/// Use case for evaluating a multi-leg strategy against the current price.
#[derive(Debug, Clone)]
pub struct AnalyzeStrategyUseCase {
    quotes: GetQuoteUseCase,
    pricing: PricingConfig,
}

impl AnalyzeStrategyUseCase {
    /// Create a new AnalyzeStrategyUseCase.
    #[must_use]
    pub const fn new(quotes: GetQuoteUseCase, pricing: PricingConfig) -> Self {
        Self { quotes, pricing }
    }

    /// Execute the use case.
    ///
    /// `volatility` is used only for legs without a delta.
    ///
    /// # Errors
    ///
    /// Returns an error if no quote source can price the underlying.
    pub async fn execute(
        &self,
        symbol: &str,
        legs: &[StrategyLeg],
        volatility: Option<f64>,
    ) -> Result<StrategyAnalysis, EngineError> {
        let sourced = self.quotes.execute(symbol).await?;
        let as_of = sourced.quote.as_of.unwrap_or_else(Utc::now);

        let analysis = self.analyze_at(legs, sourced.quote.price, volatility, as_of);
        tracing::info!(
            symbol = %symbol,
            strategy = %analysis.name,
            source = ?sourced.source,
            legs = legs.len(),
            rejected = analysis.rejected_legs.len(),
            "Strategy analyzed"
        );
        Ok(analysis)
    }

    /// Evaluate at a known underlying price and time.
    #[must_use]
    pub fn analyze_at(
        &self,
        legs: &[StrategyLeg],
        underlying: f64,
        volatility: Option<f64>,
        as_of: DateTime<Utc>,
    ) -> StrategyAnalysis {
        let sigma = volatility.filter(|v| v.is_finite() && *v > 0.0);
        let missing = legs.iter().filter(|leg| leg.delta.is_none()).count();

        let priced: Vec<StrategyLeg> = match sigma {
            Some(sigma) if underlying.is_finite() && underlying > 0.0 => legs
                .iter()
                .map(|leg| self.with_model_greeks(leg, underlying, sigma, as_of))
                .collect(),
            _ => legs.to_vec(),
        };

        let mut analysis = analyze_strategy(&priced, underlying);
        if missing > 0 && sigma.is_none() {
            analysis.notes.push(format!(
                "{missing} leg(s) without Greeks and no volatility supplied; counted as zero"
            ));
        }
        analysis
    }

    fn with_model_greeks(
        &self,
        leg: &StrategyLeg,
        underlying: f64,
        sigma: f64,
        as_of: DateTime<Utc>,
    ) -> StrategyLeg {
        if leg.delta.is_some() {
            return leg.clone();
        }
        let years = years_until(leg.expiration, as_of);
        let greeks = black_scholes_greeks(
            underlying,
            leg.strike,
            years,
            self.pricing.risk_free_rate,
            sigma,
            leg.option_type,
        );
        leg.clone()
            .with_greeks(greeks.delta, greeks.gamma, greeks.theta, greeks.vega)
    }
}
