//! Heuristic probability of profit for arbitrary leg sets.
//!
//! This is not a distributional model. The condor scanner ranks on its own
//! lognormal POP; these numbers feed strategy summaries, and their scale is
//! fixed: `[0.5, 0.95]` for two-breakeven shapes, a delta bump otherwise.

use super::breakeven::breakevens;
use super::leg::StrategyLeg;

/// Default when no better heuristic applies.
pub const NEUTRAL_POP: f64 = 0.5;

/// Added to `NEUTRAL_POP` at perfect centrality between two breakevens.
const CENTRALITY_RANGE: f64 = 0.45;

/// Aggregate delta magnitude above which a position counts as directional.
const DIRECTIONAL_DELTA: f64 = 0.1;

/// POP added per unit of aggregate delta (capped at one unit).
const DELTA_SLOPE: f64 = 0.3;

/// Quantity-weighted sum of leg deltas (long positive, short negative).
///
/// Legs without a delta contribute nothing.
#[must_use]
pub fn aggregate_delta(legs: &[StrategyLeg]) -> f64 {
    legs.iter()
        .filter_map(|leg| leg.delta.map(|delta| delta * leg.signed_quantity()))
        .sum()
}

/// POP from precomputed breakevens.
#[must_use]
pub fn probability_from_breakevens(
    breakevens: &[f64],
    current_price: f64,
    aggregate_delta: f64,
) -> f64 {
    if let [lower, upper] = *breakevens {
        let half_width = (upper - lower) / 2.0;
        if half_width > 0.0 {
            let center = lower.midpoint(upper);
            let centrality = (1.0 - (current_price - center).abs() / half_width).clamp(0.0, 1.0);
            return NEUTRAL_POP + CENTRALITY_RANGE * centrality;
        }
    }

    if aggregate_delta.abs() > DIRECTIONAL_DELTA {
        return NEUTRAL_POP + DELTA_SLOPE * aggregate_delta.abs().min(1.0);
    }

    NEUTRAL_POP
}

/// Heuristic probability of profit at the current underlying price.
#[must_use]
pub fn probability_of_profit(legs: &[StrategyLeg], current_price: f64) -> f64 {
    probability_from_breakevens(&breakevens(legs), current_price, aggregate_delta(legs))
}
