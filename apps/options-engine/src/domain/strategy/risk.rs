//! Profit and loss bounds for multi-leg positions.
//!
//! Expiration P&L is piecewise linear in the underlying price with kinks only
//! at strikes, so sampling at the strikes plus a few points beyond them finds
//! the extremes of any bounded position. Unbounded tails are detected from the
//! net call and put quantities before any sampling happens.

use serde::{Deserialize, Serialize};

use super::leg::{LegAction, StrategyLeg};
use super::payoff::{PnlMode, strategy_pl};
use crate::domain::market_data::OptionType;

/// Direction(s) in which a position's P&L is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    /// More short calls than long calls: loss grows without limit as price rises.
    pub unlimited_upside_loss: bool,
    /// More short puts than long puts. The zero-price floor is ignored and
    /// this is reported as unlimited loss.
    pub unlimited_downside_loss: bool,
    /// More long calls than short calls: profit grows without limit.
    pub unlimited_profit: bool,
}

impl Exposure {
    /// Whether loss is unbounded in either direction.
    #[must_use]
    pub const fn has_unlimited_loss(&self) -> bool {
        self.unlimited_upside_loss || self.unlimited_downside_loss
    }
}

fn net_quantity(legs: &[StrategyLeg], option_type: OptionType) -> i64 {
    legs.iter()
        .filter(|leg| leg.option_type == option_type)
        .map(|leg| match leg.action {
            LegAction::Buy => i64::from(leg.quantity),
            LegAction::Sell => -i64::from(leg.quantity),
        })
        .sum()
}

/// Classify the unbounded tails of a position.
#[must_use]
pub fn exposure(legs: &[StrategyLeg]) -> Exposure {
    let net_calls = net_quantity(legs, OptionType::Call);
    let net_puts = net_quantity(legs, OptionType::Put);

    Exposure {
        unlimited_upside_loss: net_calls < 0,
        unlimited_downside_loss: net_puts < 0,
        unlimited_profit: net_calls > 0,
    }
}

/// Underlying prices at which expiration P&L is sampled.
///
/// Zero, half the lowest strike, every strike, and 1.5x/2x/3x the highest
/// strike. Sorted and deduplicated.
#[must_use]
pub fn price_grid(legs: &[StrategyLeg]) -> Vec<f64> {
    let strikes = || legs.iter().map(|leg| leg.strike);
    let Some(min_strike) = strikes().reduce(f64::min) else {
        return Vec::new();
    };
    let max_strike = strikes().fold(min_strike, f64::max);

    let mut grid: Vec<f64> = [0.0, min_strike * 0.5]
        .into_iter()
        .chain(strikes())
        .chain([max_strike * 1.5, max_strike * 2.0, max_strike * 3.0])
        .collect();
    grid.sort_by(f64::total_cmp);
    grid.dedup();
    grid
}

fn sampled_pl(legs: &[StrategyLeg]) -> impl Iterator<Item = f64> + '_ {
    price_grid(legs)
        .into_iter()
        .map(move |price| strategy_pl(legs, price, PnlMode::AtExpiration))
}

/// Maximum expiration profit in dollars, `None` when unbounded or no legs.
#[must_use]
pub fn max_profit(legs: &[StrategyLeg]) -> Option<f64> {
    if exposure(legs).unlimited_profit {
        return None;
    }
    sampled_pl(legs).reduce(f64::max)
}

/// Maximum expiration loss in dollars as the lowest P&L (zero or negative for
/// risk-bearing positions), `None` when unbounded or no legs.
#[must_use]
pub fn max_loss(legs: &[StrategyLeg]) -> Option<f64> {
    if exposure(legs).has_unlimited_loss() {
        return None;
    }
    sampled_pl(legs).reduce(f64::min)
}

/// `max_profit / |max_loss|`, `None` when either bound is unbounded or the
/// loss is zero.
#[must_use]
pub fn return_on_risk(legs: &[StrategyLeg]) -> Option<f64> {
    let profit = max_profit(legs)?;
    let loss = max_loss(legs)?;
    if loss == 0.0 {
        return None;
    }
    Some(profit / loss.abs())
}
