//! Per-leg and aggregate profit and loss.

use serde::{Deserialize, Serialize};

use super::leg::{CONTRACT_MULTIPLIER, StrategyLeg};

/// How a leg's contract is valued when computing P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PnlMode {
    /// Contract valued at intrinsic value on expiration day.
    AtExpiration,
    /// Contract marked at its own entry premium, with no repricing and no
    /// time decay. Every leg therefore shows zero P&L in this mode.
    MarkedAtEntry,
}

/// P&L of one leg in dollars at the given underlying price.
#[must_use]
pub fn leg_pl(leg: &StrategyLeg, price: f64, mode: PnlMode) -> f64 {
    let value = match mode {
        PnlMode::AtExpiration => leg.option_type.intrinsic(price, leg.strike),
        PnlMode::MarkedAtEntry => leg.premium,
    };
    leg.signed_quantity() * (value - leg.premium) * CONTRACT_MULTIPLIER
}

/// Sum of leg P&L in dollars at the given underlying price.
#[must_use]
pub fn strategy_pl(legs: &[StrategyLeg], price: f64, mode: PnlMode) -> f64 {
    legs.iter().map(|leg| leg_pl(leg, price, mode)).sum()
}
