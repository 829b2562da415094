//! Leg filtering ahead of the search.

use super::request::LiquidityFilter;
use crate::domain::market_data::ChainLeg;
use crate::domain::shared::ValidationError;

/// A leg that passed cleaning, with its executable prices unwrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanLeg {
    /// Strike price.
    pub strike: f64,
    /// Bid.
    pub bid: f64,
    /// Ask.
    pub ask: f64,
    /// Implied volatility, if the provider supplied one.
    pub implied_volatility: Option<f64>,
}

/// Why a leg did not survive cleaning.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Malformed strike or market.
    Invalid(ValidationError),
    /// Bid or ask missing.
    Untradeable,
    /// Spread too wide relative to the midpoint.
    WideSpread,
    /// Open interest or volume below the minimum.
    Illiquid,
}

/// Check one leg against the filter.
pub fn clean_leg(leg: &ChainLeg, filter: &LiquidityFilter) -> Result<CleanLeg, Rejection> {
    if !leg.strike.is_finite() || leg.strike <= 0.0 {
        return Err(Rejection::Invalid(ValidationError::InvalidStrike {
            strike: leg.strike,
        }));
    }
    let (Some(bid), Some(ask)) = (leg.bid, leg.ask) else {
        return Err(Rejection::Untradeable);
    };
    if !bid.is_finite() || !ask.is_finite() || bid < 0.0 {
        return Err(Rejection::Untradeable);
    }
    if ask < bid {
        return Err(Rejection::Invalid(ValidationError::InvertedMarket { bid, ask }));
    }

    let mid = bid.midpoint(ask);
    if mid <= 0.0 || (ask - bid) / mid > filter.max_spread_pct {
        return Err(Rejection::WideSpread);
    }

    if leg.open_interest.unwrap_or(0) < filter.min_open_interest
        || leg.volume.unwrap_or(0) < filter.min_volume
    {
        return Err(Rejection::Illiquid);
    }

    Ok(CleanLeg {
        strike: leg.strike,
        bid,
        ask,
        implied_volatility: leg.implied_volatility,
    })
}

/// Keep the legs that pass, sorted by ascending strike.
#[must_use]
pub fn clean_legs(legs: &[ChainLeg], filter: &LiquidityFilter) -> Vec<CleanLeg> {
    let mut kept: Vec<CleanLeg> = legs
        .iter()
        .filter_map(|leg| match clean_leg(leg, filter) {
            Ok(clean) => Some(clean),
            Err(rejection) => {
                tracing::trace!(strike = leg.strike, ?rejection, "Dropped chain leg");
                None
            }
        })
        .collect();
    kept.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    kept
}
