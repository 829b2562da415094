//! Strategy shape classification.
//!
//! A closed taxonomy: each shape is an explicit match arm over the leg count
//! and the legs sorted by (strike, type). Anything unmatched is `Custom`.
//! New shapes are added as new arms, never by scoring.

use serde::{Deserialize, Serialize};

use super::leg::{LegAction, StrategyLeg};
use crate::domain::market_data::OptionType;

/// Recognized strategy shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Single bought call.
    LongCall,
    /// Single sold call.
    ShortCall,
    /// Single bought put.
    LongPut,
    /// Single sold put.
    ShortPut,
    /// Buy lower call, sell higher call.
    BullCallSpread,
    /// Sell lower call, buy higher call.
    BearCallSpread,
    /// Buy lower put, sell higher put.
    BullPutSpread,
    /// Sell lower put, buy higher put.
    BearPutSpread,
    /// Same type and strike, different expirations.
    CalendarSpread,
    /// Same type, different strikes and expirations.
    DiagonalSpread,
    /// Bought call and put at the same strike.
    LongStraddle,
    /// Sold call and put at the same strike.
    ShortStraddle,
    /// Bought call and put at different strikes.
    LongStrangle,
    /// Sold call and put at different strikes.
    ShortStrangle,
    /// Long wings, doubled short body, calls.
    LongCallButterfly,
    /// Short wings, doubled long body, calls.
    ShortCallButterfly,
    /// Long wings, doubled short body, puts.
    LongPutButterfly,
    /// Short wings, doubled long body, puts.
    ShortPutButterfly,
    /// Long put wing, short put, short call, long call wing.
    IronCondor,
    /// Iron condor whose short strikes coincide.
    IronButterfly,
    /// Anything else.
    Custom,
}

impl StrategyKind {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LongCall => "Long Call",
            Self::ShortCall => "Short Call",
            Self::LongPut => "Long Put",
            Self::ShortPut => "Short Put",
            Self::BullCallSpread => "Bull Call Spread",
            Self::BearCallSpread => "Bear Call Spread",
            Self::BullPutSpread => "Bull Put Spread",
            Self::BearPutSpread => "Bear Put Spread",
            Self::CalendarSpread => "Calendar Spread",
            Self::DiagonalSpread => "Diagonal Spread",
            Self::LongStraddle => "Long Straddle",
            Self::ShortStraddle => "Short Straddle",
            Self::LongStrangle => "Long Strangle",
            Self::ShortStrangle => "Short Strangle",
            Self::LongCallButterfly => "Long Call Butterfly",
            Self::ShortCallButterfly => "Short Call Butterfly",
            Self::LongPutButterfly => "Long Put Butterfly",
            Self::ShortPutButterfly => "Short Put Butterfly",
            Self::IronCondor => "Iron Condor",
            Self::IronButterfly => "Iron Butterfly",
            Self::Custom => "Custom Strategy",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a leg set.
#[must_use]
pub fn identify_strategy(legs: &[StrategyLeg]) -> StrategyKind {
    let mut sorted: Vec<&StrategyLeg> = legs.iter().collect();
    sorted.sort_by(|a, b| {
        a.strike
            .total_cmp(&b.strike)
            .then_with(|| type_rank(a.option_type).cmp(&type_rank(b.option_type)))
    });

    match sorted.as_slice() {
        [leg] => single(leg),
        [a, b] => two_legs(a, b),
        [a, b, c] => three_legs(a, b, c),
        [a, b, c, d] => four_legs(a, b, c, d),
        _ => StrategyKind::Custom,
    }
}

/// Puts sort before calls at equal strikes.
const fn type_rank(option_type: OptionType) -> u8 {
    match option_type {
        OptionType::Put => 0,
        OptionType::Call => 1,
    }
}

const fn single(leg: &StrategyLeg) -> StrategyKind {
    match (leg.option_type, leg.action) {
        (OptionType::Call, LegAction::Buy) => StrategyKind::LongCall,
        (OptionType::Call, LegAction::Sell) => StrategyKind::ShortCall,
        (OptionType::Put, LegAction::Buy) => StrategyKind::LongPut,
        (OptionType::Put, LegAction::Sell) => StrategyKind::ShortPut,
    }
}

/// `low.strike <= high.strike` is guaranteed by the caller's sort.
fn two_legs(low: &StrategyLeg, high: &StrategyLeg) -> StrategyKind {
    let same_type = low.option_type == high.option_type;
    let same_action = low.action == high.action;
    let same_strike = low.strike == high.strike;
    let same_expiration = low.expiration == high.expiration;

    if same_type {
        if same_action || low.quantity != high.quantity {
            return StrategyKind::Custom;
        }
        return match (same_expiration, same_strike) {
            (true, true) => StrategyKind::Custom,
            (false, true) => StrategyKind::CalendarSpread,
            (false, false) => StrategyKind::DiagonalSpread,
            (true, false) => match (low.option_type, low.action) {
                (OptionType::Call, LegAction::Buy) => StrategyKind::BullCallSpread,
                (OptionType::Call, LegAction::Sell) => StrategyKind::BearCallSpread,
                (OptionType::Put, LegAction::Buy) => StrategyKind::BullPutSpread,
                (OptionType::Put, LegAction::Sell) => StrategyKind::BearPutSpread,
            },
        };
    }

    if !same_action || !same_expiration {
        return StrategyKind::Custom;
    }

    match (same_strike, low.action) {
        (true, LegAction::Buy) => StrategyKind::LongStraddle,
        (true, LegAction::Sell) => StrategyKind::ShortStraddle,
        (false, LegAction::Buy) => StrategyKind::LongStrangle,
        (false, LegAction::Sell) => StrategyKind::ShortStrangle,
    }
}

fn three_legs(low: &StrategyLeg, mid: &StrategyLeg, high: &StrategyLeg) -> StrategyKind {
    let option_type = low.option_type;
    let uniform = mid.option_type == option_type
        && high.option_type == option_type
        && mid.expiration == low.expiration
        && high.expiration == low.expiration;
    let distinct_strikes = low.strike < mid.strike && mid.strike < high.strike;
    let wings_match = low.action == high.action && low.quantity == high.quantity;
    let body_opposes = mid.action != low.action && mid.quantity == low.quantity * 2;

    if !(uniform && distinct_strikes && wings_match && body_opposes) {
        return StrategyKind::Custom;
    }

    match (option_type, low.action) {
        (OptionType::Call, LegAction::Buy) => StrategyKind::LongCallButterfly,
        (OptionType::Call, LegAction::Sell) => StrategyKind::ShortCallButterfly,
        (OptionType::Put, LegAction::Buy) => StrategyKind::LongPutButterfly,
        (OptionType::Put, LegAction::Sell) => StrategyKind::ShortPutButterfly,
    }
}

fn four_legs(a: &StrategyLeg, b: &StrategyLeg, c: &StrategyLeg, d: &StrategyLeg) -> StrategyKind {
    let legs = [a, b, c, d];
    let same_expiration = legs.iter().all(|leg| leg.expiration == a.expiration);
    let same_quantity = legs.iter().all(|leg| leg.quantity == a.quantity);
    if !same_expiration || !same_quantity {
        return StrategyKind::Custom;
    }

    let shape = legs.map(|leg| (leg.option_type, leg.action));
    let iron = [
        (OptionType::Put, LegAction::Buy),
        (OptionType::Put, LegAction::Sell),
        (OptionType::Call, LegAction::Sell),
        (OptionType::Call, LegAction::Buy),
    ];
    if shape != iron || a.strike >= b.strike || c.strike >= d.strike {
        return StrategyKind::Custom;
    }

    if b.strike == c.strike {
        StrategyKind::IronButterfly
    } else if b.strike < c.strike {
        StrategyKind::IronCondor
    } else {
        StrategyKind::Custom
    }
}
