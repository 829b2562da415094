//! Strategy evaluator integration tests.
//!
//! Exercises the public evaluator surface end to end, plus property tests on
//! the payoff model.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;

use options_engine::domain::market_data::OptionType;
use options_engine::domain::strategy::{
    LegAction, PnlMode, StrategyKind, StrategyLeg, analyze_strategy, breakevens, identify_strategy,
    max_loss, max_profit, strategy_pl,
};

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
}

fn leg(option_type: OptionType, action: LegAction, strike: f64, premium: f64) -> StrategyLeg {
    StrategyLeg::new(option_type, action, strike, 1, premium, expiry())
}

fn iron_condor() -> Vec<StrategyLeg> {
    vec![
        leg(OptionType::Put, LegAction::Buy, 90.0, 1.0),
        leg(OptionType::Put, LegAction::Sell, 95.0, 2.0),
        leg(OptionType::Call, LegAction::Sell, 105.0, 2.0),
        leg(OptionType::Call, LegAction::Buy, 110.0, 1.0),
    ]
}

#[test]
fn naked_short_call_has_unlimited_loss_until_covered() {
    let naked = vec![leg(OptionType::Call, LegAction::Sell, 100.0, 3.0)];
    assert_eq!(max_loss(&naked), None);

    let spread = vec![
        leg(OptionType::Call, LegAction::Sell, 100.0, 3.0),
        leg(OptionType::Call, LegAction::Buy, 110.0, 1.0),
    ];
    let loss = max_loss(&spread).unwrap();
    // Width 10, credit 2, per contract
    assert!((loss - -800.0).abs() < 1e-9);
}

#[test]
fn long_call_breakeven_is_strike_plus_premium() {
    let legs = vec![leg(OptionType::Call, LegAction::Buy, 100.0, 4.25)];
    let found = breakevens(&legs);
    assert_eq!(found.len(), 1);
    assert!((found[0] - 104.25).abs() < 0.01);
}

#[test]
fn classifies_regardless_of_input_order() {
    let mut legs = iron_condor();
    legs.reverse();
    assert_eq!(identify_strategy(&legs), StrategyKind::IronCondor);
    assert_eq!(identify_strategy(&legs).name(), "Iron Condor");

    let straddle = vec![
        leg(OptionType::Put, LegAction::Buy, 100.0, 3.5),
        leg(OptionType::Call, LegAction::Buy, 100.0, 4.0),
    ];
    assert_eq!(identify_strategy(&straddle).name(), "Long Straddle");
}

#[test]
fn iron_condor_analysis() {
    let analysis = analyze_strategy(&iron_condor(), 100.0);

    assert_eq!(analysis.kind, StrategyKind::IronCondor);
    assert!((analysis.net_premium - 200.0).abs() < 1e-9);
    assert!((analysis.max_profit.unwrap() - 200.0).abs() < 1e-9);
    assert!((analysis.max_loss.unwrap() - -300.0).abs() < 1e-9);
    assert_eq!(analysis.breakevens.len(), 2);
    assert!((analysis.breakevens[0] - 93.0).abs() < 0.01);
    assert!((analysis.breakevens[1] - 107.0).abs() < 0.01);
    // Centered between the breakevens
    assert!((analysis.probability_of_profit.unwrap() - 0.95).abs() < 1e-3);
    assert!(analysis.rejected_legs.is_empty());
}

#[test]
fn invalid_legs_are_reported_not_fatal() {
    let mut legs = iron_condor();
    legs.push(leg(OptionType::Call, LegAction::Buy, -5.0, 1.0));

    let analysis = analyze_strategy(&legs, 100.0);
    assert_eq!(analysis.rejected_legs.len(), 1);
    assert_eq!(analysis.rejected_legs[0].index, 4);
    assert_eq!(analysis.kind, StrategyKind::IronCondor);
}

#[test]
fn marked_at_entry_pl_is_zero() {
    let legs = iron_condor();
    assert_eq!(strategy_pl(&legs, 80.0, PnlMode::MarkedAtEntry), 0.0);
    assert_eq!(strategy_pl(&legs, 120.0, PnlMode::MarkedAtEntry), 0.0);
}

proptest! {
    #[test]
    fn bounded_pl_stays_within_bounds(price in 0.0_f64..300.0) {
        let legs = iron_condor();
        let pl = strategy_pl(&legs, price, PnlMode::AtExpiration);
        let upper = max_profit(&legs).unwrap();
        let lower = max_loss(&legs).unwrap();
        prop_assert!(pl <= upper + 1e-9);
        prop_assert!(pl >= lower - 1e-9);
    }

    #[test]
    fn pl_is_zero_at_every_breakeven(
        strike in 20.0_f64..200.0,
        premium in 0.05_f64..20.0,
        is_call in any::<bool>(),
    ) {
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };
        let legs = vec![leg(option_type, LegAction::Buy, strike, premium)];
        for breakeven in breakevens(&legs) {
            let pl = strategy_pl(&legs, breakeven, PnlMode::AtExpiration);
            prop_assert!(pl.abs() < 1.0, "P&L {} at breakeven {}", pl, breakeven);
        }
    }
}
