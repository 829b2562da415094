//! One-shot strategy summary.
//!
//! Validates legs individually, drops the invalid ones, and computes every
//! evaluator metric over the remainder. Nothing here fails: missing inputs
//! surface as `None` metrics plus a note.

use serde::{Deserialize, Serialize};

use super::breakeven::breakevens;
use super::classification::{StrategyKind, identify_strategy};
use super::leg::StrategyLeg;
use super::probability::{aggregate_delta, probability_from_breakevens};
use super::risk::{max_loss, max_profit};
use crate::domain::pricing::Greeks;
use crate::domain::shared::{InsufficientDataError, ValidationError};

/// A leg excluded from analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedLeg {
    /// Position of the leg in the input.
    pub index: usize,
    /// Why it was rejected.
    pub error: ValidationError,
}

/// Evaluator output for a leg set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAnalysis {
    /// Recognized shape.
    pub kind: StrategyKind,
    /// Display name of `kind`.
    pub name: String,
    /// Net premium in dollars (positive = credit).
    pub net_premium: f64,
    /// Maximum profit in dollars, `None` when unbounded.
    pub max_profit: Option<f64>,
    /// Maximum loss in dollars (lowest P&L), `None` when unbounded.
    pub max_loss: Option<f64>,
    /// Expiration breakevens, ascending.
    pub breakevens: Vec<f64>,
    /// `max_profit / |max_loss|`.
    pub return_on_risk: Option<f64>,
    /// Heuristic probability of profit.
    pub probability_of_profit: Option<f64>,
    /// Signed, quantity-weighted per-share Greeks.
    pub greeks: Greeks,
    /// Legs excluded by validation.
    pub rejected_legs: Vec<RejectedLeg>,
    /// Human-readable caveats.
    pub notes: Vec<String>,
}

/// Signed quantity-weighted sum of leg Greeks. Missing values count as zero.
#[must_use]
pub fn aggregate_greeks(legs: &[StrategyLeg]) -> Greeks {
    legs.iter().fold(Greeks::default(), |total, leg| {
        let per_share = Greeks {
            delta: leg.delta.unwrap_or(0.0),
            gamma: leg.gamma.unwrap_or(0.0),
            theta: leg.theta.unwrap_or(0.0),
            vega: leg.vega.unwrap_or(0.0),
            rho: 0.0,
        };
        total.combine(&per_share.scale(leg.signed_quantity()))
    })
}

/// Evaluate a leg set at the current underlying price.
#[must_use]
pub fn analyze_strategy(legs: &[StrategyLeg], current_price: f64) -> StrategyAnalysis {
    let mut valid = Vec::with_capacity(legs.len());
    let mut rejected_legs = Vec::new();
    for (index, leg) in legs.iter().enumerate() {
        match leg.validate() {
            Ok(()) => valid.push(leg.clone()),
            Err(error) => {
                tracing::debug!(index, error = %error, "Rejected strategy leg");
                rejected_legs.push(RejectedLeg { index, error });
            }
        }
    }

    let mut notes = Vec::new();
    if valid.is_empty() {
        notes.push(InsufficientDataError::new("no valid legs to analyze").to_string());
        return StrategyAnalysis {
            kind: StrategyKind::Custom,
            name: StrategyKind::Custom.name().to_string(),
            net_premium: 0.0,
            max_profit: None,
            max_loss: None,
            breakevens: Vec::new(),
            return_on_risk: None,
            probability_of_profit: None,
            greeks: Greeks::default(),
            rejected_legs,
            notes,
        };
    }

    let kind = identify_strategy(&valid);
    let max_profit = max_profit(&valid);
    let max_loss = max_loss(&valid);
    let return_on_risk = match (max_profit, max_loss) {
        (Some(profit), Some(loss)) if loss != 0.0 => Some(profit / loss.abs()),
        _ => None,
    };
    let breakevens = breakevens(&valid);

    let probability_of_profit = if current_price.is_finite() && current_price > 0.0 {
        Some(probability_from_breakevens(
            &breakevens,
            current_price,
            aggregate_delta(&valid),
        ))
    } else {
        notes.push(ValidationError::InvalidUnderlying { price: current_price }.to_string());
        None
    };

    if max_profit.is_none() {
        notes.push("Unlimited profit potential".to_string());
    }
    if max_loss.is_none() {
        notes.push("Unlimited loss potential".to_string());
    }
    if breakevens.len() == super::breakeven::MAX_BREAKEVENS {
        notes.push("Breakevens truncated to the first four crossings".to_string());
    }

    StrategyAnalysis {
        kind,
        name: kind.name().to_string(),
        net_premium: valid.iter().map(StrategyLeg::net_premium).sum(),
        max_profit,
        max_loss,
        breakevens,
        return_on_risk,
        probability_of_profit,
        greeks: aggregate_greeks(&valid),
        rejected_legs,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::market_data::OptionType;
    use crate::domain::strategy::leg::LegAction;

    fn leg(option_type: OptionType, action: LegAction, strike: f64, premium: f64) -> StrategyLeg {
        StrategyLeg::new(
            option_type,
            action,
            strike,
            1,
            premium,
            NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
        )
    }

    fn iron_condor() -> Vec<StrategyLeg> {
        vec![
            leg(OptionType::Put, LegAction::Buy, 90.0, 1.0).with_greeks(-0.10, 0.01, -0.02, 0.05),
            leg(OptionType::Put, LegAction::Sell, 95.0, 2.0).with_greeks(-0.25, 0.02, -0.04, 0.08),
            leg(OptionType::Call, LegAction::Sell, 105.0, 2.0).with_greeks(0.25, 0.02, -0.04, 0.08),
            leg(OptionType::Call, LegAction::Buy, 110.0, 1.0).with_greeks(0.10, 0.01, -0.02, 0.05),
        ]
    }

    #[test]
    fn iron_condor_summary() {
        let analysis = analyze_strategy(&iron_condor(), 100.0);

        assert_eq!(analysis.kind, StrategyKind::IronCondor);
        assert_eq!(analysis.name, "Iron Condor");
        assert_eq!(analysis.net_premium, 200.0);
        assert_eq!(analysis.max_profit, Some(200.0));
        assert_eq!(analysis.max_loss, Some(-300.0));
        assert_eq!(analysis.breakevens.len(), 2);
        let ror = analysis.return_on_risk.unwrap();
        assert!((ror - 2.0 / 3.0).abs() < 1e-12);
        let pop = analysis.probability_of_profit.unwrap();
        assert!((pop - 0.95).abs() < 0.01);
        assert!(analysis.rejected_legs.is_empty());
        assert!(analysis.notes.is_empty());
    }

    #[test]
    fn short_premium_collects_theta() {
        let greeks = aggregate_greeks(&iron_condor());
        // Short strikes dominate: positive theta, negative gamma and vega
        assert!(greeks.delta.abs() < 1e-12);
        assert!((greeks.theta - 0.04).abs() < 1e-12);
        assert!((greeks.gamma + 0.02).abs() < 1e-12);
        assert!((greeks.vega + 0.06).abs() < 1e-12);
    }

    #[test]
    fn invalid_legs_are_rejected_individually() {
        let mut legs = iron_condor();
        legs.push(leg(OptionType::Call, LegAction::Buy, -5.0, 1.0));

        let analysis = analyze_strategy(&legs, 100.0);
        assert_eq!(analysis.kind, StrategyKind::IronCondor);
        assert_eq!(analysis.rejected_legs.len(), 1);
        assert_eq!(analysis.rejected_legs[0].index, 4);
        assert_eq!(
            analysis.rejected_legs[0].error,
            ValidationError::InvalidStrike { strike: -5.0 }
        );
    }

    #[test]
    fn no_valid_legs_is_insufficient_data() {
        let mut bad = leg(OptionType::Call, LegAction::Buy, 100.0, 1.0);
        bad.quantity = 0;

        let analysis = analyze_strategy(&[bad], 100.0);
        assert_eq!(analysis.kind, StrategyKind::Custom);
        assert_eq!(analysis.max_profit, None);
        assert_eq!(analysis.max_loss, None);
        assert_eq!(analysis.probability_of_profit, None);
        assert_eq!(analysis.notes.len(), 1);
        assert!(analysis.notes[0].starts_with("Insufficient data"));
    }

    #[test]
    fn naked_short_call_notes_unlimited_loss() {
        let analysis = analyze_strategy(&[leg(OptionType::Call, LegAction::Sell, 100.0, 2.0)], 95.0);
        assert_eq!(analysis.kind, StrategyKind::ShortCall);
        assert_eq!(analysis.max_loss, None);
        assert_eq!(analysis.return_on_risk, None);
        assert!(analysis.notes.iter().any(|n| n.contains("Unlimited loss")));
    }

    #[test]
    fn invalid_underlying_drops_pop_only() {
        let analysis = analyze_strategy(&iron_condor(), f64::NAN);
        assert_eq!(analysis.probability_of_profit, None);
        assert_eq!(analysis.max_profit, Some(200.0));
        assert!(analysis.notes[0].starts_with("Invalid underlying"));
    }
}
