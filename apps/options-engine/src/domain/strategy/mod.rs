//! Multi-Leg Strategy Evaluator
//!
//! Pure functions over ordered leg lists: P&L at a price, bounds with
//! unlimited-risk detection, breakevens, return on risk, a heuristic
//! probability of profit, and shape classification.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use options_engine::domain::market_data::OptionType;
//! use options_engine::domain::strategy::{LegAction, StrategyLeg, breakevens, identify_strategy};
//!
//! let expiry = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
//! let legs = [
//!     StrategyLeg::new(OptionType::Call, LegAction::Buy, 100.0, 1, 4.0, expiry),
//!     StrategyLeg::new(OptionType::Put, LegAction::Buy, 100.0, 1, 3.5, expiry),
//! ];
//! assert_eq!(identify_strategy(&legs).name(), "Long Straddle");
//! assert_eq!(breakevens(&legs).len(), 2);
//! ```

pub mod analysis;
pub mod breakeven;
pub mod classification;
pub mod leg;
pub mod payoff;
pub mod probability;
pub mod risk;

pub use analysis::{RejectedLeg, StrategyAnalysis, aggregate_greeks, analyze_strategy};
pub use breakeven::{MAX_BREAKEVENS, breakevens};
pub use classification::{StrategyKind, identify_strategy};
pub use leg::{CONTRACT_MULTIPLIER, LegAction, StrategyLeg};
pub use payoff::{PnlMode, leg_pl, strategy_pl};
pub use probability::{NEUTRAL_POP, aggregate_delta, probability_from_breakevens, probability_of_profit};
pub use risk::{Exposure, exposure, max_loss, max_profit, price_grid, return_on_risk};
