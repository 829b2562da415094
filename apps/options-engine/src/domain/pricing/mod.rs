//! Option pricing primitives.
//!
//! This module provides:
//! - Normal distribution functions (A&S error-function approximation)
//! - Black-Scholes European value and first-order Greeks
//!
//! # Example
//!
//! ```
//! use options_engine::domain::market_data::OptionType;
//! use options_engine::domain::pricing::black_scholes_value;
//!
//! let value = black_scholes_value(100.0, 100.0, 1.0, 0.05, 0.20, OptionType::Call);
//! assert!((value - 10.45).abs() < 0.01);
//! ```

mod black_scholes;
mod normal;

pub use black_scholes::{Greeks, PricingInputs, black_scholes_greeks, black_scholes_value};
pub use normal::{erf, norm_cdf, norm_pdf};
