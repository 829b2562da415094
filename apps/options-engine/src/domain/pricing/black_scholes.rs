//! Black-Scholes European option value and first-order Greeks.
//!
//! Expired contracts (`T <= 0`) and zero-volatility inputs take the intrinsic
//! branch. Both are defined outcomes, not error paths.

// Black-Scholes uses standard mathematical notation (s, k, t, r, sigma)
// Financial formulas use standard notation where mul_add() obscures meaning
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use serde::{Deserialize, Serialize};

use super::normal::{norm_cdf, norm_pdf};
use crate::domain::market_data::OptionType;

/// Calendar days per year used for per-day theta.
const DAYS_PER_YEAR: f64 = 365.0;

/// Inputs to the pricing model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    /// Underlying price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiration in years.
    pub years: f64,
    /// Risk-free rate (annualized, continuous).
    pub rate: f64,
    /// Volatility (annualized, decimal).
    pub volatility: f64,
    /// Call or put.
    pub option_type: OptionType,
}

impl PricingInputs {
    /// Option value under these inputs.
    #[must_use]
    pub fn value(&self) -> f64 {
        black_scholes_value(
            self.spot,
            self.strike,
            self.years,
            self.rate,
            self.volatility,
            self.option_type,
        )
    }

    /// First-order Greeks under these inputs.
    #[must_use]
    pub fn greeks(&self) -> Greeks {
        black_scholes_greeks(
            self.spot,
            self.strike,
            self.years,
            self.rate,
            self.volatility,
            self.option_type,
        )
    }
}

/// First-order sensitivities for one option, per share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Change in value per $1 move in the underlying.
    pub delta: f64,
    /// Change in delta per $1 move in the underlying.
    pub gamma: f64,
    /// Change in value per calendar day.
    pub theta: f64,
    /// Change in value per 1 point of volatility.
    pub vega: f64,
    /// Change in value per 1 point of interest rate.
    pub rho: f64,
}

impl Greeks {
    /// Scale by a signed quantity (positive long, negative short).
    #[must_use]
    pub fn scale(&self, quantity: f64) -> Self {
        Self {
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            theta: self.theta * quantity,
            vega: self.vega * quantity,
            rho: self.rho * quantity,
        }
    }

    /// Component-wise sum.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}

/// Whether inputs fall on the intrinsic (deterministic) branch.
fn is_deterministic(t: f64, sigma: f64) -> bool {
    t <= 0.0 || sigma <= 0.0
}

/// Black-Scholes d1 parameter.
fn d1(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// European option value.
///
/// Returns intrinsic value when `t <= 0` or `sigma <= 0`; otherwise the
/// closed-form Black-Scholes value. Never negative.
#[must_use]
pub fn black_scholes_value(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionType) -> f64 {
    if is_deterministic(t, sigma) {
        return kind.intrinsic(s, k);
    }

    let d1_val = d1(s, k, t, r, sigma);
    let d2_val = d1_val - sigma * t.sqrt();
    let discount = (-r * t).exp();

    let value = match kind {
        OptionType::Call => s * norm_cdf(d1_val) - k * discount * norm_cdf(d2_val),
        OptionType::Put => k * discount * norm_cdf(-d2_val) - s * norm_cdf(-d1_val),
    };

    // The CDF approximation can push deep OTM values a hair below zero
    value.max(0.0)
}

/// First-order Greeks for a European option.
#[must_use]
pub fn black_scholes_greeks(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    kind: OptionType,
) -> Greeks {
    if is_deterministic(t, sigma) {
        let moneyness = match kind {
            OptionType::Call => s - k,
            OptionType::Put => k - s,
        };
        let magnitude = if moneyness > 0.0 {
            1.0
        } else if moneyness == 0.0 {
            0.5
        } else {
            0.0
        };
        let delta = match kind {
            OptionType::Call => magnitude,
            OptionType::Put => -magnitude,
        };
        return Greeks {
            delta,
            ..Greeks::default()
        };
    }

    let sqrt_t = t.sqrt();
    let d1_val = d1(s, k, t, r, sigma);
    let d2_val = d1_val - sigma * sqrt_t;
    let discount = (-r * t).exp();
    let pdf_d1 = norm_pdf(d1_val);

    let gamma = pdf_d1 / (s * sigma * sqrt_t);
    let vega = s * pdf_d1 * sqrt_t / 100.0;
    let decay = -(s * pdf_d1 * sigma) / (2.0 * sqrt_t);

    match kind {
        OptionType::Call => Greeks {
            delta: norm_cdf(d1_val),
            gamma,
            theta: (decay - r * k * discount * norm_cdf(d2_val)) / DAYS_PER_YEAR,
            vega,
            rho: k * t * discount * norm_cdf(d2_val) / 100.0,
        },
        OptionType::Put => Greeks {
            delta: norm_cdf(d1_val) - 1.0,
            gamma,
            theta: (decay + r * k * discount * norm_cdf(-d2_val)) / DAYS_PER_YEAR,
            vega,
            rho: -k * t * discount * norm_cdf(-d2_val) / 100.0,
        },
    }
}
