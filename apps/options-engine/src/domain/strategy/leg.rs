//! Strategy leg types and operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::market_data::OptionType;
use crate::domain::shared::ValidationError;

/// Shares per standard equity option contract.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Whether a leg was bought or sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegAction {
    /// Long position (bought).
    Buy,
    /// Short position (sold/written).
    Sell,
}

impl LegAction {
    /// +1 for long, -1 for short.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

/// A single leg of an options strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    /// Call or put.
    pub option_type: OptionType,
    /// Buy or sell.
    pub action: LegAction,
    /// Strike price.
    pub strike: f64,
    /// Number of contracts.
    pub quantity: u32,
    /// Premium per share paid or received.
    pub premium: f64,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Delta per share.
    pub delta: Option<f64>,
    /// Theta per share.
    pub theta: Option<f64>,
    /// Gamma per share.
    pub gamma: Option<f64>,
    /// Vega per share.
    pub vega: Option<f64>,
}

impl StrategyLeg {
    /// Create a new strategy leg without Greeks.
    #[must_use]
    pub const fn new(
        option_type: OptionType,
        action: LegAction,
        strike: f64,
        quantity: u32,
        premium: f64,
        expiration: NaiveDate,
    ) -> Self {
        Self {
            option_type,
            action,
            strike,
            quantity,
            premium,
            expiration,
            delta: None,
            theta: None,
            gamma: None,
            vega: None,
        }
    }

    /// Set delta for this leg.
    #[must_use]
    pub const fn with_delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Set all first-order Greeks for this leg.
    #[must_use]
    pub const fn with_greeks(mut self, delta: f64, gamma: f64, theta: f64, vega: f64) -> Self {
        self.delta = Some(delta);
        self.gamma = Some(gamma);
        self.theta = Some(theta);
        self.vega = Some(vega);
        self
    }

    /// Signed contract count (positive long, negative short).
    #[must_use]
    pub fn signed_quantity(&self) -> f64 {
        self.action.sign() * f64::from(self.quantity)
    }

    /// Net premium in dollars (positive = credit, negative = debit).
    #[must_use]
    pub fn net_premium(&self) -> f64 {
        -self.signed_quantity() * self.premium * CONTRACT_MULTIPLIER
    }

    /// Check the leg's own invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(ValidationError::InvalidStrike {
                strike: self.strike,
            });
        }
        if self.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if !self.premium.is_finite() || self.premium < 0.0 {
            return Err(ValidationError::InvalidPremium {
                premium: self.premium,
            });
        }
        Ok(())
    }
}
