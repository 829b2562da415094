//! Pricing model configuration.

use serde::{Deserialize, Serialize};

/// Pricing model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate (annualized), used when filling in missing Greeks.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

pub(crate) const fn default_risk_free_rate() -> f64 {
    0.05
}
