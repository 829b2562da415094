//! Domain errors shared by the strategy evaluator and the condor scanner.
//!
//! Neither error aborts a batch: a `ValidationError` rejects one leg or one
//! candidate, and an `InsufficientDataError` becomes `None` metrics plus a
//! note in the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single input item is malformed.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Strike is non-finite or non-positive.
    #[error("Invalid strike: {strike}")]
    InvalidStrike {
        /// The offending strike.
        strike: f64,
    },

    /// Premium is non-finite or negative.
    #[error("Invalid premium: {premium}")]
    InvalidPremium {
        /// The offending premium.
        premium: f64,
    },

    /// Quantity must be at least one contract.
    #[error("Quantity must be positive")]
    ZeroQuantity,

    /// Ask below bid.
    #[error("Inverted market: bid {bid} > ask {ask}")]
    InvertedMarket {
        /// Bid price.
        bid: f64,
        /// Ask price.
        ask: f64,
    },

    /// Underlying price is non-finite or non-positive.
    #[error("Invalid underlying price: {price}")]
    InvalidUnderlying {
        /// The offending price.
        price: f64,
    },
}

/// Not enough usable data to compute a result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Insufficient data: {message}")]
pub struct InsufficientDataError {
    /// What was missing.
    pub message: String,
}

impl InsufficientDataError {
    /// Create a new error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::InvalidStrike { strike: -5.0 };
        assert_eq!(err.to_string(), "Invalid strike: -5");

        let err = ValidationError::InvertedMarket { bid: 1.2, ask: 1.0 };
        assert_eq!(err.to_string(), "Inverted market: bid 1.2 > ask 1");

        let err = InsufficientDataError::new("no usable legs");
        assert_eq!(err.to_string(), "Insufficient data: no usable legs");
    }
}
