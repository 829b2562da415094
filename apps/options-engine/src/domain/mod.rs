//! Domain Layer
//!
//! Pure business logic with no infrastructure dependencies. Nothing in this
//! layer performs I/O or holds shared state.
//!
//! # Bounded Contexts
//!
//! - [`pricing`]: Normal distribution and Black-Scholes value and Greeks
//! - [`market_data`]: Quotes and option chains
//! - [`strategy`]: Multi-leg P&L, risk bounds, breakevens, classification
//! - [`condor`]: Iron condor search and ranking

pub mod condor;
pub mod market_data;
pub mod pricing;
pub mod shared;
pub mod strategy;
