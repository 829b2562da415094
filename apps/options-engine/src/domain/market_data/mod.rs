//! Market Data Value Objects
//!
//! Quotes and option chains as delivered by the gateway. These carry no
//! behavior beyond simple derived values (mid, spread, intrinsic).

mod option_chain;
mod quote;

pub use option_chain::{ChainLeg, OptionChain, OptionType};
pub use quote::Quote;
