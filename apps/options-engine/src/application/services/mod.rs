//! Application Services
//!
//! Long-lived, shared components that sit between use cases and driven
//! ports. The market data gateway is the only shared mutable state in the
//! engine.

mod coalescing_cache;
mod market_data_gateway;
mod normalize;

pub use coalescing_cache::{CachePolicy, CoalescingCache, Lookup};
pub use market_data_gateway::{GatewayConfig, MarketDataGateway};
pub use normalize::{
    assemble_chain, extract_expirations, infer_option_type, normalize_symbol, parse_expiration,
};
