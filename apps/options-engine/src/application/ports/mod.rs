//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems. The only
//! outbound dependency of this core is a market-data provider.

mod market_data_port;

#[cfg(test)]
pub use market_data_port::MockMarketDataPort;
pub use market_data_port::{ChainSnapshot, ContractRecord, MarketDataPort, ProviderError};
