//! Polygon Market Data Adapter
//!
//! REST implementation of `MarketDataPort` for Polygon-style APIs with:
//! - Last-trade or previous-close quotes
//! - `next_url` pagination with a page cap
//! - Retry logic with exponential backoff

mod adapter;
mod api_types;
mod config;
mod http_client;

pub use adapter::PolygonMarketDataAdapter;
pub use config::{PolygonConfig, QuoteMode, RetryConfig};
