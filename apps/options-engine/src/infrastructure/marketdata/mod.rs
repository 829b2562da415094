//! Market Data Adapters
//!
//! Implementations of `MarketDataPort`: a fixture-backed provider for tests
//! and development, and a Polygon REST client.

mod in_memory;
pub mod polygon;

pub use in_memory::{InMemoryMarketDataProvider, ProviderOperation};
pub use polygon::{PolygonConfig, PolygonMarketDataAdapter, QuoteMode};
