//! Application Use Cases
//!
//! Use cases orchestrate the gateway and the pure domain analytics.

mod analyze_strategy;
mod get_quote;
mod scan_iron_condors;

pub use analyze_strategy::AnalyzeStrategyUseCase;
pub use get_quote::{GetQuoteUseCase, QuoteSource, SourcedQuote};
pub use scan_iron_condors::{ScanIronCondorsUseCase, ScanOverrides};
