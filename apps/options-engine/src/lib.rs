// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Options Engine - Rust Core Library
//!
//! Market-data gateway and options analytics for the Cream trading system.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure, synchronous analytics with no I/O
//!   - `pricing`: normal distribution, Black-Scholes value and Greeks
//!   - `market_data`: quotes and option chains
//!   - `strategy`: multi-leg P&L, risk bounds, breakevens, POP, classification
//!   - `condor`: iron condor search and ranking
//!
//! - **Application**: Orchestration
//!   - `ports`: `MarketDataPort` (the only outbound dependency)
//!   - `services`: coalescing cache and `MarketDataGateway`
//!   - `use_cases`: `GetQuote`, `ScanIronCondors`, `AnalyzeStrategy`
//!
//! - **Infrastructure**: Adapters
//!   - `marketdata`: in-memory and Polygon REST providers
//!
//! Cross-cutting: `config` (YAML), `error` (`EngineError`), `observability`
//! (Prometheus metrics), `telemetry` (tracing subscriber).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases, services, and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Modules
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Caller-facing error taxonomy.
pub mod error;

/// Metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::condor::{
    CondorCandidate, CondorScanRequest, CondorScanResult, LiquidityFilter, RankBy,
    scan_iron_condors,
};
pub use domain::market_data::{ChainLeg, OptionChain, OptionType, Quote};
pub use domain::pricing::{Greeks, black_scholes_greeks, black_scholes_value};
pub use domain::strategy::{
    LegAction, StrategyAnalysis, StrategyKind, StrategyLeg, analyze_strategy, identify_strategy,
};

// Application re-exports
pub use application::ports::{ChainSnapshot, ContractRecord, MarketDataPort, ProviderError};
pub use application::services::{GatewayConfig, MarketDataGateway};
pub use application::use_cases::{
    AnalyzeStrategyUseCase, GetQuoteUseCase, QuoteSource, ScanIronCondorsUseCase, ScanOverrides,
    SourcedQuote,
};

// Infrastructure re-exports
pub use infrastructure::marketdata::{
    InMemoryMarketDataProvider, PolygonConfig, PolygonMarketDataAdapter, ProviderOperation,
    QuoteMode,
};

// Cross-cutting re-exports
pub use config::{Config, ConfigError, load_config};
pub use error::{EngineError, ErrorCode};
