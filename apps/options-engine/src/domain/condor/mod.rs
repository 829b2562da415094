//! Iron Condor Constructor/Ranker
//!
//! Works on already-fetched chain data: clean the legs, estimate volatility
//! and time to expiry, enumerate credit spreads on both sides, cross them into
//! candidates, and rank. The scan never fails; empty or degraded results
//! carry notes saying why.

pub mod candidate;
pub mod cleaning;
pub mod request;
pub mod scanner;
pub mod volatility;

pub use candidate::{CondorCandidate, CondorLeg, CondorScanResult};
pub use cleaning::{CleanLeg, Rejection, clean_leg, clean_legs};
pub use request::{
    CondorScanRequest, DEFAULT_MAX_WIDTH_PCT, DEFAULT_TOP_N, LiquidityFilter, MAX_TOP_N, RankBy,
};
pub use scanner::scan_iron_condors;
pub use volatility::{estimate_iv, lognormal_pop, years_to_expiry, years_until};
