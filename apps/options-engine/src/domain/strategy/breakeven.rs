//! Breakeven solving by scan and bisection.
//!
//! Scans `[0, 2 * max_strike]` for sign changes of expiration P&L and refines
//! each bracket with bisection. At most four crossings are returned, which
//! covers every shape `identify_strategy` knows about; exotic shapes with
//! more crossings are truncated.

use super::leg::StrategyLeg;
use super::payoff::{PnlMode, strategy_pl};

/// Number of equal scan steps across the price range.
const SCAN_STEPS: usize = 1000;

/// Maximum bisection iterations per bracket.
const BISECTION_ITERATIONS: usize = 10;

/// Bracket width at which bisection stops, and the dedup distance.
const TOLERANCE: f64 = 0.01;

/// Maximum number of breakevens reported.
pub const MAX_BREAKEVENS: usize = 4;

/// Expiration breakeven prices, ascending.
#[must_use]
pub fn breakevens(legs: &[StrategyLeg]) -> Vec<f64> {
    let Some(max_strike) = legs.iter().map(|leg| leg.strike).reduce(f64::max) else {
        return Vec::new();
    };
    let upper = max_strike * 2.0;
    if upper <= 0.0 {
        return Vec::new();
    }

    let pl = |price: f64| strategy_pl(legs, price, PnlMode::AtExpiration);
    let step = upper / SCAN_STEPS as f64;

    let mut found: Vec<f64> = Vec::new();
    let mut prev_price = 0.0;
    let mut prev_pl = pl(prev_price);
    if prev_pl == 0.0 {
        found.push(prev_price);
    }

    for i in 1..=SCAN_STEPS {
        let price = step * i as f64;
        let current = pl(price);

        if current == 0.0 {
            if prev_pl != 0.0 {
                found.push(price);
            }
        } else if prev_pl != 0.0 && prev_pl.signum() != current.signum() {
            found.push(bisect(&pl, prev_price, price, prev_pl));
        }

        prev_price = price;
        prev_pl = current;
    }

    found.sort_by(f64::total_cmp);
    found.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
    found.truncate(MAX_BREAKEVENS);
    found
}

fn bisect(pl: &impl Fn(f64) -> f64, mut low: f64, mut high: f64, low_pl: f64) -> f64 {
    let low_sign = low_pl.signum();

    for _ in 0..BISECTION_ITERATIONS {
        if high - low < TOLERANCE {
            break;
        }
        let mid = low.midpoint(high);
        let mid_pl = pl(mid);
        if mid_pl == 0.0 {
            return mid;
        }
        if mid_pl.signum() == low_sign {
            low = mid;
        } else {
            high = mid;
        }
    }

    low.midpoint(high)
}
