//! Iron condor enumeration and ranking.
//!
//! Credit spreads are built independently on each side of the underlying and
//! then crossed. Max loss assumes only one side can finish in the money, so it
//! is the wider wing minus the total credit.

use std::cmp::Ordering;

use super::candidate::{CondorCandidate, CondorLeg, CondorScanResult};
use super::cleaning::{CleanLeg, clean_legs};
use super::request::{CondorScanRequest, RankBy};
use super::volatility::{estimate_iv, lognormal_pop, years_to_expiry};
use crate::domain::shared::{InsufficientDataError, ValidationError};

/// A one-sided credit spread.
#[derive(Debug, Clone, Copy)]
struct CreditSpread {
    short: CondorLeg,
    long: CondorLeg,
    width: f64,
    credit: f64,
}

fn leg_at(leg: &CleanLeg, short: bool) -> CondorLeg {
    CondorLeg {
        strike: leg.strike,
        price: if short { leg.bid } else { leg.ask },
    }
}

/// Short puts below the underlying paired with lower long puts.
fn put_spreads(puts: &[CleanLeg], underlying: f64, max_width: f64) -> Vec<CreditSpread> {
    let mut spreads = Vec::new();
    for short in puts.iter().filter(|leg| leg.strike < underlying) {
        for long in puts.iter().filter(|leg| leg.strike < short.strike) {
            let width = short.strike - long.strike;
            let credit = short.bid - long.ask;
            if width <= max_width && credit > 0.0 {
                spreads.push(CreditSpread {
                    short: leg_at(short, true),
                    long: leg_at(long, false),
                    width,
                    credit,
                });
            }
        }
    }
    spreads
}

/// Short calls above the underlying paired with higher long calls.
fn call_spreads(calls: &[CleanLeg], underlying: f64, max_width: f64) -> Vec<CreditSpread> {
    let mut spreads = Vec::new();
    for short in calls.iter().filter(|leg| leg.strike > underlying) {
        for long in calls.iter().filter(|leg| leg.strike > short.strike) {
            let width = long.strike - short.strike;
            let credit = short.bid - long.ask;
            if width <= max_width && credit > 0.0 {
                spreads.push(CreditSpread {
                    short: leg_at(short, true),
                    long: leg_at(long, false),
                    width,
                    credit,
                });
            }
        }
    }
    spreads
}

fn build_candidate(
    put: &CreditSpread,
    call: &CreditSpread,
    underlying: f64,
    iv: Option<f64>,
    years: Option<f64>,
) -> Option<CondorCandidate> {
    let credit = put.credit + call.credit;
    let max_loss = put.width.max(call.width) - credit;
    if credit <= 0.0 || max_loss <= 0.0 {
        return None;
    }

    let lower_breakeven = put.short.strike - credit;
    let upper_breakeven = call.short.strike + credit;
    let probability_of_profit = match (iv, years) {
        (Some(sigma), Some(t)) => lognormal_pop(lower_breakeven, upper_breakeven, underlying, sigma, t),
        _ => None,
    };

    Some(CondorCandidate {
        put_long: put.long,
        put_short: put.short,
        call_short: call.short,
        call_long: call.long,
        put_width: put.width,
        call_width: call.width,
        credit,
        max_profit: credit,
        max_loss,
        return_on_risk: credit / max_loss,
        lower_breakeven,
        upper_breakeven,
        probability_of_profit,
    })
}

/// Descending by the ranking value; candidates without one sort last.
fn compare(a: &CondorCandidate, b: &CondorCandidate, rank_by: RankBy) -> Ordering {
    match (a.rank_value(rank_by), b.rank_value(rank_by)) {
        (Some(x), Some(y)) => y
            .total_cmp(&x)
            .then_with(|| b.credit.total_cmp(&a.credit)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.credit.total_cmp(&a.credit),
    }
}

/// Enumerate, score, and rank iron condors for one expiration.
#[must_use]
pub fn scan_iron_condors(request: &CondorScanRequest) -> CondorScanResult {
    let mut result = CondorScanResult {
        symbol: request.symbol.clone(),
        expiration: request.expiration.clone(),
        underlying: request.underlying,
        as_of: request.as_of,
        iv_estimate: None,
        years_to_expiry: None,
        evaluated: 0,
        candidates: Vec::new(),
        notes: Vec::new(),
    };

    let underlying = request.underlying;
    if !underlying.is_finite() || underlying <= 0.0 {
        result
            .notes
            .push(ValidationError::InvalidUnderlying { price: underlying }.to_string());
        return result;
    }

    let calls = clean_legs(&request.calls, &request.liquidity);
    let puts = clean_legs(&request.puts, &request.liquidity);
    if calls.is_empty() && puts.is_empty() {
        result.notes.push(
            InsufficientDataError::new("no option legs passed the liquidity filters").to_string(),
        );
    }

    let all_legs: Vec<&CleanLeg> = calls.iter().chain(puts.iter()).collect();
    result.iv_estimate = estimate_iv(&all_legs, underlying);
    if result.iv_estimate.is_none() {
        result
            .notes
            .push("No usable implied volatility; probability of profit unavailable".to_string());
    }

    result.years_to_expiry = years_to_expiry(&request.expiration, request.as_of);
    if result.years_to_expiry.is_none() {
        result.notes.push(format!(
            "Unparsable expiration '{}'; probability of profit unavailable",
            request.expiration
        ));
    }

    let max_width = request.max_width_pct * underlying;
    let put_side = put_spreads(&puts, underlying, max_width);
    let call_side = call_spreads(&calls, underlying, max_width);
    result.evaluated = put_side.len() * call_side.len();

    let mut candidates: Vec<CondorCandidate> = put_side
        .iter()
        .flat_map(|put| {
            call_side.iter().filter_map(|call| {
                build_candidate(
                    put,
                    call,
                    underlying,
                    result.iv_estimate,
                    result.years_to_expiry,
                )
            })
        })
        .collect();

    if candidates.is_empty() {
        result
            .notes
            .push("No iron condor candidates satisfied the filters".to_string());
        return result;
    }

    candidates.sort_by(|a, b| compare(a, b, request.rank_by));
    candidates.truncate(request.effective_top_n());
    result.candidates = candidates;
    result
}
