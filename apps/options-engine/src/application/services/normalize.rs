//! Raw provider records to domain values.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::application::ports::ContractRecord;
use crate::domain::market_data::{ChainLeg, OptionChain, OptionType};

/// Trim and upper-case a symbol for cache keys and provider calls.
#[must_use]
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Parse a strict `YYYY-MM-DD` date. Anything else is rejected, including
/// timestamps and unpadded fields.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
#[must_use]
pub fn parse_expiration(value: &str) -> Option<NaiveDate> {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = DATE_REGEX
        .get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex is valid"));

    if !re.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Infer call/put from an OCC-style ticker (`...YYMMDD[C|P]strike8`).
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
#[must_use]
pub fn infer_option_type(ticker: &str) -> Option<OptionType> {
    static OCC_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = OCC_REGEX
        .get_or_init(|| Regex::new(r"(\d{6})([CP])(\d{8})$").expect("OCC regex is valid"));

    let caps = re.captures(ticker)?;
    match caps.get(2)?.as_str() {
        "C" => Some(OptionType::Call),
        "P" => Some(OptionType::Put),
        _ => None,
    }
}

/// Sorted, deduplicated expirations found in the records.
#[must_use]
pub fn extract_expirations(records: &[ContractRecord]) -> Vec<NaiveDate> {
    records
        .iter()
        .filter_map(|record| record.expiration_date.as_deref())
        .filter_map(parse_expiration)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The declared contract type, or the ticker's when none is declared.
fn record_type(record: &ContractRecord) -> Option<OptionType> {
    match record.contract_type.as_deref() {
        Some(declared) => OptionType::parse(declared),
        None => record.ticker.as_deref().and_then(infer_option_type),
    }
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

fn to_leg(record: &ContractRecord, strike: f64) -> ChainLeg {
    let mut bid = non_negative(record.bid);
    let mut ask = non_negative(record.ask);
    if let (Some(b), Some(a)) = (bid, ask)
        && a < b
    {
        tracing::debug!(
            ticker = record.ticker.as_deref().unwrap_or("-"),
            bid = b,
            ask = a,
            "Clearing inverted market"
        );
        bid = None;
        ask = None;
    }

    ChainLeg {
        strike,
        bid,
        ask,
        volume: record.volume,
        open_interest: record.open_interest,
        implied_volatility: record.implied_volatility.filter(|iv| iv.is_finite()),
        delta: record.delta,
        theta: record.theta,
        gamma: record.gamma,
        vega: record.vega,
        ticker: record.ticker.clone(),
    }
}

/// Build a chain for one expiration from raw records.
///
/// Records for other expirations, without a positive strike, or without a
/// determinable type are dropped. Legs are sorted by strike.
#[must_use]
pub fn assemble_chain(
    symbol: &str,
    expiration: NaiveDate,
    underlying: f64,
    as_of: DateTime<Utc>,
    records: &[ContractRecord],
) -> OptionChain {
    let mut calls = Vec::new();
    let mut puts = Vec::new();

    for record in records {
        let Some(record_expiration) = record.expiration_date.as_deref().and_then(parse_expiration)
        else {
            continue;
        };
        if record_expiration != expiration {
            continue;
        }
        let Some(strike) = record.strike_price.filter(|s| s.is_finite() && *s > 0.0) else {
            continue;
        };
        match record_type(record) {
            Some(OptionType::Call) => calls.push(to_leg(record, strike)),
            Some(OptionType::Put) => puts.push(to_leg(record, strike)),
            None => {
                tracing::debug!(ticker = ?record.ticker, "Skipping record without contract type");
            }
        }
    }

    calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    OptionChain {
        symbol: symbol.to_string(),
        underlying,
        expiration,
        calls,
        puts,
        as_of,
    }
}
