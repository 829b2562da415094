//! Volatility, time-to-expiry, and lognormal probability estimates.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::cleaning::CleanLeg;
use crate::domain::pricing::norm_cdf;

/// Number of strikes nearest the underlying used for the IV estimate.
const NEAR_STRIKES: usize = 12;

/// IVs at or above this are treated as bad data.
const MAX_USABLE_IV: f64 = 5.0;

/// Seconds in a 365-day year.
const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// One hour, in years.
const MIN_YEARS: f64 = 1.0 / 8760.0;

/// Upper clamp on time to expiry, in years.
const MAX_YEARS: f64 = 5.0;

/// Hour (UTC) at which an expiration date is considered to expire.
const EXPIRY_HOUR_UTC: u32 = 21;

fn usable_iv(leg: &CleanLeg) -> Option<f64> {
    leg.implied_volatility
        .filter(|iv| iv.is_finite() && *iv > 0.0 && *iv < MAX_USABLE_IV)
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(values[mid - 1].midpoint(values[mid]))
    } else {
        Some(values[mid])
    }
}

/// Median IV of the legs at the strikes nearest the underlying, falling back
/// to the median of every usable IV.
#[must_use]
pub fn estimate_iv(legs: &[&CleanLeg], underlying: f64) -> Option<f64> {
    let mut strikes: Vec<f64> = legs.iter().map(|leg| leg.strike).collect();
    strikes.sort_by(|a, b| {
        (a - underlying)
            .abs()
            .total_cmp(&(b - underlying).abs())
            .then_with(|| a.total_cmp(b))
    });
    strikes.dedup();
    strikes.truncate(NEAR_STRIKES);

    let near: Vec<f64> = legs
        .iter()
        .filter(|leg| strikes.contains(&leg.strike))
        .filter_map(|leg| usable_iv(leg))
        .collect();
    if let Some(iv) = median(near) {
        return Some(iv);
    }

    median(legs.iter().filter_map(|leg| usable_iv(leg)).collect())
}

/// Years from `as_of` to 21:00 UTC on `expiration`, clamped to
/// `[1 hour, 5 years]`.
#[must_use]
pub fn years_until(expiration: NaiveDate, as_of: DateTime<Utc>) -> f64 {
    let close = NaiveTime::from_hms_opt(EXPIRY_HOUR_UTC, 0, 0).unwrap_or(NaiveTime::MIN);
    let expiry = expiration.and_time(close).and_utc();

    let seconds = (expiry - as_of).num_seconds() as f64;
    (seconds / SECONDS_PER_YEAR).clamp(MIN_YEARS, MAX_YEARS)
}

/// [`years_until`] for a `YYYY-MM-DD` string. `None` when it does not parse.
#[must_use]
pub fn years_to_expiry(expiration: &str, as_of: DateTime<Utc>) -> Option<f64> {
    let date = NaiveDate::parse_from_str(expiration, "%Y-%m-%d").ok()?;
    Some(years_until(date, as_of))
}

/// Probability the underlying finishes between the breakevens under a
/// driftless lognormal model (`mu = -sigma^2 T / 2`).
#[must_use]
pub fn lognormal_pop(lower: f64, upper: f64, spot: f64, sigma: f64, years: f64) -> Option<f64> {
    if !(sigma > 0.0 && years > 0.0 && spot > 0.0 && upper > lower) {
        return None;
    }
    let scale = sigma * years.sqrt();
    let mu = -0.5 * sigma * sigma * years;
    let z = |k: f64| ((k / spot).ln() - mu) / scale;

    let upper_cdf = norm_cdf(z(upper));
    let lower_cdf = if lower > 0.0 { norm_cdf(z(lower)) } else { 0.0 };
    Some((upper_cdf - lower_cdf).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn clean(strike: f64, iv: Option<f64>) -> CleanLeg {
        CleanLeg {
            strike,
            bid: 1.0,
            ask: 1.1,
            implied_volatility: iv,
        }
    }

    #[test]
    fn iv_median_of_near_strikes() {
        let legs = [
            clean(95.0, Some(0.30)),
            clean(100.0, Some(0.20)),
            clean(105.0, Some(0.25)),
        ];
        let refs: Vec<&CleanLeg> = legs.iter().collect();
        assert_eq!(estimate_iv(&refs, 100.0), Some(0.25));
    }

    #[test]
    fn iv_ignores_far_strikes_when_near_ones_usable() {
        let mut legs: Vec<CleanLeg> = (0..12)
            .map(|i| clean(95.0 + f64::from(i), Some(0.20)))
            .collect();
        legs.push(clean(300.0, Some(0.90)));
        legs.push(clean(310.0, Some(0.90)));
        let refs: Vec<&CleanLeg> = legs.iter().collect();
        assert_eq!(estimate_iv(&refs, 100.0), Some(0.20));
    }

    #[test]
    fn iv_falls_back_to_all_usable() {
        let mut legs: Vec<CleanLeg> = (0..12).map(|i| clean(95.0 + f64::from(i), None)).collect();
        legs.push(clean(300.0, Some(0.40)));
        legs.push(clean(310.0, Some(0.60)));
        let refs: Vec<&CleanLeg> = legs.iter().collect();
        assert_eq!(estimate_iv(&refs, 100.0), Some(0.5));
    }

    #[test]
    fn iv_rejects_out_of_range_values() {
        let legs = [clean(100.0, Some(0.0)), clean(101.0, Some(7.5))];
        let refs: Vec<&CleanLeg> = legs.iter().collect();
        assert_eq!(estimate_iv(&refs, 100.0), None);
        assert_eq!(estimate_iv(&[], 100.0), None);
    }

    #[test]
    fn years_anchor_at_close() {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 19, 21, 0, 0).unwrap();
        let years = years_to_expiry("2026-03-20", as_of).unwrap();
        assert!((years - 1.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn years_are_clamped() {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 21, 0, 0, 0).unwrap();
        assert_eq!(years_to_expiry("2026-03-20", as_of), Some(MIN_YEARS));
        assert_eq!(years_to_expiry("2040-01-01", as_of), Some(MAX_YEARS));
    }

    #[test]
    fn years_until_matches_string_form() {
        let as_of = Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        assert_eq!(Some(years_until(date, as_of)), years_to_expiry("2026-03-20", as_of));
    }

    #[test]
    fn years_reject_bad_dates() {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(years_to_expiry("03/20/2026", as_of), None);
        assert_eq!(years_to_expiry("2026-02-30", as_of), None);
    }

    #[test]
    fn lognormal_pop_is_a_probability() {
        let pop = lognormal_pop(93.0, 107.0, 100.0, 0.20, 30.0 / 365.0).unwrap();
        assert!(pop > 0.5 && pop < 1.0);

        let wider = lognormal_pop(80.0, 120.0, 100.0, 0.20, 30.0 / 365.0).unwrap();
        assert!(wider > pop);
    }

    #[test]
    fn lognormal_pop_requires_inputs() {
        assert_eq!(lognormal_pop(93.0, 107.0, 100.0, 0.0, 0.1), None);
        assert_eq!(lognormal_pop(93.0, 107.0, 100.0, 0.2, 0.0), None);
        assert_eq!(lognormal_pop(107.0, 93.0, 100.0, 0.2, 0.1), None);
    }
}
