//! Chain normalization: strike band and time to expiry

use chrono::NaiveDate;

use crate::core::{parse_expiry, Chain};

/// One day in years; floor for time to expiry
pub const MIN_TIME_TO_EXPIRY: f64 = 0.0027;

/// Keep quotes whose strike lies within `band_percent` of spot, inclusive
///
/// A non-positive (or NaN) band disables filtering and returns the chain
/// unchanged.
pub fn filter_by_band(chain: &Chain, spot: f64, band_percent: f64) -> Chain {
    if !(band_percent > 0.0) {
        return chain.clone();
    }

    let (lower, upper) = band_bounds(spot, band_percent);
    let quotes = chain
        .quotes
        .iter()
        .filter(|q| q.strike >= lower && q.strike <= upper)
        .cloned()
        .collect();

    Chain {
        underlying: chain.underlying.clone(),
        expiry: chain.expiry,
        spot: chain.spot,
        quotes,
        timestamp: chain.timestamp,
    }
}

/// Inclusive strike bounds for a band around spot
pub fn band_bounds(spot: f64, band_percent: f64) -> (f64, f64) {
    let half_width = spot * band_percent / 100.0;
    (spot - half_width, spot + half_width)
}

/// Years from `as_of` to `expiry` on a 365-day year, floored at one day
pub fn time_to_expiry(expiry: NaiveDate, as_of: NaiveDate) -> f64 {
    let days = (expiry - as_of).num_days();
    (days as f64 / 365.0).max(MIN_TIME_TO_EXPIRY)
}

/// Like [`time_to_expiry`] for a `DD-MMM-YYYY` string; unparseable input
/// gets the one-day floor
pub fn time_to_expiry_str(expiry: &str, as_of: NaiveDate) -> f64 {
    match parse_expiry(expiry) {
        Ok(date) => time_to_expiry(date, as_of),
        Err(e) => {
            tracing::warn!("{}; using one-day time to expiry", e);
            MIN_TIME_TO_EXPIRY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionQuote;

    fn chain_with_strikes(strikes: &[f64]) -> Chain {
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 29).unwrap();
        let quotes = strikes
            .iter()
            .flat_map(|&k| [OptionQuote::call(k, 100, 15.0), OptionQuote::put(k, 100, 15.0)])
            .collect();
        Chain::new("NIFTY", expiry, 100.0).with_quotes(quotes)
    }

    #[test]
    fn test_band_is_inclusive() {
        let chain = chain_with_strikes(&[80.0, 90.0, 100.0, 110.0, 120.0]);
        let filtered = filter_by_band(&chain, 100.0, 10.0);

        assert_eq!(filtered.strikes(), vec![90.0, 100.0, 110.0]);
        assert_eq!(filtered.len(), 6);
        assert_eq!(filtered.expiry, chain.expiry);
    }

    #[test]
    fn test_band_widening_is_monotonic() {
        let strikes: Vec<f64> = (0..=60).map(|i| 70.0 + i as f64).collect();
        let chain = chain_with_strikes(&strikes);

        let mut previous: Vec<f64> = Vec::new();
        for band in 1..=35 {
            let kept = filter_by_band(&chain, 100.0, band as f64).strikes();
            assert!(previous.iter().all(|k| kept.contains(k)), "band {} dropped a strike", band);
            previous = kept;
        }
    }

    #[test]
    fn test_non_positive_band_keeps_everything() {
        let chain = chain_with_strikes(&[80.0, 100.0, 120.0]);
        assert_eq!(filter_by_band(&chain, 100.0, 0.0).len(), chain.len());
        assert_eq!(filter_by_band(&chain, 100.0, -5.0).len(), chain.len());
        assert_eq!(filter_by_band(&chain, 100.0, f64::NAN).len(), chain.len());
    }

    #[test]
    fn test_time_to_expiry() {
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert!((time_to_expiry(expiry, as_of) - 30.0 / 365.0).abs() < 1e-12);

        // Same day and past expiries floor at one day
        assert_eq!(time_to_expiry(as_of, as_of), MIN_TIME_TO_EXPIRY);
        let past = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(time_to_expiry(past, as_of), MIN_TIME_TO_EXPIRY);
    }

    #[test]
    fn test_time_to_expiry_str() {
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!((time_to_expiry_str("31-JAN-2026", as_of) - 30.0 / 365.0).abs() < 1e-12);
        assert_eq!(time_to_expiry_str("not a date", as_of), MIN_TIME_TO_EXPIRY);
    }
}
