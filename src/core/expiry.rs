//! Expiry calendar and strike helpers
//!
//! NSE index options expire on Thursdays: weeklies every Thursday, monthlies
//! on the last Thursday of the month. Holiday shifts are not modelled.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::error::{GexError, GexResult};

/// Display / wire format for expiry dates, e.g. `30-JAN-2026`
pub const EXPIRY_FORMAT: &str = "%d-%b-%Y";

/// Weekly or monthly expiry cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryKind {
    Weekly,
    Monthly,
}

impl ExpiryKind {
    /// Next expiry of this kind as seen from `today`
    pub fn next_after(&self, today: NaiveDate) -> NaiveDate {
        match self {
            ExpiryKind::Weekly => next_weekly_expiry(today),
            ExpiryKind::Monthly => next_monthly_expiry(today),
        }
    }
}

/// Next Thursday strictly after `today`
pub fn next_weekly_expiry(today: NaiveDate) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let thursday = Weekday::Thu.num_days_from_monday() as i64;
    let mut days_ahead = thursday - current;
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    today + Duration::days(days_ahead)
}

/// Last Thursday of the month containing `today`, or of the following month
/// once that date has passed
pub fn next_monthly_expiry(today: NaiveDate) -> NaiveDate {
    let this_month = last_thursday(today.year(), today.month());
    if this_month >= today {
        return this_month;
    }

    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    last_thursday(year, month)
}

/// `count` consecutive weekly expiries starting after `today`
pub fn upcoming_weekly_expiries(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut expiries = Vec::with_capacity(count);
    let mut current = today;
    for _ in 0..count {
        let expiry = next_weekly_expiry(current);
        expiries.push(expiry);
        current = expiry;
    }
    expiries
}

fn last_thursday(year: i32, month: u32) -> NaiveDate {
    let last_day = last_day_of_month(year, month);
    let offset = (last_day.weekday().num_days_from_monday() as i64
        - Weekday::Thu.num_days_from_monday() as i64)
        .rem_euclid(7);
    last_day - Duration::days(offset)
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    // The first of any month always exists for years chrono supports
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Format as `DD-MMM-YYYY`, upper-case month
pub fn format_expiry(date: NaiveDate) -> String {
    date.format(EXPIRY_FORMAT).to_string().to_uppercase()
}

/// Parse `DD-MMM-YYYY` (month name in any case)
pub fn parse_expiry(s: &str) -> GexResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), EXPIRY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .map_err(|e| GexError::invalid_input(format!("bad expiry date '{}': {}", s, e)))
}

/// Spot rounded to the nearest strike interval
pub fn atm_strike(spot: f64, interval: f64) -> f64 {
    if interval <= 0.0 {
        return spot;
    }
    (spot / interval).round() * interval
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_weekly_expiry() {
        // Monday -> same week's Thursday
        assert_eq!(next_weekly_expiry(date(2026, 1, 19)), date(2026, 1, 22));
        // Thursday rolls to the following week
        assert_eq!(next_weekly_expiry(date(2026, 1, 22)), date(2026, 1, 29));
        // Saturday -> next Thursday
        assert_eq!(next_weekly_expiry(date(2026, 1, 24)), date(2026, 1, 29));
    }

    #[test]
    fn test_next_monthly_expiry() {
        // Last Thursday of January 2026 is the 29th
        assert_eq!(next_monthly_expiry(date(2026, 1, 5)), date(2026, 1, 29));
        assert_eq!(next_monthly_expiry(date(2026, 1, 29)), date(2026, 1, 29));
        // Past it: February 2026 ends on Saturday the 28th -> Thursday 26th
        assert_eq!(next_monthly_expiry(date(2026, 1, 30)), date(2026, 2, 26));
        // December rolls into next year
        assert_eq!(next_monthly_expiry(date(2025, 12, 30)), date(2026, 1, 29));
    }

    #[test]
    fn test_upcoming_weekly_expiries() {
        let expiries = upcoming_weekly_expiries(date(2026, 1, 19), 3);
        assert_eq!(expiries, vec![date(2026, 1, 22), date(2026, 1, 29), date(2026, 2, 5)]);
        assert!(expiries.iter().all(|d| d.weekday() == Weekday::Thu));
    }

    #[test]
    fn test_format_and_parse() {
        let d = date(2026, 1, 30);
        assert_eq!(format_expiry(d), "30-JAN-2026");
        assert_eq!(parse_expiry("30-JAN-2026").unwrap(), d);
        assert_eq!(parse_expiry("30-Jan-2026").unwrap(), d);
        assert_eq!(parse_expiry("2026-01-30").unwrap(), d);
        assert!(parse_expiry("someday").is_err());
    }

    #[test]
    fn test_atm_strike() {
        assert_eq!(atm_strike(23512.4, 50.0), 23500.0);
        assert_eq!(atm_strike(23530.0, 50.0), 23550.0);
        assert_eq!(atm_strike(48049.0, 100.0), 48000.0);
        assert_eq!(atm_strike(101.0, 0.0), 101.0);
    }
}
