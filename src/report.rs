//! Plain-text analysis report

use std::fmt;

use chrono::NaiveDate;

use crate::analyzer::Analysis;
use crate::core::{atm_strike, format_expiry, IndexSymbol};

/// Number of strikes listed in the exposure table
const TOP_STRIKES: usize = 10;

const CRORE: f64 = 1e7;
const LAKH: f64 = 1e5;

/// Rupee amount in crore / lakh notation
///
/// `₹x.xxCr` from one crore, `₹x.xxL` from one lakh, otherwise whole rupees
/// with comma thousands separators.
pub fn format_inr(amount: f64) -> String {
    if amount.abs() >= CRORE {
        format!("₹{:.2}Cr", amount / CRORE)
    } else if amount.abs() >= LAKH {
        format!("₹{:.2}L", amount / LAKH)
    } else {
        format!("₹{}", group_thousands(amount))
    }
}

fn group_thousands(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0.0 && digits != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

fn format_strike(strike: Option<f64>) -> String {
    match strike {
        Some(k) => format!("₹{}", group_thousands(k)),
        None => "N/A".to_string(),
    }
}

/// Report for one analysis, rendered through `Display`
pub struct Report<'a> {
    pub analysis: &'a Analysis,
    pub symbol: IndexSymbol,
    pub expiry: NaiveDate,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.analysis;
        let levels = &a.levels;
        let summary = &a.exposure_summary;

        writeln!(f, "GEX Analysis: {} ({})", self.symbol, self.symbol.index_name())?;
        writeln!(f, "==========================================")?;
        writeln!(f, "  Expiry:        {}", format_expiry(self.expiry))?;
        writeln!(f, "  Time to exp:   {:.1} days", a.time_to_expiry * 365.0)?;
        writeln!(f, "  Spot:          ₹{:.2}", a.spot)?;
        writeln!(
            f,
            "  ATM strike:    ₹{}",
            group_thousands(atm_strike(a.spot, self.symbol.strike_interval()))
        )?;
        writeln!(f)?;

        writeln!(f, "Key Levels:")?;
        writeln!(
            f,
            "  Gamma flip:    {} ({:+.0})",
            format_strike(Some(levels.flip_strike)),
            levels.flip_distance(a.spot)
        )?;
        writeln!(f, "  Support:       {}", format_strike(levels.support_strike))?;
        writeln!(f, "  Resistance:    {}", format_strike(levels.resistance_strike))?;
        writeln!(f, "  Regime:        {}", summary.regime.label())?;
        writeln!(f)?;

        writeln!(f, "GEX Summary:")?;
        writeln!(f, "  Total call GEX: {}", format_inr(summary.total_call_gex))?;
        writeln!(f, "  Total put GEX:  {}", format_inr(summary.total_put_gex))?;
        writeln!(f, "  Net GEX:        {}", format_inr(summary.net_gex))?;
        writeln!(f, "  Above spot:     {}", format_inr(levels.gex_above_spot))?;
        writeln!(f, "  Below spot:     {}", format_inr(levels.gex_below_spot))?;
        writeln!(f)?;

        let oi = &a.oi_summary;
        writeln!(f, "Open Interest:")?;
        writeln!(f, "  Call OI:       {}", group_thousands(oi.total_call_oi as f64))?;
        writeln!(f, "  Put OI:        {}", group_thousands(oi.total_put_oi as f64))?;
        writeln!(f, "  PCR:           {:.2}", oi.pcr)?;

        if !a.rows.is_empty() {
            let mut top: Vec<_> = a.rows.iter().collect();
            top.sort_by(|x, y| y.net_exposure.abs().total_cmp(&x.net_exposure.abs()));
            top.truncate(TOP_STRIKES);
            top.sort_by(|x, y| x.strike.total_cmp(&y.strike));

            writeln!(f)?;
            writeln!(f, "Top strikes by |net GEX|:")?;
            writeln!(f, "  {:>8} {:>10} {:>10} {:>14}", "Strike", "Call OI", "Put OI", "Net GEX")?;
            for row in top {
                writeln!(
                    f,
                    "  {:>8.0} {:>10} {:>10} {:>14}",
                    row.strike,
                    row.call_open_interest,
                    row.put_open_interest,
                    format_inr(row.net_exposure)
                )?;
            }
        }

        Ok(())
    }
}

/// Render the full text report
pub fn render_report(analysis: &Analysis, symbol: IndexSymbol, expiry: NaiveDate) -> String {
    Report {
        analysis,
        symbol,
        expiry,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::GexAnalyzer;
    use crate::core::{Chain, OptionQuote};

    #[test]
    fn test_format_inr_crore_and_lakh() {
        assert_eq!(format_inr(25_000_000.0), "₹2.50Cr");
        assert_eq!(format_inr(-10_000_000.0), "₹-1.00Cr");
        assert_eq!(format_inr(150_000.0), "₹1.50L");
        assert_eq!(format_inr(-99_999_999.0), "₹-10.00Cr");
    }

    #[test]
    fn test_format_inr_small_amounts() {
        assert_eq!(format_inr(99_999.0), "₹99,999");
        assert_eq!(format_inr(1_234.4), "₹1,234");
        assert_eq!(format_inr(-1_234.0), "₹-1,234");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(-0.2), "₹0");
    }

    #[test]
    fn test_render_report() {
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 29).unwrap();
        let chain = Chain::new("NIFTY", expiry, 23512.0).with_quotes(vec![
            OptionQuote::call(23500.0, 120_000, 14.0),
            OptionQuote::put(23500.0, 90_000, 14.5),
            OptionQuote::call(23600.0, 150_000, 13.5),
            OptionQuote::put(23400.0, 160_000, 15.0),
        ]);
        let analysis = GexAnalyzer::default().analyze(&chain, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());

        let report = render_report(&analysis, IndexSymbol::Nifty, expiry);
        assert!(report.contains("NIFTY 50"));
        assert!(report.contains("29-JAN-2026"));
        assert!(report.contains("₹23,500"));
        assert!(report.contains("Gamma flip"));
        assert!(report.contains(analysis.exposure_summary.regime.label()));
        assert!(report.contains("Top strikes"));
    }

    #[test]
    fn test_render_report_without_rows() {
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 29).unwrap();
        let chain = Chain::new("BANKNIFTY", expiry, 48000.0);
        let analysis = GexAnalyzer::default().analyze(&chain, expiry);

        let report = render_report(&analysis, IndexSymbol::BankNifty, expiry);
        assert!(report.contains("N/A"));
        assert!(!report.contains("Top strikes"));
    }
}
