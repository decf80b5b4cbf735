//! Side totals and put-call ratios

use serde::{Deserialize, Serialize};

use crate::core::{Chain, OptionType};
use crate::levels::GammaRegime;

use super::aggregate::group_by_strike;
use super::ExposureRow;

/// Book-level gamma exposure totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureSummary {
    pub total_call_gex: f64,
    pub total_put_gex: f64,
    pub net_gex: f64,
    pub regime: GammaRegime,
}

pub fn summarize_exposure(rows: &[ExposureRow]) -> ExposureSummary {
    let total_call_gex: f64 = rows.iter().map(|r| r.call_exposure).sum();
    let total_put_gex: f64 = rows.iter().map(|r| r.put_exposure).sum();
    let net_gex: f64 = rows.iter().map(|r| r.net_exposure).sum();

    ExposureSummary {
        total_call_gex,
        total_put_gex,
        net_gex,
        regime: GammaRegime::from_total(net_gex),
    }
}

/// Put-call ratio at one strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikePcr {
    pub strike: f64,
    pub call_oi: u64,
    pub put_oi: u64,
    pub pcr: f64,
}

/// Open interest totals across the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestSummary {
    pub total_call_oi: u64,
    pub total_put_oi: u64,
    /// Put OI / call OI, 0 when there is no call OI
    pub pcr: f64,
    pub by_strike: Vec<StrikePcr>,
}

fn ratio(put_oi: u64, call_oi: u64) -> f64 {
    if call_oi > 0 {
        put_oi as f64 / call_oi as f64
    } else {
        0.0
    }
}

pub fn summarize_open_interest(chain: &Chain) -> OpenInterestSummary {
    let total_call_oi = chain.total_open_interest(OptionType::Call);
    let total_put_oi = chain.total_open_interest(OptionType::Put);

    let by_strike = group_by_strike(chain)
        .into_iter()
        .map(|g| StrikePcr {
            strike: g.strike,
            call_oi: g.calls.open_interest,
            put_oi: g.puts.open_interest,
            pcr: ratio(g.puts.open_interest, g.calls.open_interest),
        })
        .collect();

    OpenInterestSummary {
        total_call_oi,
        total_put_oi,
        pcr: ratio(total_put_oi, total_call_oi),
        by_strike,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionQuote;
    use chrono::NaiveDate;

    #[test]
    fn test_open_interest_summary() {
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 29).unwrap();
        let chain = Chain::new("TEST", expiry, 100.0).with_quotes(vec![
            OptionQuote::call(100.0, 1000, 20.0),
            OptionQuote::put(100.0, 1500, 20.0),
            OptionQuote::put(90.0, 500, 20.0),
        ]);
        let summary = summarize_open_interest(&chain);

        assert_eq!(summary.total_call_oi, 1000);
        assert_eq!(summary.total_put_oi, 2000);
        assert!((summary.pcr - 2.0).abs() < 1e-12);

        assert_eq!(summary.by_strike.len(), 2);
        assert_eq!(summary.by_strike[0].strike, 90.0);
        // No calls at 90: ratio reported as 0
        assert_eq!(summary.by_strike[0].pcr, 0.0);
        assert!((summary.by_strike[1].pcr - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_exposure_summary() {
        let rows = vec![
            ExposureRow {
                strike: 100.0,
                call_open_interest: 10,
                put_open_interest: 10,
                call_gamma: 0.01,
                put_gamma: 0.01,
                call_exposure: -5.0,
                put_exposure: 3.0,
                net_exposure: -2.0,
            },
            ExposureRow {
                strike: 110.0,
                call_open_interest: 10,
                put_open_interest: 10,
                call_gamma: 0.01,
                put_gamma: 0.01,
                call_exposure: -1.0,
                put_exposure: 0.5,
                net_exposure: -0.5,
            },
        ];
        let summary = summarize_exposure(&rows);
        assert_eq!(summary.total_call_gex, -6.0);
        assert_eq!(summary.total_put_gex, 3.5);
        assert_eq!(summary.net_gex, -2.5);
        assert_eq!(summary.regime, GammaRegime::Negative);
    }
}
