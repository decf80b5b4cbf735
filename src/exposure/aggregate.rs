//! Gamma exposure aggregation

use chrono::{NaiveDate, Utc};

use crate::core::{Chain, OptionQuote, OptionType};
use crate::models::black_scholes;

use super::{time_to_expiry, ExposureConfig, ExposureRow};

/// Per-side totals for one strike
#[derive(Debug, Clone, Default)]
pub(crate) struct SideStats {
    pub open_interest: u64,
    count: usize,
    iv_sum: f64,
    native_gamma_sum: f64,
    native_gamma_count: usize,
}

impl SideStats {
    fn add(&mut self, quote: &OptionQuote) {
        self.open_interest += quote.open_interest;
        self.count += 1;
        self.iv_sum += quote.implied_volatility;
        if let Some(g) = quote.native_gamma {
            self.native_gamma_sum += g;
            self.native_gamma_count += 1;
        }
    }

    /// Mean IV as a decimal fraction, or the default when the side has none
    pub fn volatility(&self, default_pct: f64) -> f64 {
        let mean = if self.count > 0 {
            self.iv_sum / self.count as f64
        } else {
            0.0
        };
        let pct = if mean > 0.0 { mean } else { default_pct };
        pct / 100.0
    }

    /// Mean vendor gamma, only when every quote on the side supplied one
    fn native_gamma(&self) -> Option<f64> {
        if self.count > 0 && self.native_gamma_count == self.count {
            Some(self.native_gamma_sum / self.count as f64)
        } else {
            None
        }
    }
}

/// All quotes at one strike, split by side
#[derive(Debug, Clone)]
pub(crate) struct StrikeGroup {
    pub strike: f64,
    pub calls: SideStats,
    pub puts: SideStats,
}

/// Group quotes by strike, ascending, one group per distinct strike
pub(crate) fn group_by_strike(chain: &Chain) -> Vec<StrikeGroup> {
    let mut quotes: Vec<&OptionQuote> = chain.quotes.iter().collect();
    quotes.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    let mut groups: Vec<StrikeGroup> = Vec::new();
    for quote in quotes {
        let start_new = groups.last().map_or(true, |g| g.strike != quote.strike);
        if start_new {
            groups.push(StrikeGroup {
                strike: quote.strike,
                calls: SideStats::default(),
                puts: SideStats::default(),
            });
        }
        if let Some(group) = groups.last_mut() {
            match quote.side {
                OptionType::Call => group.calls.add(quote),
                OptionType::Put => group.puts.add(quote),
            }
        }
    }
    groups
}

fn side_gamma(stats: &SideStats, spot: f64, strike: f64, time: f64, rate: f64, config: &ExposureConfig) -> f64 {
    if config.prefer_native_gamma {
        if let Some(g) = stats.native_gamma().filter(|g| g.is_finite()) {
            return g;
        }
    }
    let vol = stats.volatility(config.default_volatility);
    black_scholes::gamma(spot, strike, time, rate, vol)
}

/// Signed notional exposure for one side
fn scaled_exposure(gamma: f64, open_interest: u64, spot: f64, side: OptionType, config: &ExposureConfig) -> f64 {
    config.sign_convention.sign(side) * gamma * open_interest as f64 * spot * spot * config.scaling
}

/// Gamma exposure per strike for a chain, with time to expiry given in years
///
/// Rows are ascending by strike with one row per distinct strike. A strike
/// quoted on only one side contributes zero exposure on the other.
/// An empty chain yields no rows.
pub fn aggregate_at(chain: &Chain, spot: f64, time: f64, rate: f64, config: &ExposureConfig) -> Vec<ExposureRow> {
    group_by_strike(chain)
        .into_iter()
        .map(|group| {
            let call_gamma = side_gamma(&group.calls, spot, group.strike, time, rate, config);
            let put_gamma = side_gamma(&group.puts, spot, group.strike, time, rate, config);

            let call_exposure =
                scaled_exposure(call_gamma, group.calls.open_interest, spot, OptionType::Call, config);
            let put_exposure =
                scaled_exposure(put_gamma, group.puts.open_interest, spot, OptionType::Put, config);

            ExposureRow {
                strike: group.strike,
                call_open_interest: group.calls.open_interest,
                put_open_interest: group.puts.open_interest,
                call_gamma,
                put_gamma,
                call_exposure,
                put_exposure,
                net_exposure: call_exposure + put_exposure,
            }
        })
        .collect()
}

/// Gamma exposure per strike with time to expiry measured from today
/// and the default configuration
pub fn aggregate(chain: &Chain, spot: f64, expiry: NaiveDate, rate: f64) -> Vec<ExposureRow> {
    let time = time_to_expiry(expiry, Utc::now().date_naive());
    aggregate_at(chain, spot, time, rate, &ExposureConfig::default())
}

/// Net gamma exposure re-aggregated at each hypothetical spot
///
/// Open interest and IVs stay fixed; only the spot fed to the kernel and
/// the spot² notional move.
pub fn gex_profile(
    chain: &Chain,
    spots: &[f64],
    time: f64,
    rate: f64,
    config: &ExposureConfig,
) -> Vec<(f64, f64)> {
    spots
        .iter()
        .map(|&spot| {
            let net: f64 = aggregate_at(chain, spot, time, rate, config)
                .iter()
                .map(|r| r.net_exposure)
                .sum();
            (spot, net)
        })
        .collect()
}

/// Evenly spaced spots in `[spot - range, spot + range)`
pub fn spot_grid(spot: f64, range: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0 && range > 0.0) {
        return vec![spot];
    }
    let n = (2.0 * range / step).ceil() as usize;
    (0..n).map(|i| spot - range + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::SignConvention;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 29).unwrap()
    }

    fn scenario(put_oi: u64) -> Chain {
        Chain::new("TEST", expiry(), 100.0).with_quotes(vec![
            OptionQuote::call(100.0, 1000, 20.0),
            OptionQuote::put(100.0, put_oi, 20.0),
        ])
    }

    const T: f64 = 30.0 / 365.0;

    #[test]
    fn test_scenario_reference() {
        let config = ExposureConfig::default();
        let rows = aggregate_at(&scenario(2000), 100.0, T, 0.07, &config);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        let expected_gamma = black_scholes::gamma(100.0, 100.0, T, 0.07, 0.20);
        assert!((row.call_gamma - 0.069_000_416).abs() < 1e-6);
        assert_eq!(row.call_gamma, expected_gamma);
        assert_eq!(row.put_gamma, expected_gamma);

        // gamma * OI * S^2 * 0.01, calls negative
        let expected_call = -expected_gamma * 1000.0 * 100.0 * 100.0 * 0.01;
        assert!((row.call_exposure - expected_call).abs() < 1e-9);
        assert!(row.put_exposure > 0.0);
        assert_eq!(row.net_exposure, row.call_exposure + row.put_exposure);
    }

    #[test]
    fn test_exposure_linear_in_open_interest() {
        let config = ExposureConfig::default();
        let single = aggregate_at(&scenario(2000), 100.0, T, 0.07, &config);
        let double = aggregate_at(&scenario(4000), 100.0, T, 0.07, &config);

        assert!((double[0].put_exposure - 2.0 * single[0].put_exposure).abs() < 1e-9);
        assert_eq!(double[0].call_exposure, single[0].call_exposure);
    }

    #[test]
    fn test_groups_duplicates_and_orders_strikes() {
        let chain = Chain::new("TEST", expiry(), 100.0).with_quotes(vec![
            OptionQuote::call(110.0, 100, 18.0),
            OptionQuote::put(90.0, 300, 22.0),
            OptionQuote::call(100.0, 500, 20.0),
            OptionQuote::call(100.0, 250, 10.0),
            OptionQuote::put(100.0, 700, 20.0),
        ]);
        let rows = aggregate_at(&chain, 100.0, T, 0.07, &ExposureConfig::default());

        let strikes: Vec<f64> = rows.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![90.0, 100.0, 110.0]);
        assert_eq!(rows[1].call_open_interest, 750);
        assert_eq!(rows[1].put_open_interest, 700);

        // Mean IV of 20 and 10 is 15
        let expected = black_scholes::gamma(100.0, 100.0, T, 0.07, 0.15);
        assert!((rows[1].call_gamma - expected).abs() < 1e-15);

        // One-sided strikes
        assert_eq!(rows[0].call_open_interest, 0);
        assert_eq!(rows[0].call_exposure, 0.0);
        assert_eq!(rows[2].put_exposure, 0.0);

        for row in &rows {
            assert_eq!(row.net_exposure, row.call_exposure + row.put_exposure);
        }
    }

    #[test]
    fn test_missing_iv_uses_default() {
        let chain = Chain::new("TEST", expiry(), 100.0).with_quotes(vec![
            OptionQuote::call(100.0, 100, 0.0),
            OptionQuote::put(100.0, 100, 0.0),
        ]);
        let rows = aggregate_at(&chain, 100.0, T, 0.07, &ExposureConfig::default());
        let expected = black_scholes::gamma(100.0, 100.0, T, 0.07, 0.15);
        assert_eq!(rows[0].call_gamma, expected);
        assert_eq!(rows[0].put_gamma, expected);
    }

    #[test]
    fn test_empty_chain() {
        let chain = Chain::new("TEST", expiry(), 100.0);
        assert!(aggregate_at(&chain, 100.0, T, 0.07, &ExposureConfig::default()).is_empty());
        assert!(aggregate(&chain, 100.0, expiry(), 0.07).is_empty());
    }

    #[test]
    fn test_sign_convention_flips_every_row() {
        let chain = scenario(2000);
        let short = aggregate_at(&chain, 100.0, T, 0.07, &ExposureConfig::default());
        let long = aggregate_at(
            &chain,
            100.0,
            T,
            0.07,
            &ExposureConfig {
                sign_convention: SignConvention::DealerLongCalls,
                ..Default::default()
            },
        );
        assert_eq!(short[0].call_exposure, -long[0].call_exposure);
        assert_eq!(short[0].put_exposure, -long[0].put_exposure);
        assert_eq!(short[0].net_exposure, -long[0].net_exposure);
    }

    #[test]
    fn test_native_gamma_preference() {
        let chain = Chain::new("TEST", expiry(), 100.0).with_quotes(vec![
            OptionQuote::call(100.0, 100, 20.0).with_native_gamma(0.05),
            OptionQuote::put(100.0, 100, 20.0),
        ]);
        let config = ExposureConfig {
            prefer_native_gamma: true,
            ..Default::default()
        };
        let rows = aggregate_at(&chain, 100.0, T, 0.07, &config);
        assert_eq!(rows[0].call_gamma, 0.05);
        // Put side has no vendor gamma and falls back to the kernel
        assert_eq!(rows[0].put_gamma, black_scholes::gamma(100.0, 100.0, T, 0.07, 0.20));

        // Ignored unless asked for
        let rows = aggregate_at(&chain, 100.0, T, 0.07, &ExposureConfig::default());
        assert_ne!(rows[0].call_gamma, 0.05);
    }

    #[test]
    fn test_gex_profile() {
        let chain = scenario(2000);
        let spots = spot_grid(100.0, 10.0, 5.0);
        assert_eq!(spots, vec![90.0, 95.0, 100.0, 105.0]);

        let profile = gex_profile(&chain, &spots, T, 0.07, &ExposureConfig::default());
        assert_eq!(profile.len(), 4);

        let at_spot = aggregate_at(&chain, 100.0, T, 0.07, &ExposureConfig::default());
        assert!((profile[2].1 - at_spot[0].net_exposure).abs() < 1e-9);
        // Net is put-heavy, so positive at every spot
        assert!(profile.iter().all(|&(_, net)| net > 0.0));
    }
}
