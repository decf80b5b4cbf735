//! Delta exposure aggregation
//!
//! Same grouping and IV defaults as gamma exposure. Dealers are assumed to
//! hold the opposite side of customer positions, so each side's exposure is
//! `-delta × OI × spot`.

use crate::core::{Chain, OptionType};
use crate::models::black_scholes;

use super::aggregate::group_by_strike;
use super::{DeltaExposureRow, ExposureConfig};

/// Delta exposure per strike, ascending by strike
pub fn aggregate_delta_at(
    chain: &Chain,
    spot: f64,
    time: f64,
    rate: f64,
    config: &ExposureConfig,
) -> Vec<DeltaExposureRow> {
    group_by_strike(chain)
        .into_iter()
        .map(|group| {
            let call_vol = group.calls.volatility(config.default_volatility);
            let put_vol = group.puts.volatility(config.default_volatility);

            let call_delta = black_scholes::delta(spot, group.strike, time, rate, call_vol, OptionType::Call);
            let put_delta = black_scholes::delta(spot, group.strike, time, rate, put_vol, OptionType::Put);

            let call_exposure = -call_delta * group.calls.open_interest as f64 * spot;
            let put_exposure = -put_delta * group.puts.open_interest as f64 * spot;

            DeltaExposureRow {
                strike: group.strike,
                call_delta,
                put_delta,
                call_exposure,
                put_exposure,
                net_exposure: call_exposure + put_exposure,
            }
        })
        .collect()
}
