//! Synthetic option chains
//!
//! Used when the live chain is unavailable. Open interest peaks at the money
//! and decays linearly with distance; IVs are drawn from a flat 12-18% band.

use chrono::NaiveDate;
use rand::Rng;

use crate::core::{Chain, IndexSymbol, OptionQuote, OptionType};

/// Number of strikes generated around spot
pub const SAMPLE_STRIKE_COUNT: usize = 40;

/// Open interest profile: 100k at the money, -30 per point, floored at 5k
fn base_open_interest(strike: f64, spot: f64) -> f64 {
    (100_000.0 - (strike - spot).abs() * 30.0).max(5_000.0)
}

/// Strikes on the listing grid, centred on spot
pub fn sample_strikes(spot: f64, interval: f64, count: usize) -> Vec<f64> {
    let half = count as f64 / 2.0;
    let start = ((spot - half * interval) / interval).trunc() * interval;
    (0..count).map(|i| start + i as f64 * interval).collect()
}

fn sample_quote<R: Rng + ?Sized>(rng: &mut R, strike: f64, spot: f64, side: OptionType) -> OptionQuote {
    let base_oi = base_open_interest(strike, spot);
    let open_interest = (base_oi * rng.gen_range(0.8..1.2)) as u64;

    let intrinsic = match side {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    };
    let last_price = if side.is_itm(spot, strike) {
        intrinsic + rng.gen_range(5.0..50.0)
    } else {
        rng.gen_range(0.5..10.0)
    };

    let mut quote = OptionQuote::new(strike, side, open_interest, rng.gen_range(12.0..18.0));
    quote.last_price = last_price;
    quote.oi_change = rng.gen_range(-5_000..5_000);
    quote.volume = rng.gen_range(1_000..50_000);
    quote
}

/// Generate a call and a put at each of 40 strikes around `spot`
pub fn generate_sample_chain<R: Rng + ?Sized>(
    symbol: IndexSymbol,
    spot: f64,
    expiry: NaiveDate,
    rng: &mut R,
) -> Chain {
    let mut chain = Chain::new(symbol.ticker(), expiry, spot);

    for strike in sample_strikes(spot, symbol.strike_interval(), SAMPLE_STRIKE_COUNT) {
        chain.push(sample_quote(rng, strike, spot, OptionType::Call));
        chain.push(sample_quote(rng, strike, spot, OptionType::Put));
    }

    tracing::debug!("Generated sample {} chain around {:.2}", symbol, spot);
    chain
}
