//! Black-Scholes Greeks
//!
//! Provides the closed-form gamma and delta used by the exposure aggregator.
//!
//! The kernel is advisory: it never returns an error. Degenerate inputs
//! (expired contract, zero vol, non-positive spot) and any numerical
//! breakdown collapse to a fixed value instead of propagating NaN or
//! infinity into the aggregation.

use std::f64::consts::PI;

use statrs::distribution::{ContinuousCDF, Normal};

use crate::core::OptionType;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter (no dividend yield)
///
/// d1 = (ln(S/K) + (r + σ²/2)·T) / (σ·√T)
pub fn d1(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

fn is_degenerate(spot: f64, time: f64, vol: f64) -> bool {
    // Written as negated comparisons so NaN inputs count as degenerate
    !(time > 0.0) || !(vol > 0.0) || !(spot > 0.0)
}

/// Black-Scholes gamma, identical for calls and puts
///
/// Returns exactly `0.0` for an expired contract, zero volatility,
/// non-positive spot, or whenever the result is not finite.
///
/// # Arguments
/// * `spot` - Underlying price
/// * `strike` - Strike price
/// * `time` - Time to expiry in years
/// * `rate` - Risk-free rate (decimal)
/// * `vol` - Volatility (decimal, 0.20 = 20%)
pub fn gamma(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    if is_degenerate(spot, time, vol) {
        return 0.0;
    }

    let sqrt_t = time.sqrt();
    let d1 = d1(spot, strike, time, rate, vol);
    let gamma = norm_pdf(d1) / (spot * vol * sqrt_t);

    if gamma.is_finite() {
        gamma
    } else {
        0.0
    }
}

/// Black-Scholes delta
///
/// Call: Φ(d1), Put: -Φ(-d1). Without a usable d1 the contract is treated
/// as expired and priced on moneyness: a call is 1 in the money and 0
/// otherwise, a put -1 in the money and 0 otherwise.
pub fn delta(spot: f64, strike: f64, time: f64, rate: f64, vol: f64, option_type: OptionType) -> f64 {
    let expired = || {
        if option_type.is_itm(spot, strike) {
            option_type.phi()
        } else {
            0.0
        }
    };

    if !(time > 0.0) || !(vol > 0.0) {
        return expired();
    }

    let d1 = d1(spot, strike, time, rate, vol);
    if !d1.is_finite() {
        return expired();
    }

    match option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => -norm_cdf(-d1),
    }
}
