//! Example: Black-Scholes gamma across strikes
//!
//! Run with: cargo run --example gamma_kernel

use gex_analyzer::prelude::*;

fn main() {
    let spot = 100.0;
    let time = 30.0 / 365.0;
    let rate = 0.07;
    let vol = 0.20;

    println!("Black-Scholes Gamma (S = {:.0}, T = 30d, r = {:.0}%, σ = {:.0}%)", spot, rate * 100.0, vol * 100.0);
    println!("=================================================\n");
    println!("{:>8} {:>10} {:>10} {:>10}", "Strike", "Gamma", "Δ call", "Δ put");

    for strike in (80..=120).step_by(5).map(f64::from) {
        let gamma = bs_gamma(spot, strike, time, rate, vol);
        let call = bs_delta(spot, strike, time, rate, vol, OptionType::Call);
        let put = bs_delta(spot, strike, time, rate, vol, OptionType::Put);
        println!("{:>8.0} {:>10.6} {:>10.4} {:>10.4}", strike, gamma, call, put);
    }

    println!("\nDegenerate inputs return zero gamma:");
    println!("  T = 0:   {}", bs_gamma(spot, 100.0, 0.0, rate, vol));
    println!("  σ = 0:   {}", bs_gamma(spot, 100.0, time, rate, 0.0));
    println!("  S = 0:   {}", bs_gamma(0.0, 100.0, time, rate, vol));
    println!("  σ = NaN: {}", bs_gamma(spot, 100.0, time, rate, f64::NAN));
}
