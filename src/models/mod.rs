//! Pricing Models
//!
//! Black-Scholes is the only model: exposure needs per-strike gamma and
//! delta under flat per-strike implied volatility.

pub mod black_scholes;

pub use black_scholes::*;
