//! Exposure Aggregation
//!
//! Turns a raw option chain into per-strike dealer exposure.
//!
//! Pipeline:
//! 1. **Normalize**: keep strikes within a band around spot, compute time to expiry
//! 2. **Aggregate**: group quotes by strike, price gamma (or delta) per side,
//!    scale by open interest and notional
//! 3. **Summarize**: side totals, put-call ratios
//!
//! ## Sign convention
//!
//! Exposure is quoted from the dealer's book. The default,
//! [`SignConvention::DealerShortCalls`], assumes customers buy calls and sell
//! puts, so dealers are short call gamma and long put gamma: call exposure is
//! negative and put exposure positive. A positive net total therefore means
//! dealers are long gamma (a dampening, "positive gamma" regime).
//! [`SignConvention::DealerLongCalls`] flips both sides.

mod aggregate;
mod delta;
mod normalize;
mod summary;

pub use aggregate::*;
pub use delta::*;
pub use normalize::*;
pub use summary::*;

use serde::{Deserialize, Serialize};

use crate::core::OptionType;

/// Notional scaling applied to gamma × OI × spot² (a 1% move)
pub const DEFAULT_SCALING: f64 = 0.01;

/// Implied volatility, in percent, used when a side has none
pub const DEFAULT_VOLATILITY_PCT: f64 = 15.0;

/// Default annual risk-free rate
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.07;

/// Which side of the book carries positive exposure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    /// Dealers short calls, long puts: calls negative, puts positive
    #[default]
    DealerShortCalls,
    /// Dealers long calls, short puts: calls positive, puts negative
    DealerLongCalls,
}

impl SignConvention {
    /// Sign applied to raw exposure of the given side
    pub fn sign(&self, side: OptionType) -> f64 {
        match (self, side) {
            (SignConvention::DealerShortCalls, OptionType::Call) => -1.0,
            (SignConvention::DealerShortCalls, OptionType::Put) => 1.0,
            (SignConvention::DealerLongCalls, OptionType::Call) => 1.0,
            (SignConvention::DealerLongCalls, OptionType::Put) => -1.0,
        }
    }
}

/// Aggregation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Notional scaling constant `k`
    pub scaling: f64,
    /// Fallback IV in percent when a side has no usable IV
    pub default_volatility: f64,
    /// Dealer positioning assumption
    pub sign_convention: SignConvention,
    /// Use vendor gamma instead of Black-Scholes when every quote on a side has it
    pub prefer_native_gamma: bool,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            scaling: DEFAULT_SCALING,
            default_volatility: DEFAULT_VOLATILITY_PCT,
            sign_convention: SignConvention::default(),
            prefer_native_gamma: false,
        }
    }
}

/// One strike's gamma exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRow {
    pub strike: f64,
    #[serde(rename = "call_oi")]
    pub call_open_interest: u64,
    #[serde(rename = "put_oi")]
    pub put_open_interest: u64,
    pub call_gamma: f64,
    pub put_gamma: f64,
    #[serde(rename = "call_gex")]
    pub call_exposure: f64,
    #[serde(rename = "put_gex")]
    pub put_exposure: f64,
    /// Always `call_exposure + put_exposure`
    #[serde(rename = "total_gex")]
    pub net_exposure: f64,
}

/// One strike's delta exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaExposureRow {
    pub strike: f64,
    pub call_delta: f64,
    pub put_delta: f64,
    #[serde(rename = "call_dex")]
    pub call_exposure: f64,
    #[serde(rename = "put_dex")]
    pub put_exposure: f64,
    #[serde(rename = "total_dex")]
    pub net_exposure: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_conventions_are_opposite() {
        for side in [OptionType::Call, OptionType::Put] {
            assert_eq!(
                SignConvention::DealerShortCalls.sign(side),
                -SignConvention::DealerLongCalls.sign(side)
            );
        }
        assert_eq!(SignConvention::default().sign(OptionType::Call), -1.0);
    }

    #[test]
    fn test_row_serializes_flat_columns() {
        let row = ExposureRow {
            strike: 100.0,
            call_open_interest: 1,
            put_open_interest: 2,
            call_gamma: 0.1,
            put_gamma: 0.1,
            call_exposure: -1.0,
            put_exposure: 2.0,
            net_exposure: 1.0,
        };
        let json = serde_json::to_value(&row).unwrap();
        for key in ["strike", "call_oi", "put_oi", "call_gamma", "put_gamma", "call_gex", "put_gex", "total_gex"] {
            assert!(json.get(key).is_some(), "missing column {}", key);
        }
    }
}
