//! Key Gamma Levels
//!
//! Reads the per-strike exposure curve and reports the strikes that tend to
//! shape price behavior:
//!
//! - **Gamma flip**: where cumulative net exposure crosses (or comes closest
//!   to) zero. Above and below it dealers hedge in opposite directions.
//! - **Support**: strike with the largest positive net exposure
//! - **Resistance**: strike with the most negative net exposure
//!
//! plus the book total and its split above / below spot.

mod extractor;

pub use extractor::*;

use serde::{Deserialize, Serialize};

/// Market regime implied by the sign of total exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GammaRegime {
    /// Dealers long gamma: hedging dampens moves
    Positive,
    /// Dealers short gamma: hedging amplifies moves
    Negative,
}

impl GammaRegime {
    /// Positive only for a strictly positive total
    pub fn from_total(total_gex: f64) -> Self {
        if total_gex > 0.0 {
            GammaRegime::Positive
        } else {
            GammaRegime::Negative
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GammaRegime::Positive => "Positive Gamma",
            GammaRegime::Negative => "Negative Gamma",
        }
    }
}

/// Summary levels for one exposure curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureLevels {
    /// Strike of minimal |cumulative net exposure|; spot when there are no rows
    pub flip_strike: f64,
    /// Strike of maximum net exposure
    pub support_strike: Option<f64>,
    /// Strike of minimum net exposure
    pub resistance_strike: Option<f64>,
    /// Sum of net exposure over all strikes
    pub total_gex: f64,
    /// Net exposure at strikes strictly above spot
    pub gex_above_spot: f64,
    /// Net exposure at strikes at or below spot
    pub gex_below_spot: f64,
}

impl ExposureLevels {
    pub fn regime(&self) -> GammaRegime {
        GammaRegime::from_total(self.total_gex)
    }

    /// Signed distance of the flip from spot (positive = flip above spot)
    pub fn flip_distance(&self, spot: f64) -> f64 {
        self.flip_strike - spot
    }
}
