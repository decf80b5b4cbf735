//! GexAnalyzer - facade over the exposure pipeline
//!
//! band filter → time to expiry → gamma and delta aggregation → levels and
//! summaries, in one call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::Chain;
use crate::exposure::{
    aggregate_at, aggregate_delta_at, filter_by_band, summarize_exposure, summarize_open_interest, time_to_expiry,
    DeltaExposureRow, ExposureConfig, ExposureRow, ExposureSummary, OpenInterestSummary, DEFAULT_RISK_FREE_RATE,
};
use crate::levels::{extract_levels, ExposureLevels};

/// Default strike band around spot, in percent
pub const DEFAULT_BAND_PERCENT: f64 = 10.0;

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Keep strikes within ±band% of spot (≤ 0 keeps everything)
    pub band_percent: f64,
    /// Annualized risk-free rate
    pub risk_free_rate: f64,
    pub exposure: ExposureConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            band_percent: DEFAULT_BAND_PERCENT,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            exposure: ExposureConfig::default(),
        }
    }
}

/// Everything derived from one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub spot: f64,
    /// Years, already floored
    pub time_to_expiry: f64,
    pub rows: Vec<ExposureRow>,
    pub delta_rows: Vec<DeltaExposureRow>,
    pub levels: ExposureLevels,
    pub exposure_summary: ExposureSummary,
    pub oi_summary: OpenInterestSummary,
}

impl Analysis {
    /// Row with the largest |net exposure|
    pub fn peak_row(&self) -> Option<&ExposureRow> {
        self.rows
            .iter()
            .max_by(|a, b| a.net_exposure.abs().total_cmp(&b.net_exposure.abs()))
    }
}

pub struct GexAnalyzer {
    config: AnalysisConfig,
}

impl GexAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the pipeline on `chain` as seen on `as_of`
    ///
    /// Filtering and exposure both use the chain's own spot.
    pub fn analyze(&self, chain: &Chain, as_of: NaiveDate) -> Analysis {
        let spot = chain.spot;
        let filtered = filter_by_band(chain, spot, self.config.band_percent);
        let time = time_to_expiry(chain.expiry, as_of);

        tracing::debug!(
            "Analyzing {}: {} of {} quotes within ±{}% of {:.2}, T = {:.4}y",
            chain.underlying,
            filtered.len(),
            chain.len(),
            self.config.band_percent,
            spot,
            time
        );

        let rate = self.config.risk_free_rate;
        let rows = aggregate_at(&filtered, spot, time, rate, &self.config.exposure);
        let delta_rows = aggregate_delta_at(&filtered, spot, time, rate, &self.config.exposure);
        let levels = extract_levels(&rows, spot);
        let exposure_summary = summarize_exposure(&rows);
        let oi_summary = summarize_open_interest(&filtered);

        tracing::debug!(
            "{} strikes, flip {:.0}, total GEX {:.3e}",
            rows.len(),
            levels.flip_strike,
            levels.total_gex
        );

        Analysis {
            spot,
            time_to_expiry: time,
            rows,
            delta_rows,
            levels,
            exposure_summary,
            oi_summary,
        }
    }
}

impl Default for GexAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
