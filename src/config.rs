//! Analyzer configuration
//!
//! Loaded from TOML; every field has a default so a partial file (or none at
//! all) is valid:
//!
//! ```toml
//! symbol = "BANKNIFTY"
//! expiry_kind = "monthly"
//! band_percent = 8.0
//!
//! [exposure]
//! sign_convention = "dealer_long_calls"
//!
//! [cache]
//! ttl_secs = 30
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalysisConfig, DEFAULT_BAND_PERCENT};
use crate::core::{parse_expiry, ExpiryKind, GexError, GexResult, IndexSymbol};
use crate::data::CacheConfig;
use crate::exposure::{ExposureConfig, DEFAULT_RISK_FREE_RATE};

/// Where chains come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// Live NSE chain, falling back to sample data
    #[default]
    Live,
    /// Sample data only
    Sample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub symbol: IndexSymbol,
    pub expiry_kind: ExpiryKind,
    /// Explicit expiry (`30-JAN-2026` or `2026-01-30`); overrides `expiry_kind`
    pub expiry: Option<String>,
    pub source: DataSourceKind,
    /// Seed for sample chains
    pub seed: Option<u64>,
    pub band_percent: f64,
    pub risk_free_rate: f64,
    pub exposure: ExposureConfig,
    pub cache: CacheConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            symbol: IndexSymbol::Nifty,
            expiry_kind: ExpiryKind::Weekly,
            expiry: None,
            source: DataSourceKind::Live,
            seed: None,
            band_percent: DEFAULT_BAND_PERCENT,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            exposure: ExposureConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GexResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GexError::config(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> GexResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| GexError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GexResult<()> {
        if !self.band_percent.is_finite() {
            return Err(GexError::config("band_percent must be finite"));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(GexError::config("risk_free_rate must be finite"));
        }
        let vol = self.exposure.default_volatility;
        if vol.is_nan() || vol <= 0.0 {
            return Err(GexError::config("exposure.default_volatility must be positive"));
        }
        if let Some(expiry) = &self.expiry {
            parse_expiry(expiry)?;
        }
        Ok(())
    }

    /// Expiry to analyze as seen on `today`
    pub fn resolve_expiry(&self, today: NaiveDate) -> GexResult<NaiveDate> {
        match &self.expiry {
            Some(s) => parse_expiry(s),
            None => Ok(self.expiry_kind.next_after(today)),
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            band_percent: self.band_percent,
            risk_free_rate: self.risk_free_rate,
            exposure: self.exposure.clone(),
        }
    }
}
