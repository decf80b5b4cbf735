//! # GEX Analyzer - Dealer Gamma Exposure for NSE Index Options
//!
//! Estimates how much dealers must hedge per unit move of the underlying,
//! strike by strike, and reads key levels off the resulting curve.
//!
//! ## Overview
//!
//! For each strike the engine prices Black-Scholes gamma per side, scales it
//! by open interest and notional (`Γ · OI · S² · 0.01`), and signs it by the
//! assumed dealer positioning. From the curve it extracts:
//!
//! - **Gamma flip**: strike where cumulative net exposure comes closest to zero
//! - **Support / resistance**: strikes of maximum / minimum net exposure
//! - **Regime**: positive (dampening) or negative (amplifying) total exposure
//!
//! ## Key Components
//!
//! - **Pricing kernel**: Black-Scholes gamma and delta with degenerate-input guards
//! - **Exposure**: band filter, time to expiry, per-strike aggregation, summaries
//! - **Levels**: flip, support, resistance, above / below spot split
//! - **Data**: NSE option chains and quotes, synthetic chains, ordered fallback
//!   between sources, TTL caching
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gex_analyzer::prelude::*;
//! use rand::SeedableRng;
//!
//! let today = chrono::Local::now().date_naive();
//! let expiry = next_weekly_expiry(today);
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let chain = generate_sample_chain(IndexSymbol::Nifty, 23500.0, expiry, &mut rng);
//!
//! let analysis = GexAnalyzer::default().analyze(&chain, today);
//! println!("flip at {:.0}", analysis.levels.flip_strike);
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Track historical exposure or persist results
//! - Model dealer positioning beyond a fixed sign convention
//! - Generate trading signals

pub mod analyzer;
pub mod config;
pub mod core;
pub mod data;
pub mod export;
pub mod exposure;
pub mod levels;
pub mod models;
pub mod report;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        atm_strike, format_expiry, next_monthly_expiry, next_weekly_expiry, parse_expiry, Chain, ExpiryKind,
        GexError, GexResult, IndexSymbol, OptionQuote, OptionType,
    };

    // Pricing
    pub use crate::models::{delta as bs_delta, gamma as bs_gamma, norm_cdf, norm_pdf};

    // Exposure
    pub use crate::exposure::{
        aggregate, aggregate_at, aggregate_delta_at, filter_by_band, gex_profile, spot_grid, time_to_expiry,
        DeltaExposureRow, ExposureConfig, ExposureRow, ExposureSummary, OpenInterestSummary, SignConvention,
    };

    // Levels
    pub use crate::levels::{extract_levels, find_flip_strike, ExposureLevels, GammaRegime};

    // Facade
    pub use crate::analyzer::{Analysis, AnalysisConfig, GexAnalyzer};
    pub use crate::config::{AnalyzerConfig, DataSourceKind};

    // Data fetching
    pub use crate::data::{
        generate_sample_chain, CacheConfig, ChainRequest, ChainSource, NseClient, Snapshot, SourceChain, TtlCache,
    };

    // Output
    pub use crate::export::{export_delta, export_exposure, export_levels};
    pub use crate::report::{format_inr, render_report};
}

// Re-export main types at crate root
pub use crate::analyzer::{Analysis, GexAnalyzer};
pub use crate::core::{GexError, GexResult};
