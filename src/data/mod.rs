//! Data fetching
//!
//! Handles:
//! - NSE India API for index option chains and quotes
//! - Synthetic chains when live data is unavailable
//! - Ordered fallback between sources
//! - In-memory response caching

pub mod nse;
pub mod sample;
pub mod source;
pub mod cache;

pub use nse::*;
pub use sample::*;
pub use source::*;
pub use cache::*;
