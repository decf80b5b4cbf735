//! Core data types for GEX Analyzer
//!
//! Defines fundamental types:
//! - OptionType: call / put side
//! - OptionQuote, Chain: one point-in-time option chain snapshot
//! - IndexSymbol: supported underlyings
//! - Expiry calendar helpers

pub mod option;
pub mod quote;
pub mod symbol;
pub mod expiry;
pub mod error;

pub use option::*;
pub use quote::*;
pub use symbol::*;
pub use expiry::*;
pub use error::*;
