//! Supported NSE index underlyings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::GexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexSymbol {
    Nifty,
    BankNifty,
}

impl IndexSymbol {
    /// Symbol used by the option-chain endpoint
    pub fn ticker(&self) -> &'static str {
        match self {
            IndexSymbol::Nifty => "NIFTY",
            IndexSymbol::BankNifty => "BANKNIFTY",
        }
    }

    /// Name of the index in NSE's all-indices feed
    pub fn index_name(&self) -> &'static str {
        match self {
            IndexSymbol::Nifty => "NIFTY 50",
            IndexSymbol::BankNifty => "NIFTY BANK",
        }
    }

    /// Listed strike spacing
    pub fn strike_interval(&self) -> f64 {
        match self {
            IndexSymbol::Nifty => 50.0,
            IndexSymbol::BankNifty => 100.0,
        }
    }

    /// Spot used when no live quote can be obtained
    pub fn fallback_spot(&self) -> f64 {
        match self {
            IndexSymbol::Nifty => 23500.0,
            IndexSymbol::BankNifty => 48000.0,
        }
    }
}

impl fmt::Display for IndexSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for IndexSymbol {
    type Err = GexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(' ', "").as_str() {
            "NIFTY" | "NIFTY50" => Ok(IndexSymbol::Nifty),
            "BANKNIFTY" | "NIFTYBANK" => Ok(IndexSymbol::BankNifty),
            other => Err(GexError::invalid_input(format!("unsupported index: {}", other))),
        }
    }
}
