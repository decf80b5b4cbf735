//! Option quote data
//!
//! A `Chain` is one point-in-time snapshot: the quotes for a single
//! underlying and expiry plus the spot price observed alongside them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// One exchange-quoted contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price
    pub strike: f64,
    /// Call or put
    pub side: OptionType,
    /// Outstanding contracts
    pub open_interest: u64,
    /// Annualized implied volatility in percent (0 = missing)
    pub implied_volatility: f64,
    /// Last traded price
    pub last_price: f64,
    /// Change in open interest since the previous session
    #[serde(default)]
    pub oi_change: i64,
    /// Traded volume
    #[serde(default)]
    pub volume: u64,
    /// Vendor-supplied gamma, when the feed provides one
    #[serde(default)]
    pub native_gamma: Option<f64>,
}

impl OptionQuote {
    pub fn new(strike: f64, side: OptionType, open_interest: u64, implied_volatility: f64) -> Self {
        Self {
            strike,
            side,
            open_interest,
            implied_volatility,
            last_price: 0.0,
            oi_change: 0,
            volume: 0,
            native_gamma: None,
        }
    }

    pub fn call(strike: f64, open_interest: u64, implied_volatility: f64) -> Self {
        Self::new(strike, OptionType::Call, open_interest, implied_volatility)
    }

    pub fn put(strike: f64, open_interest: u64, implied_volatility: f64) -> Self {
        Self::new(strike, OptionType::Put, open_interest, implied_volatility)
    }

    pub fn with_last_price(mut self, last_price: f64) -> Self {
        self.last_price = last_price;
        self
    }

    pub fn with_native_gamma(mut self, gamma: f64) -> Self {
        self.native_gamma = Some(gamma);
        self
    }

    /// Does this quote carry a usable implied volatility?
    pub fn has_iv(&self) -> bool {
        self.implied_volatility > 0.0
    }
}

/// Quotes for a single underlying and expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    /// Underlying symbol (e.g. "NIFTY")
    pub underlying: String,
    /// Expiry shared by every quote in the chain
    pub expiry: NaiveDate,
    /// Spot price observed with the quotes
    pub spot: f64,
    /// Quotes in feed order
    pub quotes: Vec<OptionQuote>,
    /// Fetch timestamp
    pub timestamp: DateTime<Utc>,
}

impl Chain {
    pub fn new(underlying: impl Into<String>, expiry: NaiveDate, spot: f64) -> Self {
        Self {
            underlying: underlying.into(),
            expiry,
            spot,
            quotes: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_quotes(mut self, quotes: Vec<OptionQuote>) -> Self {
        self.quotes = quotes;
        self
    }

    pub fn push(&mut self, quote: OptionQuote) {
        self.quotes.push(quote);
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Distinct strikes, ascending
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.quotes.iter().map(|q| q.strike).collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();
        strikes
    }

    pub fn calls(&self) -> impl Iterator<Item = &OptionQuote> {
        self.quotes.iter().filter(|q| q.side == OptionType::Call)
    }

    pub fn puts(&self) -> impl Iterator<Item = &OptionQuote> {
        self.quotes.iter().filter(|q| q.side == OptionType::Put)
    }

    /// Strike closest to spot
    pub fn atm_strike(&self) -> Option<f64> {
        self.strikes()
            .into_iter()
            .min_by(|a, b| (self.spot - a).abs().total_cmp(&(self.spot - b).abs()))
    }

    /// Total open interest on one side
    pub fn total_open_interest(&self, side: OptionType) -> u64 {
        self.quotes
            .iter()
            .filter(|q| q.side == side)
            .map(|q| q.open_interest)
            .sum()
    }
}
