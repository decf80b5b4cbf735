//! NSE India data fetcher
//!
//! Fetches index option chains, index quotes and market status from NSE's
//! public JSON endpoints. The endpoints refuse requests without the session
//! cookies the home page sets, so the client visits it once before the
//! first API call.
//!
//! Note: This is for educational/research purposes. NSE data is subject to
//! the exchange's terms of use.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{parse_expiry, Chain, GexError, GexResult, IndexSymbol, OptionQuote, OptionType};

use super::cache::{CacheConfig, TtlCache};

const HOME_URL: &str = "https://www.nseindia.com";
const API_URL: &str = "https://www.nseindia.com/api";

/// NSE API client
pub struct NseClient {
    client: reqwest::blocking::Client,
    home_url: String,
    base_url: String,
    session_ready: AtomicBool,
    cache_config: CacheConfig,
    chain_cache: Arc<TtlCache<String, NseOptionChainResponse>>,
    indices_cache: Arc<TtlCache<String, Vec<IndexQuote>>>,
}

impl NseClient {
    pub fn new() -> GexResult<Self> {
        Self::with_cache(CacheConfig::default(), Arc::new(TtlCache::new()), Arc::new(TtlCache::new()))
    }

    /// Build a client that memoizes responses in the given caches
    pub fn with_cache(
        cache_config: CacheConfig,
        chain_cache: Arc<TtlCache<String, NseOptionChainResponse>>,
        indices_cache: Arc<TtlCache<String, Vec<IndexQuote>>>,
    ) -> GexResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .cookie_store(true)
            .timeout(StdDuration::from_secs(10))
            .build()
            .map_err(|e| GexError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            home_url: HOME_URL.to_string(),
            base_url: API_URL.to_string(),
            session_ready: AtomicBool::new(false),
            cache_config,
            chain_cache,
            indices_cache,
        })
    }

    fn ensure_session(&self) {
        if self.session_ready.load(Ordering::Relaxed) {
            return;
        }
        match self.client.get(&self.home_url).send() {
            Ok(_) => self.session_ready.store(true, Ordering::Relaxed),
            // The API call that follows reports the real failure
            Err(e) => tracing::warn!("NSE session warm-up failed: {}", e),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> GexResult<T> {
        self.ensure_session();

        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        self.client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| GexError::Network(e.to_string()))?
            .json()
            .map_err(|e| GexError::Data(format!("Failed to parse {}: {}", path, e)))
    }

    /// Raw option-chain payload for an index, all expiries
    pub fn get_option_chain_raw(&self, symbol: IndexSymbol) -> GexResult<NseOptionChainResponse> {
        let key = symbol.ticker().to_string();
        let fetch = || -> GexResult<NseOptionChainResponse> {
            self.get_json(&format!("option-chain-indices?symbol={}", symbol.ticker()))
        };

        if self.cache_config.enabled {
            self.chain_cache.get_or_compute(key, self.cache_config.ttl(), fetch)
        } else {
            fetch()
        }
    }

    /// Option chain for one expiry
    pub fn get_option_chain(&self, symbol: IndexSymbol, expiry: NaiveDate) -> GexResult<Chain> {
        let response = self.get_option_chain_raw(symbol)?;
        let chain = response.to_chain(symbol, expiry)?;

        tracing::info!(
            "Fetched {} {} chain: {} quotes, spot {:.2}",
            symbol,
            expiry,
            chain.len(),
            chain.spot
        );
        Ok(chain)
    }

    /// Quotes for every index NSE publishes
    pub fn get_all_indices(&self) -> GexResult<Vec<IndexQuote>> {
        let fetch = || -> GexResult<Vec<IndexQuote>> {
            let response: NseAllIndicesResponse = self.get_json("allIndices")?;
            Ok(response.data.into_iter().map(IndexQuote::from_nse).collect())
        };

        if self.cache_config.enabled {
            self.indices_cache
                .get_or_compute("allIndices".to_string(), self.cache_config.ttl(), fetch)
        } else {
            fetch()
        }
    }

    /// Detailed quote for one index
    pub fn get_index_quote(&self, symbol: IndexSymbol) -> GexResult<IndexQuote> {
        self.get_all_indices()?
            .into_iter()
            .find(|q| q.index == symbol.index_name())
            .ok_or_else(|| GexError::data(format!("{} not in index feed", symbol.index_name())))
    }

    /// Last traded value of an index
    pub fn get_spot(&self, symbol: IndexSymbol) -> GexResult<f64> {
        let quote = self.get_index_quote(symbol)?;
        if quote.last > 0.0 {
            Ok(quote.last)
        } else {
            Err(GexError::data(format!("non-positive spot for {}", symbol)))
        }
    }

    /// Capital-market session status
    pub fn get_market_status(&self) -> GexResult<MarketStatus> {
        let response: NseMarketStatusResponse = self.get_json("marketStatus")?;
        let state = response
            .market_state
            .into_iter()
            .find(|m| m.market == "Capital Market")
            .map(|m| m.market_status)
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(MarketStatus {
            market_state: state,
            timestamp: Utc::now(),
        })
    }
}

/// Index quote from the all-indices feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexQuote {
    pub index: String,
    pub last: f64,
    /// Percent change on the day
    pub change: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
}

impl IndexQuote {
    fn from_nse(d: NseIndexData) -> Self {
        Self {
            index: d.index,
            last: d.last.unwrap_or(0.0),
            change: d.percent_change.unwrap_or(0.0),
            open: d.open.unwrap_or(0.0),
            high: d.high.unwrap_or(0.0),
            low: d.low.unwrap_or(0.0),
            previous_close: d.previous_close.unwrap_or(0.0),
        }
    }
}

/// Exchange session status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketStatus {
    pub market_state: String,
    pub timestamp: DateTime<Utc>,
}

impl MarketStatus {
    pub fn is_open(&self) -> bool {
        self.market_state.eq_ignore_ascii_case("open")
    }
}

// NSE API response structures

#[derive(Debug, Clone, Deserialize)]
pub struct NseOptionChainResponse {
    records: NseRecords,
}

#[derive(Debug, Clone, Deserialize)]
struct NseRecords {
    #[serde(rename = "underlyingValue")]
    underlying_value: Option<f64>,
    #[serde(rename = "expiryDates", default)]
    expiry_dates: Vec<String>,
    #[serde(default)]
    data: Vec<NseStrikeData>,
}

#[derive(Debug, Clone, Deserialize)]
struct NseStrikeData {
    #[serde(rename = "strikePrice")]
    strike_price: f64,
    #[serde(rename = "expiryDate")]
    expiry_date: String,
    #[serde(rename = "CE")]
    call: Option<NseOptionDetail>,
    #[serde(rename = "PE")]
    put: Option<NseOptionDetail>,
}

#[derive(Debug, Clone, Deserialize)]
struct NseOptionDetail {
    #[serde(rename = "openInterest")]
    open_interest: Option<f64>,
    #[serde(rename = "changeinOpenInterest")]
    change_in_oi: Option<f64>,
    #[serde(rename = "totalTradedVolume")]
    volume: Option<f64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
}

impl NseOptionDetail {
    fn to_quote(&self, strike: f64, side: OptionType) -> OptionQuote {
        let non_negative = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0).unwrap_or(0.0);

        let mut quote = OptionQuote::new(
            strike,
            side,
            non_negative(self.open_interest) as u64,
            non_negative(self.implied_volatility),
        );
        quote.last_price = non_negative(self.last_price);
        quote.volume = non_negative(self.volume) as u64;
        quote.oi_change = self.change_in_oi.filter(|x| x.is_finite()).unwrap_or(0.0) as i64;
        quote
    }
}

impl NseOptionChainResponse {
    /// Listed expiries, in feed order
    pub fn expiries(&self) -> Vec<NaiveDate> {
        self.records
            .expiry_dates
            .iter()
            .filter_map(|s| parse_expiry(s).ok())
            .collect()
    }

    /// Build the chain for one expiry
    pub fn to_chain(&self, symbol: IndexSymbol, expiry: NaiveDate) -> GexResult<Chain> {
        let spot = self
            .records
            .underlying_value
            .filter(|s| *s > 0.0)
            .ok_or_else(|| GexError::data("option chain has no underlying value"))?;

        let mut chain = Chain::new(symbol.ticker(), expiry, spot);
        for row in &self.records.data {
            if parse_expiry(&row.expiry_date).ok() != Some(expiry) {
                continue;
            }
            if let Some(ce) = &row.call {
                chain.push(ce.to_quote(row.strike_price, OptionType::Call));
            }
            if let Some(pe) = &row.put {
                chain.push(pe.to_quote(row.strike_price, OptionType::Put));
            }
        }

        if chain.is_empty() {
            return Err(GexError::data(format!("no {} quotes for expiry {}", symbol, expiry)));
        }
        Ok(chain)
    }
}

#[derive(Debug, Deserialize)]
struct NseAllIndicesResponse {
    data: Vec<NseIndexData>,
}

#[derive(Debug, Deserialize)]
struct NseIndexData {
    index: String,
    last: Option<f64>,
    #[serde(rename = "percentChange")]
    percent_change: Option<f64>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NseMarketStatusResponse {
    #[serde(rename = "marketState", default)]
    market_state: Vec<NseMarketState>,
}

#[derive(Debug, Deserialize)]
struct NseMarketState {
    market: String,
    #[serde(rename = "marketStatus")]
    market_status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN_JSON: &str = r#"{
        "records": {
            "timestamp": "16-Jan-2026 15:30:00",
            "underlyingValue": 23512.35,
            "expiryDates": ["22-Jan-2026", "29-Jan-2026"],
            "data": [
                {"strikePrice": 23500, "expiryDate": "22-Jan-2026",
                 "CE": {"openInterest": 120000, "changeinOpenInterest": -500, "totalTradedVolume": 9000,
                        "impliedVolatility": 13.2, "lastPrice": 110.5},
                 "PE": {"openInterest": 95000, "changeinOpenInterest": 1200, "totalTradedVolume": 7000,
                        "impliedVolatility": 0, "lastPrice": 98.0}},
                {"strikePrice": 23550, "expiryDate": "22-Jan-2026",
                 "CE": {"openInterest": 80000, "impliedVolatility": 12.9, "lastPrice": 80.0}},
                {"strikePrice": 23500, "expiryDate": "29-Jan-2026",
                 "CE": {"openInterest": 5000, "impliedVolatility": 14.0, "lastPrice": 190.0}}
            ]
        }
    }"#;

    #[test]
    fn test_parse_option_chain() {
        let response: NseOptionChainResponse = serde_json::from_str(CHAIN_JSON).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 1, 22).unwrap();

        assert_eq!(response.expiries().len(), 2);

        let chain = response.to_chain(IndexSymbol::Nifty, expiry).unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.spot, 23512.35);
        assert_eq!(chain.underlying, "NIFTY");

        let pe = &chain.quotes[1];
        assert_eq!(pe.side, OptionType::Put);
        assert_eq!(pe.open_interest, 95000);
        assert_eq!(pe.oi_change, 1200);
        assert!(!pe.has_iv());
    }

    #[test]
    fn test_missing_expiry_is_an_error() {
        let response: NseOptionChainResponse = serde_json::from_str(CHAIN_JSON).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2026, 2, 26).unwrap();
        assert!(response.to_chain(IndexSymbol::Nifty, expiry).is_err());
    }

    #[test]
    fn test_parse_index_quote() {
        let json = r#"{"data": [
            {"index": "NIFTY 50", "last": 23512.35, "percentChange": 0.42, "open": 23400,
             "high": 23550, "low": 23380, "previousClose": 23414.0},
            {"index": "NIFTY BANK", "last": 48210.1}
        ]}"#;
        let response: NseAllIndicesResponse = serde_json::from_str(json).unwrap();
        let quotes: Vec<IndexQuote> = response.data.into_iter().map(IndexQuote::from_nse).collect();

        assert_eq!(quotes[0].index, "NIFTY 50");
        assert_eq!(quotes[0].change, 0.42);
        assert_eq!(quotes[1].previous_close, 0.0);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_spot() {
        let client = NseClient::new().unwrap();
        let spot = client.get_spot(IndexSymbol::Nifty).unwrap();

        assert!(spot > 0.0);
        println!("NIFTY spot: {}", spot);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_option_chain() {
        let client = NseClient::new().unwrap();
        let raw = client.get_option_chain_raw(IndexSymbol::Nifty).unwrap();

        if let Some(&expiry) = raw.expiries().first() {
            let chain = raw.to_chain(IndexSymbol::Nifty, expiry).unwrap();
            println!("Chain for {}: {} quotes", expiry, chain.len());
            assert!(!chain.is_empty());
        }
    }
}
