//! Chain acquisition strategies
//!
//! A `SourceChain` tries each `ChainSource` in order and returns the first
//! snapshot that comes back. The default NSE order is:
//!
//! 1. live option chain
//! 2. synthetic chain around the live spot
//! 3. synthetic chain around the symbol's fallback spot

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::{Chain, GexError, GexResult, IndexSymbol};

use super::nse::NseClient;
use super::sample::generate_sample_chain;

/// What to fetch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainRequest {
    pub symbol: IndexSymbol,
    pub expiry: NaiveDate,
}

/// A chain together with the name of the source that produced it
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub chain: Chain,
    pub source: String,
}

impl Snapshot {
    pub fn spot(&self) -> f64 {
        self.chain.spot
    }
}

/// One way of obtaining a chain
pub trait ChainSource: Send + Sync {
    fn name(&self) -> &str;
    fn fetch(&self, request: &ChainRequest) -> GexResult<Chain>;
}

/// One way of obtaining a spot price
pub trait SpotSource: Send + Sync {
    fn spot(&self, symbol: IndexSymbol) -> GexResult<f64>;
}

impl SpotSource for NseClient {
    fn spot(&self, symbol: IndexSymbol) -> GexResult<f64> {
        self.get_spot(symbol)
    }
}

impl<S: SpotSource + ?Sized> SpotSource for Arc<S> {
    fn spot(&self, symbol: IndexSymbol) -> GexResult<f64> {
        (**self).spot(symbol)
    }
}

/// Spot fixed at the symbol's hard-coded fallback
pub struct FallbackSpot;

impl SpotSource for FallbackSpot {
    fn spot(&self, symbol: IndexSymbol) -> GexResult<f64> {
        Ok(symbol.fallback_spot())
    }
}

/// Spot fixed at a caller-supplied value
pub struct FixedSpot(pub f64);

impl SpotSource for FixedSpot {
    fn spot(&self, _symbol: IndexSymbol) -> GexResult<f64> {
        if self.0 > 0.0 {
            Ok(self.0)
        } else {
            Err(GexError::invalid_input(format!("spot must be positive, got {}", self.0)))
        }
    }
}

/// Live NSE option chain
pub struct LiveChainSource {
    client: Arc<NseClient>,
}

impl LiveChainSource {
    pub fn new(client: Arc<NseClient>) -> Self {
        Self { client }
    }
}

impl ChainSource for LiveChainSource {
    fn name(&self) -> &str {
        "live"
    }

    fn fetch(&self, request: &ChainRequest) -> GexResult<Chain> {
        self.client.get_option_chain(request.symbol, request.expiry)
    }
}

/// Synthetic chain around a spot from any `SpotSource`
pub struct SyntheticChainSource<S> {
    name: String,
    spot_source: S,
    rng: Mutex<ChaCha8Rng>,
}

impl<S: SpotSource> SyntheticChainSource<S> {
    pub fn new(name: impl Into<String>, spot_source: S) -> Self {
        Self {
            name: name.into(),
            spot_source,
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Reproducible chains for a given seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(ChaCha8Rng::seed_from_u64(seed));
        self
    }
}

impl<S: SpotSource> ChainSource for SyntheticChainSource<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, request: &ChainRequest) -> GexResult<Chain> {
        let spot = self.spot_source.spot(request.symbol)?;
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Ok(generate_sample_chain(request.symbol, spot, request.expiry, &mut *rng))
    }
}

/// Ordered list of sources; first success wins
pub struct SourceChain {
    sources: Vec<Box<dyn ChainSource>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    pub fn with_source(mut self, source: impl ChainSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn ChainSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Live chain, then sample around live spot, then sample around fallback spot
    pub fn nse_live(client: Arc<NseClient>, seed: Option<u64>) -> Self {
        let sample_live = SyntheticChainSource::new("sample (live spot)", client.clone());
        let sample_fallback = SyntheticChainSource::new("sample (fallback spot)", FallbackSpot);
        let (sample_live, sample_fallback) = match seed {
            Some(seed) => (sample_live.with_seed(seed), sample_fallback.with_seed(seed)),
            None => (sample_live, sample_fallback),
        };

        Self::new()
            .with_source(LiveChainSource::new(client))
            .with_source(sample_live)
            .with_source(sample_fallback)
    }

    /// Sample data only: live spot first, then fallback spot
    pub fn nse_sample(client: Arc<NseClient>, seed: Option<u64>) -> Self {
        let mut chain = Self::nse_live(client, seed);
        chain.sources.remove(0);
        chain
    }

    /// Try each source in order
    pub fn fetch(&self, request: &ChainRequest) -> GexResult<Snapshot> {
        let mut failures = Vec::new();

        for source in &self.sources {
            match source.fetch(request) {
                Ok(chain) => {
                    tracing::info!(
                        "Loaded {} chain from {} source (spot {:.2})",
                        request.symbol,
                        source.name(),
                        chain.spot
                    );
                    return Ok(Snapshot {
                        chain,
                        source: source.name().to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("{} source failed for {}: {}", source.name(), request.symbol, e);
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        Err(GexError::data(format!(
            "all sources failed for {} ({})",
            request.symbol,
            failures.join("; ")
        )))
    }
}

impl Default for SourceChain {
    fn default() -> Self {
        Self::new()
    }
}
