//! GEX Analyzer CLI
//!
//! Fetches an index option chain (live NSE data, falling back to sample data),
//! computes per-strike gamma exposure and prints the key levels.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::Level;

use gex_analyzer::config::{AnalyzerConfig, DataSourceKind};
use gex_analyzer::core::{ExpiryKind, GexError, GexResult, IndexSymbol};
use gex_analyzer::data::{ChainRequest, FixedSpot, NseClient, SourceChain, SyntheticChainSource, TtlCache};
use gex_analyzer::exposure::{filter_by_band, gex_profile, spot_grid, SignConvention};
use gex_analyzer::export::{export_delta, export_exposure, export_levels};
use gex_analyzer::report::{format_inr, render_report};
use gex_analyzer::GexAnalyzer;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExpiryArg {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Live,
    Sample,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SignArg {
    DealerShortCalls,
    DealerLongCalls,
}

#[derive(Parser, Debug)]
#[command(name = "gex")]
#[command(about = "Gamma exposure analysis for NSE index options")]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Index: NIFTY or BANKNIFTY
    #[arg(long, short)]
    symbol: Option<IndexSymbol>,

    /// Expiry cycle used when no explicit expiry is given
    #[arg(long, value_enum)]
    expiry_type: Option<ExpiryArg>,

    /// Explicit expiry date (30-JAN-2026 or 2026-01-30)
    #[arg(long, short)]
    expiry: Option<String>,

    /// Data source
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Strike band around spot, in percent
    #[arg(long)]
    band: Option<f64>,

    /// Annual risk-free rate
    #[arg(long)]
    rate: Option<f64>,

    /// Dealer positioning assumption
    #[arg(long, value_enum)]
    sign: Option<SignArg>,

    /// Analyze a sample chain around this spot instead of fetching
    #[arg(long)]
    spot: Option<f64>,

    /// Seed for sample chains
    #[arg(long)]
    seed: Option<u64>,

    /// Write the per-strike gamma table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the per-strike delta table to this CSV file
    #[arg(long)]
    delta_csv: Option<PathBuf>,

    /// Write the key levels to this CSV file
    #[arg(long)]
    levels_csv: Option<PathBuf>,

    /// Print net GEX across a ±range of hypothetical spots
    #[arg(long)]
    profile: Option<f64>,

    /// Print the analysis as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Print the default configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut AnalyzerConfig) {
        if let Some(symbol) = self.symbol {
            config.symbol = symbol;
        }
        if let Some(kind) = self.expiry_type {
            config.expiry_kind = match kind {
                ExpiryArg::Weekly => ExpiryKind::Weekly,
                ExpiryArg::Monthly => ExpiryKind::Monthly,
            };
        }
        if let Some(expiry) = &self.expiry {
            config.expiry = Some(expiry.clone());
        }
        if let Some(source) = self.source {
            config.source = match source {
                SourceArg::Live => DataSourceKind::Live,
                SourceArg::Sample => DataSourceKind::Sample,
            };
        }
        if let Some(band) = self.band {
            config.band_percent = band;
        }
        if let Some(rate) = self.rate {
            config.risk_free_rate = rate;
        }
        if let Some(sign) = self.sign {
            config.exposure.sign_convention = match sign {
                SignArg::DealerShortCalls => SignConvention::DealerShortCalls,
                SignArg::DealerLongCalls => SignConvention::DealerLongCalls,
            };
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn build_sources(args: &Args, config: &AnalyzerConfig) -> GexResult<SourceChain> {
    if let Some(spot) = args.spot {
        let mut sample = SyntheticChainSource::new("sample (given spot)", FixedSpot(spot));
        if let Some(seed) = config.seed {
            sample = sample.with_seed(seed);
        }
        return Ok(SourceChain::new().with_source(sample));
    }

    let client = Arc::new(NseClient::with_cache(
        config.cache.clone(),
        Arc::new(TtlCache::new()),
        Arc::new(TtlCache::new()),
    )?);

    Ok(match config.source {
        DataSourceKind::Live => {
            match client.get_market_status() {
                Ok(status) if status.is_open() => tracing::info!("NSE capital market is open"),
                Ok(status) => tracing::info!("NSE capital market: {}", status.market_state),
                Err(e) => tracing::warn!("Could not fetch market status: {}", e),
            }
            SourceChain::nse_live(client, config.seed)
        }
        DataSourceKind::Sample => SourceChain::nse_sample(client, config.seed),
    })
}

fn run(args: &Args) -> GexResult<()> {
    if args.generate_config {
        let template = toml::to_string_pretty(&AnalyzerConfig::default())
            .map_err(|e| GexError::Serialization(e.to_string()))?;
        println!("{}", template);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let today = chrono::Local::now().date_naive();
    let expiry = config.resolve_expiry(today)?;
    tracing::info!("Analyzing {} expiry {}", config.symbol, expiry);

    let sources = build_sources(args, &config)?;
    let request = ChainRequest {
        symbol: config.symbol,
        expiry,
    };
    let snapshot = sources.fetch(&request)?;

    let analysis_config = config.analysis_config();
    let analyzer = GexAnalyzer::new(analysis_config.clone());
    let analysis = analyzer.analyze(&snapshot.chain, today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("Source: {}\n", snapshot.source);
        print!("{}", render_report(&analysis, config.symbol, expiry));
    }

    if let Some(range) = args.profile {
        let step = config.symbol.strike_interval();
        let spots = spot_grid(analysis.spot, range, step);
        let filtered = filter_by_band(&snapshot.chain, analysis.spot, analysis_config.band_percent);
        let profile = gex_profile(
            &filtered,
            &spots,
            analysis.time_to_expiry,
            analysis_config.risk_free_rate,
            &analysis_config.exposure,
        );
        println!("\nNet GEX vs spot:");
        for (spot, net) in profile {
            println!("  {:>10.0} {:>14}", spot, format_inr(net));
        }
    }

    if let Some(path) = &args.csv {
        export_exposure(path, &analysis.rows)?;
    }
    if let Some(path) = &args.delta_csv {
        export_delta(path, &analysis.delta_rows)?;
    }
    if let Some(path) = &args.levels_csv {
        export_levels(path, &analysis.levels)?;
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
