//! Example: Key gamma levels from a synthetic NIFTY chain
//!
//! Run with: cargo run --example sample_levels

use gex_analyzer::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() {
    let today = chrono::Local::now().date_naive();
    let expiry = next_weekly_expiry(today);
    let spot = 23512.0;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let chain = generate_sample_chain(IndexSymbol::Nifty, spot, expiry, &mut rng);
    println!("Generated {} quotes over {} strikes\n", chain.len(), chain.strikes().len());

    for convention in [SignConvention::DealerShortCalls, SignConvention::DealerLongCalls] {
        let config = AnalysisConfig {
            band_percent: 5.0,
            exposure: ExposureConfig {
                sign_convention: convention,
                ..Default::default()
            },
            ..Default::default()
        };
        let analysis = GexAnalyzer::new(config).analyze(&chain, today);

        println!("--- {:?} ---", convention);
        print!("{}", render_report(&analysis, IndexSymbol::Nifty, expiry));
        println!();
    }
}
