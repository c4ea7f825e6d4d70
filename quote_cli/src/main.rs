use quote_core::{PriceSource, QuoteAnalyzer, QuoteConfig, QuoteResult};
use std::env;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STOCK_SYMBOL: &str = "Google";
const MA_WINDOW: usize = 10;

fn main() -> Result<(), Box<dyn Error>> {
    // logs go to stderr, stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading config");
            QuoteConfig::from_json_file(&path)?
        }
        None => QuoteConfig::default(),
    };

    let mut analyzer = QuoteAnalyzer::new(&config)?;
    for line in report(&mut analyzer, STOCK_SYMBOL)? {
        println!("{}", line);
    }

    debug!(
        fetches = analyzer.fetch_count(),
        price_hit_rate = analyzer.price_metrics().hit_rate(),
        ma_hit_rate = analyzer.ma_metrics().hit_rate(),
        rsi_hit_rate = analyzer.rsi_metrics().hit_rate(),
        rsi_cache = ?analyzer.rsi_metrics(),
        "run finished"
    );

    Ok(())
}

/// The three report lines: quote, moving average, RSI
fn report<S: PriceSource>(
    analyzer: &mut QuoteAnalyzer<S>,
    symbol: &str,
) -> QuoteResult<[String; 3]> {
    let price = analyzer.get_price(symbol);
    let avg = analyzer.moving_average(symbol, MA_WINDOW)?;
    let rsi = analyzer.calculate_rsi_default(symbol)?;
    Ok([
        format!("Fetching stock price for {}: {:?}", symbol, price),
        format!("{}-day Moving Average for {}: {:?}", MA_WINDOW, symbol, avg),
        format!("RSI for {}: {}", symbol, format_rsi(rsi)),
    ])
}

/// Saturated RSI prints as a whole number, anything else keeps its decimal point
fn format_rsi(rsi: f64) -> String {
    if rsi == 100.0 {
        "100".to_string()
    } else {
        format!("{:?}", rsi)
    }
}
