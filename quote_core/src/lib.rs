pub mod analyzer;
pub mod common;
pub mod config;
pub mod math;
pub mod source;

pub use analyzer::analyzer::QuoteAnalyzer;
pub use common::quote_exception::{ErrCode, QuoteException, QuoteResult};
pub use config::quote_config::QuoteConfig;
pub use source::price_source::{PriceSource, SimulatedPriceSource};
