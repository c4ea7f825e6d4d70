use tracing::{debug, info, warn};

use crate::common::cache::{Cache, CacheMetrics, LruCache, UnboundedCache};
use crate::common::quote_exception::{QuoteException, QuoteResult};
use crate::common::utils::Price;
use crate::config::quote_config::QuoteConfig;
use crate::math::{moving_average::SimpleMA, rsi::RSI};
use crate::source::price_source::{PriceSource, SimulatedPriceSource};

/// Indicator cache key: symbol plus window size or period
pub type IndicatorKey = (String, usize);

/// Price source fronted by a cache that keeps the first quote seen for each symbol
#[derive(Debug)]
struct PriceBook<S> {
    source: S,
    cache: UnboundedCache<String, Price>,
    fetch_count: u64,
}

impl<S: PriceSource> PriceBook<S> {
    fn get_price(&mut self, symbol: &str) -> Price {
        let key = symbol.to_string();
        if let Some(price) = self.cache.get(&key) {
            return price;
        }

        let price = self.source.fetch_price(symbol);
        self.fetch_count += 1;
        self.cache.insert(key, price);
        debug!(symbol = %symbol, price, cached = self.cache.len(), "price cache miss");
        price
    }

    /// One read per simulated day. Every read hits the same cached quote.
    fn sample<'a>(
        &'a mut self,
        symbol: &'a str,
        days: usize,
    ) -> impl Iterator<Item = Price> + 'a {
        (0..days).map(move |_| self.get_price(symbol))
    }
}

/// Owns the price cache and the memoized indicator caches.
///
/// Quotes freeze on first read: once a symbol is cached, every later sample of
/// it (including the per-day samples behind the indicators) returns the same
/// value. A moving average therefore equals the cached price and RSI reads 100.
pub struct QuoteAnalyzer<S = SimulatedPriceSource> {
    prices: PriceBook<S>,
    ma_cache: Box<dyn Cache<IndicatorKey, Price>>,
    rsi_cache: LruCache<IndicatorKey, Price>,
    rsi_period: usize,
}

impl QuoteAnalyzer<SimulatedPriceSource> {
    /// Analyzer backed by the simulated source described by `config`
    pub fn new(config: &QuoteConfig) -> QuoteResult<Self> {
        Self::with_source(SimulatedPriceSource::from_config(config), config)
    }
}

impl<S: PriceSource> QuoteAnalyzer<S> {
    pub fn with_source(source: S, config: &QuoteConfig) -> QuoteResult<Self> {
        config.validate()?;
        let ma_cache: Box<dyn Cache<IndicatorKey, Price>> = config.ma_cache_policy().build();
        let rsi_cache = LruCache::new(config.rsi_cache_capacity);
        info!(
            rsi_period = config.rsi_period,
            rsi_cache_capacity = ?rsi_cache.capacity(),
            ma_cache_capacity = ?ma_cache.capacity(),
            "quote analyzer created"
        );
        Ok(Self {
            prices: PriceBook {
                source,
                cache: UnboundedCache::new(),
                fetch_count: 0,
            },
            ma_cache,
            rsi_cache,
            rsi_period: config.rsi_period,
        })
    }

    /// Cached quote for `symbol`; the source is only asked on the first call.
    pub fn get_price(&mut self, symbol: &str) -> Price {
        self.prices.get_price(symbol)
    }

    /// Mean of `window_size` daily samples, memoized per (symbol, window_size)
    pub fn moving_average(&mut self, symbol: &str, window_size: usize) -> QuoteResult<Price> {
        SimpleMA::check_window(window_size).map_err(reject)?;

        let key = (symbol.to_string(), window_size);
        if let Some(avg) = self.ma_cache.get(&key) {
            debug!(symbol = %symbol, window_size, "moving average cache hit");
            return Ok(avg);
        }

        let avg = SimpleMA::calculate(self.prices.sample(symbol, window_size), window_size)?;
        debug!(symbol = %symbol, window_size, avg, "moving average computed");
        self.ma_cache.insert(key, avg);
        Ok(avg)
    }

    /// RSI over `period` daily samples, memoized in a bounded LRU per (symbol, period)
    pub fn calculate_rsi(&mut self, symbol: &str, period: usize) -> QuoteResult<Price> {
        RSI::check_period(period).map_err(reject)?;

        let key = (symbol.to_string(), period);
        if let Some(rsi) = self.rsi_cache.get(&key) {
            debug!(symbol = %symbol, period, "rsi cache hit");
            return Ok(rsi);
        }

        let rsi = RSI::calculate(self.prices.sample(symbol, period), period)?;
        debug!(symbol = %symbol, period, rsi, "rsi computed");
        self.rsi_cache.insert(key, rsi);
        Ok(rsi)
    }

    /// RSI with the configured default period
    pub fn calculate_rsi_default(&mut self, symbol: &str) -> QuoteResult<Price> {
        self.calculate_rsi(symbol, self.rsi_period)
    }

    pub fn rsi_period(&self) -> usize {
        self.rsi_period
    }

    pub fn is_rsi_cached(&self, symbol: &str, period: usize) -> bool {
        self.rsi_cache.contains(&(symbol.to_string(), period))
    }

    /// Number of times the underlying source was queried
    pub fn fetch_count(&self) -> u64 {
        self.prices.fetch_count
    }

    pub fn price_metrics(&self) -> CacheMetrics {
        self.prices.cache.metrics()
    }

    pub fn ma_metrics(&self) -> CacheMetrics {
        self.ma_cache.metrics()
    }

    pub fn rsi_metrics(&self) -> CacheMetrics {
        self.rsi_cache.metrics()
    }

    pub fn source(&self) -> &S {
        &self.prices.source
    }
}

fn reject(err: QuoteException) -> QuoteException {
    warn!(error = %err, "indicator request rejected");
    err
}
