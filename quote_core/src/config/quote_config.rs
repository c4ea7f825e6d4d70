use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::cache::CachePolicy;
use crate::common::quote_exception::{QuoteException, QuoteResult};

pub const DEFAULT_MIN_PRICE: f64 = 100.0;
pub const DEFAULT_MAX_PRICE: f64 = 500.0;
pub const DEFAULT_LATENCY_MS: u64 = 500;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_RSI_CACHE_CAPACITY: usize = 100;

/// Quote system configuration
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteConfig {
    pub min_price: f64,
    pub max_price: f64,
    pub latency_ms: u64,
    pub seed: Option<u64>,
    pub rsi_period: usize,
    pub rsi_cache_capacity: usize,
    pub ma_cache_capacity: Option<usize>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            latency_ms: DEFAULT_LATENCY_MS,
            seed: None,
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_cache_capacity: DEFAULT_RSI_CACHE_CAPACITY,
            ma_cache_capacity: None,
        }
    }
}

impl QuoteConfig {
    pub fn new(conf: Option<HashMap<String, Value>>) -> QuoteResult<Self> {
        let mut conf = ConfigWithCheck::new(conf.unwrap_or_default());

        let config = Self {
            min_price: conf.get("min_price")?.unwrap_or(DEFAULT_MIN_PRICE),
            max_price: conf.get("max_price")?.unwrap_or(DEFAULT_MAX_PRICE),
            latency_ms: conf.get("latency_ms")?.unwrap_or(DEFAULT_LATENCY_MS),
            seed: conf.get("seed")?,
            rsi_period: conf.get("rsi_period")?.unwrap_or(DEFAULT_RSI_PERIOD),
            rsi_cache_capacity: conf
                .get("rsi_cache_capacity")?
                .unwrap_or(DEFAULT_RSI_CACHE_CAPACITY),
            ma_cache_capacity: conf.get("ma_cache_capacity")?,
        };

        conf.check()?;
        config.validate()?;

        Ok(config)
    }

    /// Load the configuration map from a JSON object file
    pub fn from_json_file(path: impl AsRef<Path>) -> QuoteResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            QuoteException::config_error(format!("cannot read {}: {}", path.display(), e))
        })?;
        let map: HashMap<String, Value> = serde_json::from_str(&text).map_err(|e| {
            QuoteException::config_error(format!("invalid json in {}: {}", path.display(), e))
        })?;
        Self::new(Some(map))
    }

    pub fn validate(&self) -> QuoteResult<()> {
        // sampling divides the span by a factor just below one, so that must stay finite too
        let finite = self.min_price.is_finite()
            && self.max_price.is_finite()
            && ((self.max_price - self.min_price) / (1.0 - f64::EPSILON)).is_finite();
        if !(finite && self.min_price >= 0.0 && self.min_price <= self.max_price) {
            return Err(QuoteException::config_error(format!(
                "price range must be finite with 0 <= min_price <= max_price, got [{}, {}]",
                self.min_price, self.max_price
            )));
        }
        if self.rsi_period < 2 {
            return Err(QuoteException::config_error(format!(
                "rsi_period must be at least 2, got {}",
                self.rsi_period
            )));
        }
        if self.rsi_cache_capacity == 0 {
            return Err(QuoteException::config_error(
                "rsi_cache_capacity must be positive",
            ));
        }
        if self.ma_cache_capacity == Some(0) {
            return Err(QuoteException::config_error(
                "ma_cache_capacity must be positive when set",
            ));
        }
        Ok(())
    }

    pub fn ma_cache_policy(&self) -> CachePolicy {
        CachePolicy::from_capacity(self.ma_cache_capacity)
    }

    pub fn rsi_cache_policy(&self) -> CachePolicy {
        CachePolicy::Lru(self.rsi_cache_capacity)
    }
}

/// Typed reader over a raw configuration map that remembers which keys were consumed
struct ConfigWithCheck {
    conf: HashMap<String, Value>,
    visited: HashSet<String>,
}

impl ConfigWithCheck {
    fn new(conf: HashMap<String, Value>) -> Self {
        Self {
            conf,
            visited: HashSet::new(),
        }
    }

    /// Missing keys and explicit `null` both read as `None`
    fn get<T: DeserializeOwned>(&mut self, key: &str) -> QuoteResult<Option<T>> {
        self.visited.insert(key.to_string());
        match self.conf.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v.clone()).map(Some).map_err(|e| {
                QuoteException::config_error(format!("invalid value for {}: {}", key, e))
            }),
        }
    }

    /// Reject keys nobody asked for
    fn check(&self) -> QuoteResult<()> {
        let mut unknown: Vec<&String> = self
            .conf
            .keys()
            .filter(|k| !self.visited.contains(*k))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort();
        Err(QuoteException::config_error(format!(
            "unknown para = {}",
            unknown
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}
