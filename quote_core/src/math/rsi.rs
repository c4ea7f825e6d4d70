use crate::common::quote_exception::{QuoteException, QuoteResult};
use crate::common::utils::{round2, MAX_LOOKBACK};

/// Relative strength index over a window of `period` prices.
///
/// A window of `period` prices yields `period - 1` day-over-day deltas, but
/// average gain and average loss are both divided by `period`. A window with no
/// losses saturates at 100.
#[derive(Debug)]
pub struct RSI {
    period: usize,
    last_price: Option<f64>,
    gains: Vec<f64>,
    losses: Vec<f64>,
}

impl RSI {
    /// Accepts `2..=MAX_LOOKBACK` without allocating
    pub fn check_period(period: usize) -> QuoteResult<()> {
        if period <= 1 || period > MAX_LOOKBACK {
            return Err(QuoteException::invalid_argument(format!(
                "rsi period must be within 2..={}, got {}",
                MAX_LOOKBACK, period
            )));
        }
        Ok(())
    }

    pub fn new(period: usize) -> QuoteResult<Self> {
        Self::check_period(period)?;
        Ok(Self {
            period,
            last_price: None,
            gains: Vec::with_capacity(period),
            losses: Vec::with_capacity(period),
        })
    }

    /// Feed the next price; returns the RSI once `period` prices are in the window.
    pub fn add(&mut self, price: f64) -> Option<f64> {
        let last_price = self.last_price.replace(price)?;

        let change = price - last_price;
        if change >= 0.0 {
            self.gains.push(change);
            self.losses.push(0.0);
        } else {
            self.gains.push(0.0);
            self.losses.push(-change);
        }

        if self.gains.len() > self.period - 1 {
            self.gains.remove(0);
            self.losses.remove(0);
        }

        if self.gains.len() == self.period - 1 {
            Some(self.value())
        } else {
            None
        }
    }

    fn value(&self) -> f64 {
        let avg_gain = self.gains.iter().sum::<f64>() / self.period as f64;
        let avg_loss = self.losses.iter().sum::<f64>() / self.period as f64;

        if avg_loss == 0.0 {
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        round2(100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
    }

    /// RSI of exactly `period` consecutive prices
    pub fn calculate(prices: impl IntoIterator<Item = f64>, period: usize) -> QuoteResult<f64> {
        let mut rsi = Self::new(period)?;
        let mut count = 0;
        let mut value = None;
        for price in prices {
            count += 1;
            value = rsi.add(price);
        }
        match value {
            Some(value) if count == period => Ok(value),
            _ => Err(QuoteException::invalid_argument(format!(
                "rsi needs {} prices, got {}",
                period, count
            ))),
        }
    }
}
