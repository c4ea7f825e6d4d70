use std::collections::VecDeque;

use crate::common::quote_exception::{QuoteException, QuoteResult};
use crate::common::utils::{mean, MAX_LOOKBACK};

/// Simple moving average over the last `window` prices
#[derive(Debug)]
pub struct SimpleMA {
    window: usize,
    prices: VecDeque<f64>,
}

impl SimpleMA {
    /// Accepts `1..=MAX_LOOKBACK` without allocating
    pub fn check_window(window: usize) -> QuoteResult<()> {
        if window == 0 {
            return Err(QuoteException::invalid_argument(
                "moving average window_size must be positive, got 0",
            ));
        }
        if window > MAX_LOOKBACK {
            return Err(QuoteException::invalid_argument(format!(
                "moving average window_size must be at most {}, got {}",
                MAX_LOOKBACK, window
            )));
        }
        Ok(())
    }

    pub fn new(window: usize) -> QuoteResult<Self> {
        Self::check_window(window)?;
        Ok(Self {
            window,
            prices: VecDeque::with_capacity(window),
        })
    }

    /// Feed the next price; returns the average once the window is full.
    pub fn add(&mut self, price: f64) -> Option<f64> {
        self.prices.push_back(price);
        if self.prices.len() > self.window {
            self.prices.pop_front();
        }

        if self.prices.len() == self.window {
            mean(self.prices.make_contiguous())
        } else {
            None
        }
    }

    /// Mean of exactly `window` prices
    pub fn calculate(prices: impl IntoIterator<Item = f64>, window: usize) -> QuoteResult<f64> {
        let mut ma = Self::new(window)?;
        let mut count = 0;
        let mut avg = None;
        for price in prices {
            count += 1;
            avg = ma.add(price);
        }
        match avg {
            Some(avg) if count == window => Ok(avg),
            _ => Err(QuoteException::invalid_argument(format!(
                "moving average needs {} prices, got {}",
                window, count
            ))),
        }
    }
}
