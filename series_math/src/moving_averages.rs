//! Moving average calculations
//!
//! Contains a streaming Simple Moving Average (SMA) and the batch
//! rolling mean used to smooth closing prices.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::insufficient(
                self.period,
                self.values.len(),
                "SMA calculation",
            ));
        }

        // Summed from the window each time; a running add/subtract drifts.
        Ok(self.values.iter().sum::<f64>() / self.period as f64)
    }

    /// Whether a full window has been observed
    pub fn is_ready(&self) -> bool {
        self.values.len() == self.period
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

/// Trailing rolling mean of `data` over `window` values.
///
/// The output drops the `window - 1` warm-up positions, so element `i` is the
/// mean of `data[i..i + window]`.
pub fn rolling_mean(data: &[f64], window: usize) -> Result<Vec<f64>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    if data.len() < window {
        return Err(MathError::insufficient(
            window,
            data.len(),
            format!("rolling mean over {} values", window),
        ));
    }

    let mut out = Vec::with_capacity(data.len() + 1 - window);
    for &value in data {
        sma.update(value);
        if sma.is_ready() {
            out.push(sma.value()?);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_window() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();
        sma.update(1.0);
        sma.update(2.0);
        assert!(sma.value().is_err());

        sma.update(3.0);
        assert_relative_eq!(sma.value().unwrap(), 2.0);

        sma.update(10.0);
        assert_relative_eq!(sma.value().unwrap(), 5.0);
        assert_eq!(sma.period(), 3);

        sma.reset();
        assert!(!sma.is_ready());
    }

    #[test]
    fn test_rolling_mean() {
        let data = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0];
        let ma = rolling_mean(&data, 3).unwrap();

        assert_eq!(ma.len(), data.len() - 2);
        assert_relative_eq!(ma[0], 20.0);
        assert_relative_eq!(ma[4], 60.0);

        assert!(rolling_mean(&data, 10).is_err());
        assert!(rolling_mean(&data, 0).is_err());
    }

    #[test]
    fn test_rolling_mean_window_one_is_identity() {
        let data = vec![3.5, 1.25, 8.0];
        assert_eq!(rolling_mean(&data, 1).unwrap(), data);
    }
}
