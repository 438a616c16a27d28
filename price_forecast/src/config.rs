//! Pipeline configuration
//!
//! Every tunable of a forecast request lives here and is passed in
//! explicitly; nothing is read from process-wide state.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use series_math::NelderMeadConfig;
use std::path::Path;

/// Number of future steps produced by the forecaster
pub const DEFAULT_HORIZON: usize = 30;

/// Trailing window of the rolling-mean smoother
pub const DEFAULT_SMOOTHING_WINDOW: usize = 7;

/// Largest differencing order the stationarity search will return
pub const MAX_DIFFERENCING_ORDER: usize = 2;

/// Configuration for one forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rolling-mean window applied before modelling
    pub smoothing_window: usize,
    /// p-value at or below which a series counts as stationary
    pub significance_level: f64,
    /// Cap on the differencing order search
    pub max_differencing_order: usize,
    /// Forecast and validation horizon
    pub horizon: usize,
    /// Autoregressive order of the fitted model
    pub ar_order: usize,
    /// Moving-average order of the fitted model
    pub ma_order: usize,
    /// Minimum series length the forecaster accepts
    pub min_observations: usize,
    /// Trailing window, in calendar days, kept by the loader
    pub lookback_days: i64,
    /// Stopping rules of the parameter search
    pub optimizer: NelderMeadConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            significance_level: 0.05,
            max_differencing_order: MAX_DIFFERENCING_ORDER,
            horizon: DEFAULT_HORIZON,
            ar_order: 2,
            ma_order: 1,
            min_observations: 10,
            lookback_days: 365,
            optimizer: NelderMeadConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "smoothing_window must be positive".to_string(),
            ));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }
        if self.max_differencing_order > MAX_DIFFERENCING_ORDER {
            return Err(ForecastError::InvalidParameter(format!(
                "max_differencing_order must be <= {}, got {}",
                MAX_DIFFERENCING_ORDER, self.max_differencing_order
            )));
        }
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be positive".to_string(),
            ));
        }
        if self.ar_order > 10 || self.ma_order > 10 {
            return Err(ForecastError::InvalidParameter(format!(
                "AR and MA orders must be <= 10, got ({}, {})",
                self.ar_order, self.ma_order
            )));
        }
        if self.lookback_days <= 0 {
            return Err(ForecastError::InvalidParameter(
                "lookback_days must be positive".to_string(),
            ));
        }
        if self.optimizer.max_iter == 0 {
            return Err(ForecastError::InvalidParameter(
                "optimizer.max_iter must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
