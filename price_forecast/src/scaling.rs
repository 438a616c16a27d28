//! Min-max scaling and its inverse

use crate::data::{PricePoint, Series};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bounds remembered from the series a scaler was fitted on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    min: f64,
    max: f64,
}

impl ScalerState {
    /// Fit bounds to `values`; fails when they are all equal
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::insufficient(1, 0, "min-max scaling"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DegenerateSeries(
                "series contains non-finite values".to_string(),
            ));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == min {
            return Err(ForecastError::DegenerateSeries(format!(
                "all {} values equal {}; min-max scaling is undefined",
                values.len(),
                min
            )));
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the fitted range
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value into the unit interval (for in-range values)
    pub fn scale(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    /// Map a scaled value back into original units
    pub fn unscale(&self, value: f64) -> f64 {
        value * self.range() + self.min
    }
}

/// A series mapped into `[0, 1]`, bound to the state that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledSeries {
    points: Vec<PricePoint>,
    state: ScalerState,
}

impl ScaledSeries {
    /// Scaler state this series was produced with
    pub fn state(&self) -> &ScalerState {
        &self.state
    }
}

impl Series for ScaledSeries {
    fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

/// Fit a min-max scaler on `series` and apply it.
///
/// Fails with [`ForecastError::DegenerateSeries`] when every value is equal.
pub fn fit_scale<S: Series + ?Sized>(series: &S) -> Result<(ScaledSeries, ScalerState)> {
    let state = ScalerState::fit(&series.values())?;
    let points = series
        .points()
        .iter()
        .map(|p| PricePoint::new(p.date, state.scale(p.value)))
        .collect();

    debug!(min = state.min, max = state.max, "fitted min-max scaler");
    Ok((ScaledSeries { points, state }, state))
}

/// Map scaled values back into price units with `state`
pub fn inverse_scale(state: &ScalerState, values: &[f64]) -> Vec<f64> {
    values.iter().map(|&v| state.unscale(v)).collect()
}
