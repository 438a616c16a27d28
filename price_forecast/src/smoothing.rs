//! Rolling-mean smoothing of closing prices

use crate::data::{PricePoint, PriceSeries, Series, SmoothedSeries};
use crate::error::{ForecastError, Result};
use series_math::rolling_mean;
use tracing::debug;

/// Replace each close with the mean of the trailing `window` closes.
///
/// The first `window - 1` dates have no full window and are dropped. The input
/// must be strictly longer than `window`.
pub fn smooth(series: &PriceSeries, window: usize) -> Result<SmoothedSeries> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "smoothing window must be positive".to_string(),
        ));
    }
    if series.len() <= window {
        return Err(ForecastError::insufficient(
            window + 1,
            series.len(),
            format!("rolling mean over {} days", window),
        ));
    }

    let means = rolling_mean(&series.values(), window)?;
    let points: Vec<PricePoint> = series.points()[window - 1..]
        .iter()
        .zip(means)
        .map(|(p, value)| PricePoint::new(p.date, value))
        .collect();

    debug!(input = series.len(), output = points.len(), window, "smoothed series");
    Ok(SmoothedSeries::new(points, window))
}
