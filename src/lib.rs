//! # Stock Forecast
//!
//! Workspace facade re-exporting the forecasting pipeline and the numeric
//! building blocks it is made of.
//!
//! ## Example
//!
//! ```
//! use stock_forecast_workspace::price_forecast::{smooth, PriceSeries, Series};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let closes = PriceSeries::from_values(start, &[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let smoothed = smooth(&closes, 2).unwrap();
//! assert_eq!(smoothed.values(), vec![1.5, 2.5, 3.5]);
//! ```

pub use price_forecast;
pub use series_math;

/// Run the default pipeline on an in-memory series of consecutive daily closes.
///
/// # Examples
///
/// ```
/// use stock_forecast_workspace::quick_forecast;
///
/// // Too short for the 7-day smoother
/// assert!(quick_forecast(&[10.0, 11.0, 12.0]).is_err());
/// ```
pub fn quick_forecast(
    closes: &[f64],
) -> price_forecast::Result<price_forecast::ForecastReport> {
    let start = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).ok_or_else(|| {
        price_forecast::ForecastError::InvalidParameter("invalid start date".to_string())
    })?;
    let series = price_forecast::PriceSeries::from_values(start, closes)?;
    price_forecast::ForecastPipeline::new(price_forecast::PipelineConfig::default())?.run(&series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_forecast_rejects_flat_input() {
        let closes = vec![25.0; 100];
        assert!(matches!(
            quick_forecast(&closes),
            Err(price_forecast::ForecastError::DegenerateSeries(_))
        ));
    }

    #[test]
    fn test_reexports() {
        assert_eq!(series_math::mean(&[1.0, 3.0]), Some(2.0));
        assert_eq!(price_forecast::NAME, "price_forecast");
    }
}
