//! # Price Forecast
//!
//! Short-horizon forecasting of a single ticker's daily closing prices.
//!
//! ## Pipeline
//!
//! 1. [`smoothing::smooth`] replaces closes with a 7-day trailing mean
//! 2. [`stationarity::determine_order`] picks how many differences the
//!    smoothed series needs, using an Augmented Dickey-Fuller test at 5%
//! 3. [`scaling::fit_scale`] maps the series into `[0, 1]`
//! 4. [`evaluation::evaluate`] scores an ARIMA fit on a 30-point hold-out
//! 5. [`forecasting::forecast`] refits on everything and projects 30 days
//! 6. [`scaling::inverse_scale`] maps model output back to prices
//!
//! Each stage is a pure function of its inputs; the same series always yields
//! the same order, error and forecast.
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::{CsvSeriesLoader, ForecastPipeline, PipelineConfig, Series};
//!
//! let config = PipelineConfig::default();
//! let loader = CsvSeriesLoader::new("data", config.lookback_days);
//! let pipeline = ForecastPipeline::new(config)?;
//!
//! let report = pipeline.run_ticker(&loader, "AAPL")?;
//! println!("order {} rmse {:.4}", report.order(), report.evaluation.rmse);
//! for point in report.forecast.points() {
//!     println!("{} {:.2}", point.date, point.value);
//! }
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod forecasting;
pub mod models;
pub mod pipeline;
pub mod scaling;
pub mod smoothing;
pub mod stationarity;

// Re-export commonly used types
pub use crate::config::PipelineConfig;
pub use crate::data::{
    CsvSeriesLoader, MemorySeriesLoader, PricePoint, PriceSeries, Series, SeriesLoader,
    SmoothedSeries,
};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::{evaluate, EvaluationResult, Evaluator};
pub use crate::forecasting::{forecast, Forecast, Forecaster, ScaledForecast};
pub use crate::pipeline::{ForecastPipeline, ForecastReport};
pub use crate::scaling::{fit_scale, inverse_scale, ScaledSeries, ScalerState};
pub use crate::smoothing::smooth;
pub use crate::stationarity::{determine_order, DifferencingOrder, StationarityAnalyzer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
