//! End-to-end forecast request
//!
//! Chains loader, smoother, stationarity analysis, scaling, evaluation and
//! forecasting for one ticker. Every request owns its series and scaler state.

use crate::config::PipelineConfig;
use crate::data::{PricePoint, PriceSeries, Series, SeriesLoader, SmoothedSeries};
use crate::error::Result;
use crate::evaluation::{relative_rmse, EvaluationResult, Evaluator};
use crate::forecasting::{Forecast, Forecaster, ScaledForecast};
use crate::scaling::fit_scale;
use crate::smoothing::smooth;
use crate::stationarity::{DifferencingOrder, StationarityAnalyzer, StationarityReport};
use tracing::info;

/// Closes averaged for the relative error shown next to the RMSE
pub const RELATIVE_RMSE_WINDOW: usize = 30;

/// Everything one forecast request produces
#[derive(Debug, Clone)]
pub struct ForecastReport {
    /// Ticker the series was loaded for, when it came from a loader
    pub ticker: Option<String>,
    /// Smoothed history the model was fitted on
    pub smoothed: SmoothedSeries,
    pub stationarity: StationarityReport,
    /// Hold-out error in scaled units
    pub evaluation: EvaluationResult,
    /// Hold-out error in price units
    pub price_rmse: f64,
    /// Price-unit RMSE as a percentage of the recent mean close
    pub relative_rmse: Option<f64>,
    /// Raw model output
    pub scaled_forecast: ScaledForecast,
    /// Forecast in price units
    pub forecast: Forecast,
}

impl ForecastReport {
    pub fn order(&self) -> DifferencingOrder {
        self.stationarity.order
    }

    /// Smoothed history followed by the forecast, keeping the last `max_points`
    pub fn history_with_forecast(&self, max_points: usize) -> Vec<PricePoint> {
        let combined: Vec<PricePoint> = self
            .smoothed
            .points()
            .iter()
            .chain(self.forecast.points())
            .copied()
            .collect();
        let start = combined.len().saturating_sub(max_points);
        combined[start..].to_vec()
    }
}

/// Runs forecast requests with one configuration
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: PipelineConfig,
    analyzer: StationarityAnalyzer,
    evaluator: Evaluator,
    forecaster: Forecaster,
}

impl ForecastPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            analyzer: StationarityAnalyzer::from_config(&config)?,
            evaluator: Evaluator::from_config(&config)?,
            forecaster: Forecaster::from_config(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load `ticker` through `loader` and run the pipeline on it
    pub fn run_ticker<L: SeriesLoader + ?Sized>(
        &self,
        loader: &L,
        ticker: &str,
    ) -> Result<ForecastReport> {
        let series = loader.load(ticker)?;
        let mut report = self.run(&series)?;
        report.ticker = Some(ticker.trim().to_uppercase());
        Ok(report)
    }

    /// Run every stage on an already loaded series
    pub fn run(&self, series: &PriceSeries) -> Result<ForecastReport> {
        let smoothed = smooth(series, self.config.smoothing_window)?;
        let stationarity = self.analyzer.analyze(&smoothed)?;
        let order = stationarity.order;

        let (scaled, state) = fit_scale(&smoothed)?;
        let evaluation = self.evaluator.evaluate(&scaled, order)?;
        let scaled_forecast = self.forecaster.forecast(&scaled, order)?;
        let forecast = scaled_forecast.to_price_units();

        let price_rmse = evaluation.price_units(&state);
        let relative_rmse = relative_rmse(price_rmse, series, RELATIVE_RMSE_WINDOW);

        info!(
            points = series.len(),
            %order,
            rmse = evaluation.rmse,
            price_rmse,
            "forecast request completed"
        );

        Ok(ForecastReport {
            ticker: None,
            smoothed,
            stationarity,
            evaluation,
            price_rmse,
            relative_rmse,
            scaled_forecast,
            forecast,
        })
    }
}
