//! Hold-out evaluation of the forecasting model

use crate::config::{PipelineConfig, DEFAULT_HORIZON};
use crate::data::{PriceSeries, Series};
use crate::error::{ForecastError, Result};
use crate::models::arima::Arima;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::scaling::{ScaledSeries, ScalerState};
use crate::stationarity::DifferencingOrder;
use serde::Serialize;
use series_math::NelderMeadConfig;
use tracing::debug;

/// Root-mean-squared error of a hold-out forecast, in scaled units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// RMSE between the forecast and the held-out tail, in scaled units
    pub rmse: f64,
    /// Length of the held-out tail
    pub horizon: usize,
}

impl EvaluationResult {
    /// The same error expressed in price units.
    ///
    /// Min-max scaling is linear, so the RMSE scales by the fitted range.
    pub fn price_units(&self, state: &ScalerState) -> f64 {
        self.rmse * state.range()
    }
}

/// RMSE as a percentage of the mean of the last `window` closes
pub fn relative_rmse(rmse: f64, closes: &PriceSeries, window: usize) -> Option<f64> {
    closes
        .trailing_mean(window)
        .filter(|m| *m != 0.0)
        .map(|m| rmse / m * 100.0)
}

/// Model orders and search settings shared by the evaluator and forecaster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    pub ar_order: usize,
    pub ma_order: usize,
    pub optimizer: NelderMeadConfig,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl ModelSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            ar_order: config.ar_order,
            ma_order: config.ma_order,
            optimizer: config.optimizer,
        }
    }

    /// Build the model for a differencing order
    pub fn model(&self, order: DifferencingOrder) -> Result<Arima> {
        Ok(Arima::new(self.ar_order, order.value(), self.ma_order)?.with_optimizer(self.optimizer))
    }
}

/// Fits on a training prefix and scores a forecast of the held-out suffix
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    horizon: usize,
    settings: ModelSettings,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            settings: ModelSettings::default(),
        }
    }
}

impl Evaluator {
    pub fn new(horizon: usize, settings: ModelSettings) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "evaluation horizon must be positive".to_string(),
            ));
        }
        Ok(Self { horizon, settings })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.horizon, ModelSettings::from_config(config))
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Hold out the last `horizon` points, fit on the rest, and forecast them.
    ///
    /// The training prefix must hold at least twice the horizon.
    pub fn evaluate(&self, series: &ScaledSeries, order: DifferencingOrder) -> Result<EvaluationResult> {
        let values = series.values();
        let horizon = self.horizon;
        let required = 3 * horizon;
        if values.len() < required {
            return Err(ForecastError::ModelFitFailure(format!(
                "evaluation needs a training prefix of at least {} points plus {} held out, got {} in total",
                2 * horizon,
                horizon,
                values.len()
            )));
        }

        let (train, test) = values.split_at(values.len() - horizon);
        let model = self.settings.model(order)?;
        let trained = model.train(train)?;
        let predictions = trained.forecast(horizon)?;

        let rmse = series_math::rmse(&predictions, test)?;
        if !rmse.is_finite() {
            return Err(ForecastError::ModelFitFailure(
                "evaluation produced a non-finite error".to_string(),
            ));
        }

        debug!(model = trained.name(), train = train.len(), horizon, rmse, "evaluated model");
        Ok(EvaluationResult { rmse, horizon })
    }
}

/// [`Evaluator::evaluate`] with the default 30-point horizon and model orders
pub fn evaluate(series: &ScaledSeries, order: DifferencingOrder) -> Result<EvaluationResult> {
    Evaluator::default().evaluate(series, order)
}
