//! Fixed-horizon forecasts of a scaled series

use crate::config::{PipelineConfig, DEFAULT_HORIZON};
use crate::data::{PricePoint, Series};
use crate::error::{ForecastError, Result};
use crate::evaluation::ModelSettings;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::scaling::{ScaledSeries, ScalerState};
use crate::stationarity::DifferencingOrder;
use chrono::Duration;
use tracing::debug;

/// Forecast in scaled units, carrying the scaler of the series it extends
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledForecast {
    points: Vec<PricePoint>,
    state: ScalerState,
}

impl ScaledForecast {
    pub fn state(&self) -> &ScalerState {
        &self.state
    }

    /// Rescale into price units with the state of the originating series
    pub fn to_price_units(&self) -> Forecast {
        Forecast {
            points: self
                .points
                .iter()
                .map(|p| PricePoint::new(p.date, self.state.unscale(p.value)))
                .collect(),
        }
    }
}

impl Series for ScaledForecast {
    fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

/// Forecast in price units
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    points: Vec<PricePoint>,
}

impl Series for Forecast {
    fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

/// Refits on the whole series and projects a fixed number of days ahead
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    horizon: usize,
    min_observations: usize,
    settings: ModelSettings,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            min_observations: PipelineConfig::default().min_observations,
            settings: ModelSettings::default(),
        }
    }
}

impl Forecaster {
    pub fn new(horizon: usize, min_observations: usize, settings: ModelSettings) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be positive".to_string(),
            ));
        }
        Ok(Self {
            horizon,
            min_observations,
            settings,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(
            config.horizon,
            config.min_observations,
            ModelSettings::from_config(config),
        )
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Forecast `horizon` consecutive calendar days after the last date
    pub fn forecast(&self, series: &ScaledSeries, order: DifferencingOrder) -> Result<ScaledForecast> {
        let model = self.settings.model(order)?;
        let required = self.min_observations.max(model.min_observations());
        let last_date = match series.last_date() {
            Some(date) if series.len() >= required => date,
            _ => {
                return Err(ForecastError::insufficient(
                    required,
                    series.len(),
                    format!("forecasting with {}", model.name()),
                ))
            }
        };

        let trained = model.train(&series.values())?;
        let values = trained.forecast(self.horizon)?;

        let points = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| PricePoint::new(last_date + Duration::days(i as i64 + 1), value))
            .collect();

        debug!(model = trained.name(), horizon = self.horizon, %last_date, "produced forecast");
        Ok(ScaledForecast {
            points,
            state: *series.state(),
        })
    }
}

/// [`Forecaster::forecast`] with the default 30-day horizon and model orders
pub fn forecast(series: &ScaledSeries, order: DifferencingOrder) -> Result<ScaledForecast> {
    Forecaster::default().forecast(series, order)
}
