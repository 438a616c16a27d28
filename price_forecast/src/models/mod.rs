//! Forecasting models for scaled price series

use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Project `horizon` values past the end of the training data
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a series of values
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on `values`, oldest first
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Shortest input `train` accepts
    fn min_observations(&self) -> usize;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
