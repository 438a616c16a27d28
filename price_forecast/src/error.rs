//! Error types for the price_forecast crate

use series_math::MathError;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No usable series for the requested ticker/window
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Series too short for the requested transform
    #[error("Insufficient data for {context}: need at least {required} points, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
        context: String,
    },

    /// Zero-variance or otherwise flat input
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// Optimizer non-convergence or malformed intermediate series
    #[error("Model fit failure: {0}")]
    ModelFitFailure(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from reading a configuration document
    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Shorthand for [`ForecastError::InsufficientData`]
    pub fn insufficient(required: usize, actual: usize, context: impl Into<String>) -> Self {
        ForecastError::InsufficientData {
            required,
            actual,
            context: context.into(),
        }
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData {
                required,
                actual,
                context,
            } => ForecastError::InsufficientData {
                required,
                actual,
                context,
            },
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            MathError::CalculationError(msg) => ForecastError::ModelFitFailure(msg),
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
