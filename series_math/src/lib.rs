//! # Series Math
//!
//! Numeric building blocks for price series forecasting.
//! This crate provides the rolling statistics, differencing, regression and
//! optimisation routines the forecasting pipeline is assembled from.

use thiserror::Error;

pub mod differencing;
pub mod metrics;
pub mod moving_averages;
pub mod optimization;
pub mod regression;

pub use differencing::{difference, integrate};
pub use metrics::{mean, rmse};
pub use moving_averages::{rolling_mean, SimpleMovingAverage};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use regression::{ols, OlsFit};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for {context}: need at least {required} values, got {actual}")]
    InsufficientData {
        required: usize,
        actual: usize,
        context: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

impl MathError {
    /// Shorthand for [`MathError::InsufficientData`]
    pub fn insufficient(required: usize, actual: usize, context: impl Into<String>) -> Self {
        MathError::InsufficientData {
            required,
            actual,
            context: context.into(),
        }
    }
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
