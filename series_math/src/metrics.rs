//! Summary statistics and forecast error

use crate::{MathError, Result};

/// Arithmetic mean, or `None` for an empty slice
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        None
    } else {
        Some(data.iter().sum::<f64>() / data.len() as f64)
    }
}

/// Root-mean-squared error between a forecast and the values it predicted
pub fn rmse(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(MathError::InvalidInput(format!(
            "Forecast ({}) and actual ({}) values must have the same non-zero length",
            forecast.len(),
            actual.len()
        )));
    }

    let sse: f64 = forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| (a - f) * (a - f))
        .sum();
    Ok((sse / forecast.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rmse() {
        let forecast = vec![105.0, 106.0, 107.0];
        let actual = vec![106.0, 107.0, 108.0];
        assert_relative_eq!(rmse(&forecast, &actual).unwrap(), 1.0);
        assert_relative_eq!(rmse(&actual, &actual).unwrap(), 0.0);
    }

    #[test]
    fn test_rmse_penalises_large_errors() {
        assert_relative_eq!(rmse(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 12.5_f64.sqrt());
    }

    #[test]
    fn test_length_mismatch() {
        assert!(rmse(&[1.0], &[1.0, 2.0]).is_err());
        assert!(rmse(&[], &[]).is_err());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }
}
