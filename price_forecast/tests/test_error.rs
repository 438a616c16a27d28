use price_forecast::ForecastError;
use series_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    let math_error = MathError::CalculationError("singular".to_string());
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::ModelFitFailure(_)
    ));

    let math_error = MathError::InvalidInput("bad window".to_string());
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::InvalidParameter(_)
    ));

    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::ConfigError(_)
    ));
}

#[test]
fn test_math_shortfall_keeps_lengths() {
    let math_error = series_math::difference(&[1.0, 2.0], 2).unwrap_err();
    match ForecastError::from(math_error) {
        ForecastError::InsufficientData {
            required, actual, ..
        } => {
            assert_eq!(required, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }

    let math_error = series_math::rolling_mean(&[1.0, 2.0, 3.0], 7).unwrap_err();
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::InsufficientData {
            required: 7,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::insufficient(8, 5, "rolling mean over 7 days");
    let message = error.to_string();
    assert!(message.contains("need at least 8"));
    assert!(message.contains("got 5"));

    let error = ForecastError::DegenerateSeries("all values equal".to_string());
    assert!(error.to_string().starts_with("Degenerate series"));

    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let message = ForecastError::from(io_error).to_string();
    assert!(message.contains("IO error"));
    assert!(message.contains("file not found"));
}
