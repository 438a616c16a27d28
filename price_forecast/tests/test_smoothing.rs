mod common;

use approx::assert_relative_eq;
use price_forecast::{smooth, ForecastError, Series};
use pretty_assertions::assert_eq;

#[test]
fn test_rolling_mean_values_and_dates() {
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let series = common::series(&values);

    let smoothed = smooth(&series, 7).unwrap();
    assert_eq!(smoothed.len(), 4);
    assert_eq!(smoothed.window(), 7);
    // First full window ends on the seventh date.
    assert_eq!(smoothed.dates()[0], series.dates()[6]);
    assert_eq!(smoothed.last_date(), series.last_date());

    for (value, expected) in smoothed.values().iter().zip([4.0, 5.0, 6.0, 7.0]) {
        assert_relative_eq!(*value, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_short_series_is_rejected() {
    let series = common::series(&[10.0, 11.0, 12.0, 13.0, 14.0]);

    match smooth(&series, 7) {
        Err(ForecastError::InsufficientData {
            required, actual, ..
        }) => {
            assert_eq!(required, 8);
            assert_eq!(actual, 5);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }

    // A series exactly one window long leaves a single point, too few to use.
    let series = common::series(&[1.0; 7]);
    assert!(matches!(
        smooth(&series, 7),
        Err(ForecastError::InsufficientData { .. })
    ));
}

#[test]
fn test_zero_window() {
    let series = common::series(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        smooth(&series, 0),
        Err(ForecastError::InvalidParameter(_))
    ));
}
