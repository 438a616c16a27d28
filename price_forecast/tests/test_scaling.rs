mod common;

use approx::assert_relative_eq;
use price_forecast::{fit_scale, inverse_scale, smooth, ForecastError, Series};

#[test]
fn test_round_trip() {
    let series = common::drifting_prices();
    let smoothed = smooth(&series, 7).unwrap();

    let (scaled, state) = fit_scale(&smoothed).unwrap();
    let restored = inverse_scale(&state, &scaled.values());

    for (original, back) in smoothed.values().iter().zip(&restored) {
        assert_relative_eq!(*original, *back, max_relative = 1e-9);
    }
    assert_eq!(scaled.dates(), smoothed.dates());
    assert_eq!(scaled.state(), &state);
}

#[test]
fn test_scaled_range() {
    let series = common::series(&[5.0, 15.0, 10.0, 7.5]);
    let (scaled, state) = fit_scale(&series).unwrap();

    assert_eq!(state.min(), 5.0);
    assert_eq!(state.max(), 15.0);
    assert_eq!(state.range(), 10.0);
    assert_eq!(scaled.values(), vec![0.0, 1.0, 0.5, 0.25]);

    // Values outside the fitted range map outside [0, 1] and back again.
    assert_relative_eq!(state.scale(20.0), 1.5);
    assert_relative_eq!(state.unscale(-0.5), 0.0);
}

#[test]
fn test_constant_series_is_degenerate() {
    let series = common::series(&[42.0; 20]);
    assert!(matches!(
        fit_scale(&series),
        Err(ForecastError::DegenerateSeries(_))
    ));
}
