//! Stationarity analysis
//!
//! Augmented Dickey-Fuller unit-root test with a constant term, lag length
//! selected by AIC, and the search for the smallest differencing order that
//! makes a series pass it.

use crate::config::{PipelineConfig, MAX_DIFFERENCING_ORDER};
use crate::data::Series;
use crate::error::{ForecastError, Result};
use series_math::{difference, ols, MathError};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;
use tracing::{debug, warn};

/// Shortest series the unit-root regression accepts
pub const MIN_ADF_OBSERVATIONS: usize = 8;

/// Spread, relative to the largest magnitude, below which values count as equal
const FLAT_TOLERANCE: f64 = 1e-9;

// MacKinnon (1994) response surface, constant-only case, one variable.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) critical value surfaces for 1%, 5% and 10%.
const CRITICAL_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRITICAL_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRITICAL_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// Number of first differences needed to reach stationarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DifferencingOrder(usize);

impl DifferencingOrder {
    /// Create an order, rejecting values above the supported cap
    pub fn new(order: usize) -> Result<Self> {
        if order > MAX_DIFFERENCING_ORDER {
            return Err(ForecastError::InvalidParameter(format!(
                "differencing order must be <= {}, got {}",
                MAX_DIFFERENCING_ORDER, order
            )));
        }
        Ok(Self(order))
    }

    pub fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for DifferencingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Test statistic thresholds at the usual significance levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

impl CriticalValues {
    /// Finite-sample critical values for `n_obs` regression observations
    pub fn for_sample(n_obs: usize) -> Self {
        let surface = |c: [f64; 4]| {
            let inv = 1.0 / n_obs as f64;
            c[0] + c[1] * inv + c[2] * inv.powi(2) + c[3] * inv.powi(3)
        };
        Self {
            one_percent: surface(CRITICAL_1),
            five_percent: surface(CRITICAL_5),
            ten_percent: surface(CRITICAL_10),
        }
    }
}

/// Outcome of one Augmented Dickey-Fuller test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdfResult {
    /// t statistic of the lagged level
    pub statistic: f64,
    /// Approximate p-value of `statistic`
    pub p_value: f64,
    /// Number of lagged differences in the regression
    pub used_lag: usize,
    /// Observations in the final regression
    pub n_obs: usize,
    pub critical_values: CriticalValues,
}

impl AdfResult {
    /// Whether the unit-root hypothesis is rejected at `significance_level`
    pub fn is_stationary(&self, significance_level: f64) -> bool {
        self.p_value <= significance_level
    }
}

/// Run the Augmented Dickey-Fuller test on `values`.
///
/// The regression is `dy[t] = a + g * y[t-1] + sum(b_i * dy[t-i]) + e[t]`.
/// Candidate lag counts `0..=maxlag` are compared by AIC on a common sample and
/// the winner is refitted on all observations it can use.
pub fn adf_test(values: &[f64]) -> Result<AdfResult> {
    let n = values.len();
    if n < MIN_ADF_OBSERVATIONS {
        return Err(ForecastError::insufficient(
            MIN_ADF_OBSERVATIONS,
            n,
            "unit-root test",
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::ModelFitFailure(
            "unit-root test input contains non-finite values".to_string(),
        ));
    }

    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let maxlag = schwert.min(n / 2 - 2);
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=maxlag {
        let fit = match adf_regression(values, &diffs, lag, maxlag) {
            Ok(fit) => fit,
            // Lagged differences collinear with the constant cannot be scored.
            Err(ForecastError::DegenerateSeries(_)) => {
                debug!(lag, "skipping singular lag candidate");
                continue;
            }
            Err(err) => return Err(err),
        };
        let aic = fit.aic();
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }
    let used_lag = best.map(|(_, lag)| lag).ok_or_else(|| {
        ForecastError::DegenerateSeries(
            "unit-root regression is singular at every lag".to_string(),
        )
    })?;

    let fit = adf_regression(values, &diffs, used_lag, used_lag)?;
    let statistic = fit.t_value(1).unwrap_or(f64::NAN);
    if !statistic.is_finite() {
        return Err(ForecastError::DegenerateSeries(
            "unit-root regression has a perfect fit".to_string(),
        ));
    }

    let p_value = mackinnon_p_value(statistic)?;
    debug!(statistic, p_value, used_lag, n_obs = fit.n_obs, "adf test");

    Ok(AdfResult {
        statistic,
        p_value,
        used_lag,
        n_obs: fit.n_obs,
        critical_values: CriticalValues::for_sample(fit.n_obs),
    })
}

/// Regress differences on a constant, the lagged level and `lag` lagged
/// differences, using rows from `first_row` of the difference series on.
fn adf_regression(
    values: &[f64],
    diffs: &[f64],
    lag: usize,
    first_row: usize,
) -> Result<series_math::OlsFit> {
    let mut y = Vec::with_capacity(diffs.len() - first_row);
    let mut rows = Vec::with_capacity(diffs.len() - first_row);
    for t in first_row..diffs.len() {
        let mut row = Vec::with_capacity(lag + 2);
        row.push(1.0);
        row.push(values[t]);
        row.extend((1..=lag).map(|i| diffs[t - i]));
        rows.push(row);
        y.push(diffs[t]);
    }

    ols(&y, &rows).map_err(|err| match err {
        MathError::CalculationError(_) => ForecastError::DegenerateSeries(
            "unit-root regression is singular".to_string(),
        ),
        other => other.into(),
    })
}

/// Approximate p-value of an ADF statistic (constant, no trend)
pub fn mackinnon_p_value(statistic: f64) -> Result<f64> {
    if statistic > TAU_MAX {
        return Ok(1.0);
    }
    if statistic < TAU_MIN {
        return Ok(0.0);
    }

    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * statistic + c);

    let normal = Normal::new(0.0, 1.0)
        .map_err(|err| ForecastError::ModelFitFailure(err.to_string()))?;
    Ok(normal.cdf(z))
}

/// Every test run while searching for the differencing order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationarityReport {
    /// Chosen differencing order
    pub order: DifferencingOrder,
    /// Tests run on the series differenced 0, 1, ... times. Levels that are an
    /// exact trend or exactly constant are decided without a test.
    pub tests: Vec<AdfResult>,
    /// Whether the final test passed; false means the cap was hit
    pub stationary: bool,
}

/// Searches for the smallest differencing order that passes the unit-root test
#[derive(Debug, Clone, Copy)]
pub struct StationarityAnalyzer {
    significance_level: f64,
    max_order: usize,
}

impl Default for StationarityAnalyzer {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            max_order: MAX_DIFFERENCING_ORDER,
        }
    }
}

impl StationarityAnalyzer {
    pub fn new(significance_level: f64, max_order: usize) -> Result<Self> {
        if !(significance_level > 0.0 && significance_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "significance level must be in (0, 1), got {}",
                significance_level
            )));
        }
        DifferencingOrder::new(max_order)?;
        Ok(Self {
            significance_level,
            max_order,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.significance_level, config.max_differencing_order)
    }

    /// Run the search and keep every intermediate test
    pub fn analyze<S: Series + ?Sized>(&self, series: &S) -> Result<StationarityReport> {
        let mut values = series.values();
        let mut tests = Vec::new();
        let mut order = 0;

        let stationary = loop {
            if values.len() >= MIN_ADF_OBSERVATIONS && is_flat(&values) {
                if order == 0 {
                    return Err(ForecastError::DegenerateSeries(format!(
                        "all {} values are equal; the series is flat",
                        values.len()
                    )));
                }
                // Constant after differencing: the previous level was an exact trend.
                break true;
            }

            let passed = if is_exact_trend(&values)? {
                debug!(order, "series is an exact polynomial trend");
                false
            } else {
                let result = adf_test(&values)?;
                let passed = result.is_stationary(self.significance_level);
                tests.push(result);
                passed
            };

            if passed {
                break true;
            }
            if order == self.max_order {
                warn!(
                    order,
                    "series still non-stationary at the differencing cap; using the cap"
                );
                break false;
            }
            values = difference(&values, 1)?;
            order += 1;
        };

        debug!(order, stationary, "differencing order determined");
        Ok(StationarityReport {
            order: DifferencingOrder(order),
            tests,
            stationary,
        })
    }

    /// Smallest differencing order that passes, capped at the configured maximum
    pub fn determine_order<S: Series + ?Sized>(&self, series: &S) -> Result<DifferencingOrder> {
        Ok(self.analyze(series)?.order)
    }
}

/// Whether some difference of `values` up to the order cap is constant
fn is_exact_trend(values: &[f64]) -> Result<bool> {
    for k in 1..=MAX_DIFFERENCING_ORDER {
        if values.len() <= MIN_ADF_OBSERVATIONS + k {
            break;
        }
        if is_flat(&difference(values, k)?) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_flat(values: &[f64]) -> bool {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    max - min <= FLAT_TOLERANCE * min.abs().max(max.abs()).max(1.0)
}

/// [`StationarityAnalyzer::determine_order`] with a 5% level and a cap of 2
pub fn determine_order<S: Series + ?Sized>(series: &S) -> Result<DifferencingOrder> {
    StationarityAnalyzer::default().determine_order(series)
}
