//! ARIMA models for time series forecasting
//!
//! Parameters are estimated by minimising the conditional sum of squares of
//! the differenced series with a Nelder-Mead search from a fixed starting
//! point, so a given input always yields the same fit.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use series_math::{difference, integrate, nelder_mead, NelderMeadConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Box bound on every AR and MA coefficient during the search
const COEFFICIENT_BOUND: f64 = 0.99;

/// ARIMA model specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaSpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaSpec {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// AR + MA coefficients plus the intercept
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct Arima {
    name: String,
    spec: ArimaSpec,
    optimizer: NelderMeadConfig,
}

impl Arima {
    /// Create a new ARIMA(p, d, q) model
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > 10 || q > 10 {
            return Err(ForecastError::InvalidParameter(format!(
                "AR and MA orders must be <= 10, got ({}, {})",
                p, q
            )));
        }
        if d > 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "differencing order must be <= 2, got {}",
                d
            )));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            spec: ArimaSpec::new(p, d, q),
            optimizer: NelderMeadConfig::default(),
        })
    }

    /// Replace the stopping rules of the parameter search
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn spec(&self) -> ArimaSpec {
        self.spec
    }

    /// Conditional sum of squares for one parameter vector
    fn css(diff: &[f64], spec: ArimaSpec, intercept: f64, ar: &[f64], ma: &[f64]) -> f64 {
        let start = spec.p.max(spec.q);
        if diff.len() <= start {
            return f64::MAX;
        }
        let neg_ma: Vec<f64> = ma.iter().map(|m| -m).collect();
        if !is_stationary(ar) || !is_stationary(&neg_ma) {
            return f64::INFINITY;
        }

        let mut residuals = vec![0.0; diff.len()];
        let mut css = 0.0;
        for t in start..diff.len() {
            let error = diff[t] - one_step(diff, &residuals, t, intercept, ar, ma);
            residuals[t] = error;
            css += error * error;
        }

        css
    }

    /// Estimate (intercept, AR, MA) for the differenced series
    fn estimate(&self, diff: &[f64]) -> Result<(f64, Vec<f64>, Vec<f64>, usize)> {
        let ArimaSpec { p, q, .. } = self.spec;
        let mean = diff.iter().sum::<f64>() / diff.len() as f64;

        if p == 0 && q == 0 {
            return Ok((mean, Vec::new(), Vec::new(), 0));
        }

        let mut initial = vec![mean];
        initial.extend((0..p).map(|i| 0.1 / (i + 1) as f64));
        initial.extend((0..q).map(|i| 0.1 / (i + 1) as f64));

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-COEFFICIENT_BOUND, COEFFICIENT_BOUND)).take(p + q));

        let spec = self.spec;
        let result = nelder_mead(
            |params| Self::css(diff, spec, params[0], &params[1..1 + p], &params[1 + p..]),
            &initial,
            Some(&bounds),
            self.optimizer,
        );

        if !result.converged {
            return Err(ForecastError::ModelFitFailure(format!(
                "{} parameter search did not converge after {} iterations",
                self.name, result.iterations
            )));
        }
        if !result.optimal_value.is_finite() {
            return Err(ForecastError::ModelFitFailure(format!(
                "{} objective is not finite at the optimum",
                self.name
            )));
        }

        let point = result.optimal_point;
        Ok((
            point[0],
            point[1..1 + p].to_vec(),
            point[1 + p..].to_vec(),
            result.iterations,
        ))
    }
}

/// Whether `1 - c[0] z - c[1] z^2 - ...` has all roots outside the unit circle.
///
/// Steps the coefficients down to partial autocorrelations, each of which
/// must lie strictly inside (-1, 1).
fn is_stationary(coefficients: &[f64]) -> bool {
    let mut current = coefficients.to_vec();
    while let Some(&last) = current.last() {
        if !(last.abs() < 1.0) {
            return false;
        }
        let k = current.len() - 1;
        let denom = 1.0 - last * last;
        current = (0..k)
            .map(|j| (current[j] + last * current[k - 1 - j]) / denom)
            .collect();
    }
    true
}

/// One-step prediction of `diff[t]` from everything before it
fn one_step(
    diff: &[f64],
    residuals: &[f64],
    t: usize,
    intercept: f64,
    ar: &[f64],
    ma: &[f64],
) -> f64 {
    let mut pred = intercept;
    for (i, coef) in ar.iter().enumerate() {
        if t > i {
            pred += coef * (diff[t - 1 - i] - intercept);
        }
    }
    for (i, coef) in ma.iter().enumerate() {
        if t > i {
            pred += coef * residuals[t - 1 - i];
        }
    }
    pred
}

impl ForecastModel for Arima {
    type Trained = TrainedArima;

    fn train(&self, values: &[f64]) -> Result<TrainedArima> {
        let required = self.min_observations();
        if values.len() < required {
            return Err(ForecastError::insufficient(
                required,
                values.len(),
                format!("fitting {}", self.name),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFitFailure(format!(
                "{} input contains non-finite values",
                self.name
            )));
        }

        let diff = difference(values, self.spec.d)?;
        let (intercept, ar, ma, iterations) = self.estimate(&diff)?;

        let start = self.spec.p.max(self.spec.q);
        let mut residuals = vec![0.0; diff.len()];
        for t in start..diff.len() {
            residuals[t] = diff[t] - one_step(&diff, &residuals, t, intercept, &ar, &ma);
        }

        let n_eff = (diff.len() - start) as f64;
        let residual_variance = residuals[start..].iter().map(|r| r * r).sum::<f64>() / n_eff;
        let k = self.spec.num_params() as f64;
        let log_likelihood =
            -0.5 * n_eff * (1.0 + residual_variance.ln() + (2.0 * std::f64::consts::PI).ln());

        debug!(
            model = %self.name,
            intercept,
            ?ar,
            ?ma,
            iterations,
            residual_variance,
            "fitted model"
        );

        Ok(TrainedArima {
            name: self.name.clone(),
            spec: self.spec,
            intercept,
            ar_coefficients: ar,
            ma_coefficients: ma,
            history: values.to_vec(),
            differenced: diff,
            residuals,
            residual_variance,
            aic: -2.0 * log_likelihood + 2.0 * k,
            bic: -2.0 * log_likelihood + k * n_eff.ln(),
            iterations,
        })
    }

    fn min_observations(&self) -> usize {
        self.spec.d + self.spec.p.max(self.spec.q) + 2
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArima {
    name: String,
    spec: ArimaSpec,
    intercept: f64,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Training data on the original scale
    history: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    residual_variance: f64,
    aic: f64,
    bic: f64,
    iterations: usize,
}

impl TrainedArima {
    pub fn spec(&self) -> ArimaSpec {
        self.spec
    }

    /// Intercept on the differenced scale
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// Simplex iterations the parameter search used
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl TrainedForecastModel for TrainedArima {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let mut extended = self.differenced.clone();
        let mut residuals = self.residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let pred = one_step(
                &extended,
                &residuals,
                t,
                self.intercept,
                &self.ar_coefficients,
                &self.ma_coefficients,
            );
            extended.push(pred);
            // Future shocks have zero expectation.
            residuals.push(0.0);
        }

        let forecast_diff = &extended[self.differenced.len()..];
        let forecast = integrate(forecast_diff, &self.history, self.spec.d)?;

        if forecast.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFitFailure(format!(
                "{} produced a non-finite forecast",
                self.name
            )));
        }

        Ok(forecast)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
