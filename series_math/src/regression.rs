//! Ordinary least squares
//!
//! A small dense OLS solver for the handful of regressors a unit-root
//! regression needs. Design matrices are passed row-major.

use crate::{MathError, Result};

/// Result of an ordinary least squares fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients, one per regressor column
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Number of observations
    pub n_obs: usize,
}

impl OlsFit {
    /// Number of estimated coefficients
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// t statistic of coefficient `idx`
    pub fn t_value(&self, idx: usize) -> Option<f64> {
        let coef = self.coefficients.get(idx)?;
        let se = self.std_errors.get(idx)?;
        Some(coef / se)
    }

    /// Gaussian log-likelihood evaluated at the estimates
    pub fn log_likelihood(&self) -> f64 {
        let n = self.n_obs as f64;
        -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// Akaike information criterion
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.n_params() as f64
    }
}

/// Fit `y = X b + e` by least squares.
///
/// `rows[i]` holds the regressors of observation `i`; every row must have the
/// same width and there must be more observations than regressors.
pub fn ols(y: &[f64], rows: &[Vec<f64>]) -> Result<OlsFit> {
    let n = y.len();
    if rows.len() != n {
        return Err(MathError::InvalidInput(format!(
            "Design matrix has {} rows but response has {} values",
            rows.len(),
            n
        )));
    }
    let k = rows.first().map(|r| r.len()).unwrap_or(0);
    if k == 0 {
        return Err(MathError::InvalidInput(
            "Design matrix has no columns".to_string(),
        ));
    }
    if rows.iter().any(|r| r.len() != k) {
        return Err(MathError::InvalidInput(
            "Design matrix rows have different widths".to_string(),
        ));
    }
    if n <= k {
        return Err(MathError::insufficient(
            k + 1,
            n,
            format!("OLS with {} regressors", k),
        ));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &target) in rows.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in i..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
    }

    let inverse = invert(&xtx)?;
    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| inverse[i][j] * xty[j]).sum())
        .collect();

    let ssr: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, &target)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            (target - fitted).powi(2)
        })
        .sum();

    let sigma2 = ssr / (n - k) as f64;
    let std_errors = (0..k).map(|i| (sigma2 * inverse[i][i]).sqrt()).collect();

    Ok(OlsFit {
        coefficients,
        std_errors,
        ssr,
        n_obs: n,
    })
}

/// Gauss-Jordan inversion with partial pivoting
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let k = matrix.len();
    let scale = matrix
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Err(MathError::CalculationError(
            "Singular design matrix".to_string(),
        ));
    }

    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col].abs() <= scale * 1e-12 {
            return Err(MathError::CalculationError(
                "Singular design matrix".to_string(),
            ));
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..k {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
        let rows: Vec<Vec<f64>> = x.iter().map(|&v| vec![1.0, v]).collect();

        let fit = ols(&y, &rows).unwrap();
        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(fit.coefficients[1], 3.0, epsilon = 1e-9);
        assert!(fit.ssr < 1e-12);
    }

    #[test]
    fn test_standard_errors_with_noise() {
        let x: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let noise = [0.1, -0.1, 0.05, -0.05, 0.1, -0.1];
        let y: Vec<f64> = x.iter().zip(noise).map(|(v, e)| 1.0 + v + e).collect();
        let rows: Vec<Vec<f64>> = x.iter().map(|&v| vec![1.0, v]).collect();

        let fit = ols(&y, &rows).unwrap();
        assert!(fit.std_errors.iter().all(|se| *se > 0.0 && se.is_finite()));
        assert!(fit.t_value(1).unwrap() > 10.0);
        assert!(fit.aic().is_finite());
    }

    #[test]
    fn test_collinear_columns_are_rejected() {
        let rows: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(matches!(ols(&y, &rows), Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_too_few_observations() {
        let rows = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        assert!(matches!(
            ols(&[1.0, 2.0], &rows),
            Err(MathError::InsufficientData {
                required: 3,
                actual: 2,
                ..
            })
        ));
    }
}
