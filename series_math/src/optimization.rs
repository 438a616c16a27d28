//! Derivative-free minimisation
//!
//! Nelder-Mead simplex search with optional box bounds. Every step is a pure
//! function of the objective values, so identical inputs always follow the
//! same path.

use serde::{Deserialize, Serialize};

/// Nelder-Mead stopping rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadConfig {
    /// Maximum number of simplex iterations
    pub max_iter: usize,
    /// Simplex diameter below which the search may stop
    pub xtol: f64,
    /// Spread of objective values, relative to `1 + |best|`, below which the
    /// search may stop
    pub ftol: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            xtol: 1e-6,
            ftol: 1e-8,
        }
    }
}

/// Outcome of a Nelder-Mead search
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found
    pub optimal_point: Vec<f64>,
    /// Objective at `optimal_point`
    pub optimal_value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the stopping rules were met before `max_iter`
    pub converged: bool,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimise `objective` starting from `initial`.
///
/// When `bounds` is given every trial point is clamped into it.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    let clamp = |point: &mut Vec<f64>| {
        if let Some(bounds) = bounds {
            for (value, (lo, hi)) in point.iter_mut().zip(bounds) {
                *value = value.clamp(*lo, *hi);
            }
        }
    };
    let eval = |point: &[f64]| {
        let value = objective(point);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let mut start = initial.to_vec();
    clamp(&mut start);

    if dim == 0 {
        let optimal_value = eval(&start);
        return NelderMeadResult {
            optimal_point: start,
            optimal_value,
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(start.clone());
    for i in 0..dim {
        let mut vertex = start.clone();
        vertex[i] = if vertex[i] != 0.0 {
            vertex[i] * 1.05
        } else {
            0.00025
        };
        clamp(&mut vertex);
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let best = values[0];
        let worst = values[dim];
        let spread = (worst - best).abs();
        let diameter = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);
        let scale = 1.0 + best.abs();
        // A simplex whose values agree to machine precision cannot make
        // further progress, however wide it still is.
        if best.is_finite()
            && ((diameter <= config.xtol && spread <= config.ftol * scale)
                || spread <= f64::EPSILON * scale)
        {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid: Vec<f64> = (0..dim)
            .map(|j| simplex[..dim].iter().map(|v| v[j]).sum::<f64>() / dim as f64)
            .collect();
        let towards = |coef: f64| -> Vec<f64> {
            let mut point: Vec<f64> = centroid
                .iter()
                .zip(&simplex[dim])
                .map(|(c, w)| c + coef * (c - w))
                .collect();
            clamp(&mut point);
            point
        };

        let reflected = towards(REFLECTION);
        let reflected_value = eval(&reflected);

        if reflected_value < values[0] {
            let expanded = towards(REFLECTION * EXPANSION);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex[dim] = expanded;
                values[dim] = expanded_value;
            } else {
                simplex[dim] = reflected;
                values[dim] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[dim - 1] {
            simplex[dim] = reflected;
            values[dim] = reflected_value;
            continue;
        }

        let (contracted, contracted_value) = if reflected_value < values[dim] {
            let point = towards(REFLECTION * CONTRACTION);
            let value = eval(&point);
            (point, value)
        } else {
            let point = towards(-CONTRACTION);
            let value = eval(&point);
            (point, value)
        };

        if contracted_value < values[dim].min(reflected_value) {
            simplex[dim] = contracted;
            values[dim] = contracted_value;
            continue;
        }

        for i in 1..=dim {
            let mut point: Vec<f64> = simplex[0]
                .iter()
                .zip(&simplex[i])
                .map(|(b, v)| b + SHRINK * (v - b))
                .collect();
            clamp(&mut point);
            values[i] = eval(&point);
            simplex[i] = point;
        }
    }

    let best_idx = (0..=dim)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best_idx].clone(),
        optimal_value: values[best_idx],
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_bowl() {
        let result = nelder_mead(
            |p| (p[0] - 1.0).powi(2) + 2.0 * (p[1] + 0.5).powi(2),
            &[0.0, 0.0],
            None,
            NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(result.optimal_point[1], -0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_bounds_are_respected() {
        let bounds = [(-0.99, 0.99)];
        let result = nelder_mead(
            |p| (p[0] - 3.0).powi(2),
            &[0.0],
            Some(&bounds),
            NelderMeadConfig::default(),
        );

        assert!(result.optimal_point[0] <= 0.99);
        assert_relative_eq!(result.optimal_point[0], 0.99, epsilon = 1e-6);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let config = NelderMeadConfig {
            max_iter: 2,
            ..Default::default()
        };
        let result = nelder_mead(
            |p| (p[0] - 10.0).powi(2) + (p[1] - 10.0).powi(2),
            &[0.0, 0.0],
            None,
            config,
        );

        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn test_deterministic_path() {
        let f = |p: &[f64]| (p[0] * p[0] - p[1]).powi(2) + (1.0 - p[0]).powi(2);
        let a = nelder_mead(f, &[-1.2, 1.0], None, NelderMeadConfig::default());
        let b = nelder_mead(f, &[-1.2, 1.0], None, NelderMeadConfig::default());
        assert_eq!(a.optimal_point, b.optimal_point);
        assert_eq!(a.iterations, b.iterations);
    }
}
