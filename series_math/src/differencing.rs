//! Differencing and its inverse

use crate::{MathError, Result};

/// Apply `order` successive first differences.
///
/// Each pass shortens the series by one value.
pub fn difference(data: &[f64], order: usize) -> Result<Vec<f64>> {
    if data.len() <= order {
        return Err(MathError::insufficient(
            order + 1,
            data.len(),
            format!("differencing {} times", order),
        ));
    }

    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }

    Ok(result)
}

/// Undo `order` differences for values that continue `history`.
///
/// `diffs` are values on the `order`-times differenced scale that follow the
/// end of `history`; the result is on the scale of `history`.
pub fn integrate(diffs: &[f64], history: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(diffs.to_vec());
    }
    if history.len() < order {
        return Err(MathError::insufficient(
            order,
            history.len(),
            format!("integrating {} times", order),
        ));
    }

    // levels[k] is the history differenced k times.
    let mut levels = Vec::with_capacity(order);
    let mut current = history.to_vec();
    for _ in 0..order {
        let next: Vec<f64> = current.windows(2).map(|w| w[1] - w[0]).collect();
        levels.push(current);
        current = next;
    }

    let mut result = diffs.to_vec();
    for level in levels.iter().rev() {
        let mut last = match level.last() {
            Some(value) => *value,
            None => {
                return Err(MathError::insufficient(1, 0, "differencing level"))
            }
        };
        for value in result.iter_mut() {
            last += *value;
            *value = last;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_difference() {
        let diffs = difference(&[1.0, 4.0, 9.0, 16.0], 1).unwrap();
        assert_eq!(diffs, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_second_difference() {
        let diffs = difference(&[1.0, 4.0, 9.0, 16.0], 2).unwrap();
        assert_eq!(diffs, vec![2.0, 2.0]);
        assert!(difference(&[1.0, 2.0], 2).is_err());
    }

    #[test]
    fn test_integrate_inverts_difference() {
        let series = vec![1.0, 4.0, 9.0, 16.0, 25.0, 36.0];
        for order in 0..=2 {
            let (history, future) = series.split_at(3);
            let full_diffs = difference(&series, order).unwrap();
            let future_diffs = &full_diffs[full_diffs.len() - future.len()..];

            let restored = integrate(future_diffs, history, order).unwrap();
            for (r, f) in restored.iter().zip(future) {
                assert_relative_eq!(*r, *f, epsilon = 1e-12);
            }
        }
    }
}
