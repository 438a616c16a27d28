//! Synthetic price series shared by the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use price_forecast::PriceSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

/// `start + drift * t + cumulative N(0, 1) shocks`
pub fn random_walk_with_drift(n: usize, start: f64, drift: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut level = start;
    (0..n)
        .map(|_| {
            level += drift + normal.sample(&mut rng);
            level
        })
        .collect()
}

/// Independent N(level, sd^2) draws
pub fn white_noise(n: usize, level: f64, sd: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(level, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

pub fn series(values: &[f64]) -> PriceSeries {
    PriceSeries::from_values(start_date(), values).unwrap()
}

/// 250 daily closes starting near 100 with an upward drift
pub fn drifting_prices() -> PriceSeries {
    series(&random_walk_with_drift(250, 100.0, 0.3, 42))
}
