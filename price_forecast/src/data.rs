//! Price series types and loaders

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One dated value of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Observed or derived value
    pub value: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Read access shared by every date-indexed series in the pipeline
pub trait Series {
    /// Points in increasing date order
    fn points(&self) -> &[PricePoint];

    /// Values without their dates
    fn values(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.value).collect()
    }

    /// Dates without their values
    fn dates(&self) -> Vec<NaiveDate> {
        self.points().iter().map(|p| p.date).collect()
    }

    /// Date of the newest point
    fn last_date(&self) -> Option<NaiveDate> {
        self.points().last().map(|p| p.date)
    }

    /// Number of points
    fn len(&self) -> usize {
        self.points().len()
    }

    /// Check if the series is empty
    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// Daily closing prices of a single ticker
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, checking ordering and value invariants
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(ForecastError::DataUnavailable(
                "price series has no points".to_string(),
            ));
        }
        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::InvalidParameter(format!(
                "dates must be strictly increasing: {} is followed by {}",
                w[0].date, w[1].date
            )));
        }
        if let Some(p) = points.iter().find(|p| !(p.value.is_finite() && p.value > 0.0)) {
            return Err(ForecastError::InvalidParameter(format!(
                "close on {} must be a positive finite number, got {}",
                p.date, p.value
            )));
        }

        Ok(Self { points })
    }

    /// Build a series of consecutive calendar days starting at `start`
    pub fn from_values(start: NaiveDate, values: &[f64]) -> Result<Self> {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| PricePoint::new(start + Duration::days(i as i64), value))
            .collect();
        Self::new(points)
    }

    /// Mean of the last `window` closes (all of them if the series is shorter)
    pub fn trailing_mean(&self, window: usize) -> Option<f64> {
        let start = self.points.len().saturating_sub(window);
        series_math::mean(&self.values()[start..])
    }
}

impl Series for PriceSeries {
    fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

/// Rolling-mean of a [`PriceSeries`], shorter by the smoothing warm-up
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries {
    points: Vec<PricePoint>,
    window: usize,
}

impl SmoothedSeries {
    pub(crate) fn new(points: Vec<PricePoint>, window: usize) -> Self {
        Self { points, window }
    }

    /// Window the series was smoothed with
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Series for SmoothedSeries {
    fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

/// Source of closing-price series
pub trait SeriesLoader {
    /// Load the trailing window of closes for `ticker`
    fn load(&self, ticker: &str) -> Result<PriceSeries>;
}

/// Normalize a ticker the way the dashboard input does
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "ticker must not be empty".to_string(),
        ));
    }
    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(ForecastError::InvalidParameter(format!(
            "ticker '{}' contains unsupported characters",
            ticker
        )));
    }
    Ok(ticker)
}

/// Loads `<data_dir>/<TICKER>.csv` files of daily bars
#[derive(Debug, Clone)]
pub struct CsvSeriesLoader {
    data_dir: PathBuf,
    lookback_days: i64,
}

impl CsvSeriesLoader {
    /// Create a loader over `data_dir` keeping `lookback_days` of history
    pub fn new<P: AsRef<Path>>(data_dir: P, lookback_days: i64) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            lookback_days,
        }
    }

    /// Directory the loader reads from
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read every usable row of a CSV file, without the lookback filter
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ForecastError::DataUnavailable(format!(
                    "no data file at {}",
                    path.display()
                )))
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let names: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let date_idx = detect_date_column(&names).ok_or_else(|| {
            ForecastError::DataUnavailable(format!("no date column in {}", path.display()))
        })?;
        let close_idx = detect_close_column(&names).ok_or_else(|| {
            ForecastError::DataUnavailable(format!("no close column in {}", path.display()))
        })?;

        // BTreeMap sorts by date and keeps the last row of a duplicated date.
        let mut rows = BTreeMap::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            let date = record.get(date_idx).and_then(|s| parse_date(s).ok());
            let close = record
                .get(close_idx)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0);
            match (date, close) {
                (Some(date), Some(close)) => {
                    rows.insert(date, close);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(path = %path.display(), skipped, "skipped unusable rows");
        }

        Ok(rows
            .into_iter()
            .map(|(date, value)| PricePoint::new(date, value))
            .collect())
    }
}

impl SeriesLoader for CsvSeriesLoader {
    fn load(&self, ticker: &str) -> Result<PriceSeries> {
        let ticker = normalize_ticker(ticker)?;
        let path = self.data_dir.join(format!("{}.csv", ticker));
        let points = Self::read_csv(&path)?;

        let newest = match points.last() {
            Some(p) => p.date,
            None => {
                return Err(ForecastError::DataUnavailable(format!(
                    "no rows for {}",
                    ticker
                )))
            }
        };
        let cutoff = newest - Duration::days(self.lookback_days);
        let points: Vec<PricePoint> = points.into_iter().filter(|p| p.date >= cutoff).collect();

        debug!(%ticker, rows = points.len(), %cutoff, "loaded price series");
        PriceSeries::new(points)
    }
}

/// In-memory loader, keyed by upper-cased ticker
#[derive(Debug, Clone, Default)]
pub struct MemorySeriesLoader {
    series: HashMap<String, PriceSeries>,
}

impl MemorySeriesLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series for `ticker`
    pub fn insert(&mut self, ticker: &str, series: PriceSeries) -> Result<()> {
        self.series.insert(normalize_ticker(ticker)?, series);
        Ok(())
    }
}

impl SeriesLoader for MemorySeriesLoader {
    fn load(&self, ticker: &str) -> Result<PriceSeries> {
        let ticker = normalize_ticker(ticker)?;
        self.series
            .get(&ticker)
            .cloned()
            .ok_or_else(|| ForecastError::DataUnavailable(format!("no series for {}", ticker)))
    }
}

/// Parse a date cell in one of the formats price exports use
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    // Date-times with offsets, e.g. "2024-01-02 00:00:00-05:00"
    if let Some(prefix) = s.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(date);
        }
    }

    Err(ForecastError::InvalidParameter(format!(
        "unrecognized date '{}'",
        s
    )))
}

fn detect_date_column(names: &[String]) -> Option<usize> {
    names
        .iter()
        .position(|n| n.contains("date") || n.contains("time"))
}

fn detect_close_column(names: &[String]) -> Option<usize> {
    names
        .iter()
        .position(|n| n == "close")
        .or_else(|| names.iter().position(|n| n.contains("close")))
        .or_else(|| names.iter().position(|n| n.contains("price")))
}
