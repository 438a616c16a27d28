use chrono::NaiveDate;
use price_forecast::data::{parse_date, CsvSeriesLoader, MemorySeriesLoader, PricePoint};
use price_forecast::{ForecastError, PriceSeries, Series, SeriesLoader};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Helper function to write a price export into a temporary data directory
fn write_csv(dir: &TempDir, ticker: &str, body: &str) {
    let mut file = fs::File::create(dir.path().join(format!("{}.csv", ticker))).unwrap();
    write!(file, "{}", body).unwrap();
}

#[test]
fn test_price_series_invariants() {
    let series = PriceSeries::from_values(date(2024, 1, 1), &[100.0, 101.0, 99.5]).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.last_date(), Some(date(2024, 1, 3)));
    assert_eq!(series.values(), vec![100.0, 101.0, 99.5]);

    let empty = PriceSeries::new(Vec::new());
    assert!(matches!(empty, Err(ForecastError::DataUnavailable(_))));

    let unordered = PriceSeries::new(vec![
        PricePoint::new(date(2024, 1, 2), 1.0),
        PricePoint::new(date(2024, 1, 1), 1.0),
    ]);
    assert!(matches!(unordered, Err(ForecastError::InvalidParameter(_))));

    let duplicate = PriceSeries::new(vec![
        PricePoint::new(date(2024, 1, 1), 1.0),
        PricePoint::new(date(2024, 1, 1), 2.0),
    ]);
    assert!(duplicate.is_err());

    let negative = PriceSeries::from_values(date(2024, 1, 1), &[1.0, -1.0]);
    assert!(negative.is_err());

    let nan = PriceSeries::from_values(date(2024, 1, 1), &[1.0, f64::NAN]);
    assert!(nan.is_err());
}

#[test]
fn test_trailing_mean() {
    let series = PriceSeries::from_values(date(2024, 1, 1), &[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(series.trailing_mean(2), Some(3.5));
    assert_eq!(series.trailing_mean(30), Some(2.5));
}

#[test]
fn test_csv_loader_reads_close_column() {
    let dir = TempDir::new().unwrap();
    write_csv(
        &dir,
        "AAPL",
        "Date,Open,High,Low,Close,Adj Close,Volume\n\
         2024-01-03,10,11,9,10.5,10.4,1000\n\
         2024-01-02,10,11,9,10.0,9.9,1000\n\
         2024-01-04,10,11,9,,10.6,1000\n\
         2024-01-05,10,11,9,11.0,10.9,1000\n",
    );

    let loader = CsvSeriesLoader::new(dir.path(), 365);
    let series = loader.load(" aapl ").unwrap();

    // Rows are sorted by date and the blank close is skipped.
    assert_eq!(series.dates(), vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 5)]);
    assert_eq!(series.values(), vec![10.0, 10.5, 11.0]);
}

#[test]
fn test_csv_loader_applies_lookback_and_dedups() {
    let dir = TempDir::new().unwrap();
    write_csv(
        &dir,
        "MSFT",
        "date,price\n\
         2023-01-01,50.0\n\
         2023-12-20,60.0\n\
         2023-12-30,61.0\n\
         2023-12-30,62.0\n\
         2024-01-01,63.0\n",
    );

    let loader = CsvSeriesLoader::new(dir.path(), 30);
    let series = loader.load("MSFT").unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.points()[0], PricePoint::new(date(2023, 12, 20), 60.0));
    assert_eq!(series.points()[1].value, 62.0);
}

#[test]
fn test_csv_loader_errors() {
    let dir = TempDir::new().unwrap();
    write_csv(&dir, "EMPTY", "Date,Close\n");
    let loader = CsvSeriesLoader::new(dir.path(), 365);

    assert!(matches!(
        loader.load("MISSING"),
        Err(ForecastError::DataUnavailable(_))
    ));
    assert!(matches!(
        loader.load("EMPTY"),
        Err(ForecastError::DataUnavailable(_))
    ));
    assert!(matches!(
        loader.load("   "),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(matches!(
        loader.load("../etc/passwd"),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_memory_loader() {
    let series = PriceSeries::from_values(date(2024, 1, 1), &[1.0, 2.0]).unwrap();
    let mut loader = MemorySeriesLoader::new();
    loader.insert("ibm", series.clone()).unwrap();

    assert_eq!(loader.load("IBM").unwrap(), series);
    assert!(matches!(
        loader.load("NFLX"),
        Err(ForecastError::DataUnavailable(_))
    ));
}

#[rstest]
#[case("2023-01-15", date(2023, 1, 15))]
#[case("01/15/2023", date(2023, 1, 15))]
#[case("2023-01-15T14:30:45", date(2023, 1, 15))]
#[case("2023-01-15 00:00:00-05:00", date(2023, 1, 15))]
fn test_date_parser(#[case] input: &str, #[case] expected: NaiveDate) {
    assert_eq!(parse_date(input).unwrap(), expected);
}

#[test]
fn test_date_parser_rejects_garbage() {
    assert!(parse_date("not-a-date").is_err());
}
