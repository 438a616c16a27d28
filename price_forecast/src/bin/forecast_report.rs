//! # forecast_report
//!
//! Prints the 30-day forecast of one ticker from a directory of CSV exports.

use clap::Parser;
use price_forecast::{CsvSeriesLoader, ForecastPipeline, PipelineConfig, Series};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "forecast_report")]
#[command(about = "Forecast a ticker's closing price 30 days ahead", long_about = None)]
struct Args {
    /// Directory holding <TICKER>.csv files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Ticker symbol
    #[arg(short, long, default_value = "TSLA")]
    ticker: String,

    /// JSON pipeline configuration (defaults apply to missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print this many points of smoothed history followed by the forecast
    #[arg(long)]
    history: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "price_forecast=info".into()),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Forecasting failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> price_forecast::Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    let loader = CsvSeriesLoader::new(&args.data_dir, config.lookback_days);
    let pipeline = ForecastPipeline::new(config)?;
    let report = pipeline.run_ticker(&loader, &args.ticker)?;

    let ticker = report.ticker.as_deref().unwrap_or(&args.ticker);
    println!("{}-day forecast for {}", report.forecast.len(), ticker);
    println!("  Differencing order: {}", report.order());
    println!("  RMSE (scaled):      {:.4}", report.evaluation.rmse);
    println!("  RMSE (price):       {:.2}", report.price_rmse);
    if let Some(rel) = report.relative_rmse {
        println!("  Relative RMSE:      {:.2}%", rel);
    }

    println!();
    println!("{:<12} {:>10}", "Date", "Close");
    for point in report.forecast.points() {
        println!("{:<12} {:>10.2}", point.date.to_string(), point.value);
    }

    if let Some(n) = args.history {
        println!();
        println!("History and forecast (last {} points)", n);
        for point in report.history_with_forecast(n) {
            println!("{:<12} {:>10.2}", point.date.to_string(), point.value);
        }
    }

    Ok(())
}
