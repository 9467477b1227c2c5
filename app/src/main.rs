// In app/src/main.rs

use anyhow::Result;
use app_config::Settings;
use chart::ChartOptions;
use clap::{Args, Parser, Subcommand};
use core_types::{CandleSeries, Symbol};
use std::path::PathBuf;
use strategies::BandReversion;
use tracing_subscriber::prelude::*;

mod pipeline;
use crate::pipeline::{ScanReport, analyze, print_report};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Scans hourly candles for moving-average band signals.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetches klines from Binance and scans them for signals.
    Scan {
        /// The trading symbol to scan (e.g., "BTCUSDT").
        #[arg(short, long)]
        symbol: Option<String>,

        /// The kline interval (e.g., "1h").
        #[arg(short, long)]
        interval: Option<String>,

        /// Number of klines to request.
        #[arg(long)]
        limit: Option<u16>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Scans klines previously saved from the klines endpoint.
    Replay {
        /// JSON file holding the raw kline array.
        #[arg(short, long)]
        file: PathBuf,

        /// Symbol used to title the output.
        #[arg(short, long)]
        symbol: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory for the chart file; overrides the configured one.
    #[arg(long)]
    chart_out: Option<PathBuf>,

    /// Skip writing the chart.
    #[arg(long)]
    no_chart: bool,

    /// Leave buy markers off the chart.
    #[arg(long)]
    no_buy: bool,

    /// Leave sell markers off the chart.
    #[arg(long)]
    no_sell: bool,

    /// Print signals as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Application settings loaded successfully.");

    let strategy = BandReversion::new(settings.strategy.clone());

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Scan { symbol, interval, limit, output } => {
            let symbol = Symbol(symbol.unwrap_or_else(|| settings.scan.symbol.clone()));
            let interval = interval.unwrap_or_else(|| settings.scan.interval.clone());
            let limit = limit.or(settings.scan.limit);

            let client = api_client::new(&settings.binance)?;
            let series = client.fetch_series(&symbol, &interval, limit).await?;
            let report = analyze(symbol, series, &strategy)?;
            emit(&report, &output, &settings)?;
        }
        Commands::Replay { file, symbol, output } => {
            let symbol = Symbol(symbol.unwrap_or_else(|| settings.scan.symbol.clone()));
            let rows = api_client::read_klines_file(&file)?;
            let series = CandleSeries::from_rows(&rows)?;
            let report = analyze(symbol, series, &strategy)?;
            emit(&report, &output, &settings)?;
        }
    }

    tracing::info!("Scan completed successfully.");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("reqwest", tracing::Level::WARN)
            .with_target("hyper", tracing::Level::WARN)
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Prints the summary and, unless disabled, writes the chart.
fn emit(report: &ScanReport, output: &OutputArgs, settings: &Settings) -> Result<()> {
    print_report(report, output.json);

    if output.no_chart || !settings.chart.enabled {
        return Ok(());
    }
    let options = ChartOptions {
        include_buy: settings.chart.include_buy && !output.no_buy,
        include_sell: settings.chart.include_sell && !output.no_sell,
    };
    let dir = output
        .chart_out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.chart.output_dir));
    let path = chart::render(&report.symbol, &report.series, &report.signals, &options, dir)?;
    tracing::info!(path = %path.display(), "Chart saved.");
    Ok(())
}
