// In app/src/pipeline.rs

use chrono::DateTime;
use core_types::{CandleSeries, Result, SignalKind, Signals, Symbol};
use serde::Serialize;
use strategies::Strategy;

/// Everything one scan produced: the series with its averages, and the signals.
#[derive(Debug)]
pub struct ScanReport {
    pub symbol: Symbol,
    pub series: CandleSeries,
    pub signals: Signals,
}

/// Attaches the strategy's averages to the series and scans it.
///
/// Nothing is returned on failure, so a caller never sees a partial signal list.
pub fn analyze(symbol: Symbol, mut series: CandleSeries, strategy: &dyn Strategy) -> Result<ScanReport> {
    tracing::info!(symbol = %symbol, candles = series.len(), strategy = strategy.name(), "Scanning series.");
    strategy.prepare(&mut series)?;
    let signals = strategy.detect(&series)?;
    tracing::info!(
        symbol = %symbol,
        buys = signals.buys.len(),
        sells = signals.sells.len(),
        "Scan finished."
    );
    Ok(ScanReport { symbol, series, signals })
}

#[derive(Debug, Serialize)]
struct SignalLine {
    time: String,
    kind: SignalKind,
    price: rust_decimal::Decimal,
}

fn format_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn lines(signals: &Signals) -> Vec<SignalLine> {
    signals
        .merged()
        .into_iter()
        .map(|e| SignalLine { time: format_time(e.time), kind: e.kind, price: e.price })
        .collect()
}

/// Helper function to print the scan summary.
pub fn print_report(report: &ScanReport, as_json: bool) {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&lines(&report.signals)).unwrap_or_default());
        return;
    }

    println!("\n--- {} ---", report.symbol);
    println!(
        "Candles: {} ({} .. {})",
        report.series.len(),
        format_time(report.series.first().time),
        format_time(report.series.last().time)
    );
    println!(
        "Signals: {} buy, {} sell",
        report.signals.buys.len(),
        report.signals.sells.len()
    );
    if report.signals.is_empty() {
        println!("No signals detected.");
        return;
    }
    for line in lines(&report.signals) {
        println!("  {}  {:<4}  {}", line.time, format!("{:?}", line.kind).to_uppercase(), line.price);
    }
}
