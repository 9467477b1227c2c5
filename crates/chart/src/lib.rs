// In crates/chart/src/lib.rs

use chrono::DateTime;
use core_types::{CandleSeries, MovingAverageSeries, SignalEvent, Signals, Symbol};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ChartOptions, Figure, Mode, Trace};

pub const CANDLE_TRACE: &str = "Candlesticks chart";
pub const SLOW_MA_TRACE: &str = "Slow MA";
pub const FAST_MA_TRACE: &str = "Fast MA";
pub const BUY_TRACE: &str = "BUY SIGNALS";
pub const SELL_TRACE: &str = "SELL SIGNALS";

const FAST_MA_COLOR: &str = "rgba(102,207,255,50)";
const SLOW_MA_COLOR: &str = "rgba(255,207,102,50)";
const BUY_COLOR: &str = "rgba(255,0,255,50)";
const SELL_COLOR: &str = "rgba(255,255,0,50)";

/// Sell markers are drawn 2% above the high so they don't sit on the wick.
/// Display only; the event price itself is untouched.
const SELL_MARKER_OFFSET: Decimal = dec!(1.02);

/// Builds the figure for a series and its signals.
///
/// Trace order: candles, slow MA, fast MA, buy markers, sell markers.
/// Average traces are only present once averages are attached, and a marker
/// trace only when its option is on and at least one event of its kind exists.
pub fn build_figure(
    symbol: &Symbol,
    series: &CandleSeries,
    signals: &Signals,
    options: &ChartOptions,
) -> Figure {
    let x: Vec<String> = series.times().into_iter().map(format_time).collect();
    let mut traces = vec![Trace::Candlestick {
        name: CANDLE_TRACE.to_string(),
        x: x.clone(),
        open: to_f64s(&series.opens()),
        high: to_f64s(&series.highs()),
        low: to_f64s(&series.lows()),
        close: to_f64s(&series.closes()),
    }];

    if let Some(slow) = series.slow_ma() {
        traces.push(average_trace(SLOW_MA_TRACE, SLOW_MA_COLOR, &x, slow));
    }
    if let Some(fast) = series.fast_ma() {
        traces.push(average_trace(FAST_MA_TRACE, FAST_MA_COLOR, &x, fast));
    }
    if options.include_buy && !signals.buys.is_empty() {
        traces.push(marker_trace(BUY_TRACE, BUY_COLOR, &signals.buys, Decimal::ONE));
    }
    if options.include_sell && !signals.sells.is_empty() {
        traces.push(marker_trace(SELL_TRACE, SELL_COLOR, &signals.sells, SELL_MARKER_OFFSET));
    }

    Figure { title: symbol.0.clone(), traces }
}

/// Writes the figure as pretty-printed JSON.
pub fn write_figure(figure: &Figure, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, figure)?;
    tracing::info!(path = %path.display(), traces = figure.traces.len(), "Chart written.");
    Ok(())
}

/// Builds and writes the chart to `<dir>/<symbol>.json`, returning the path.
///
/// The symbol must be a plain file name: empty symbols and ones carrying path
/// separators or `..` are rejected before anything is written.
pub fn render(
    symbol: &Symbol,
    series: &CandleSeries,
    signals: &Signals,
    options: &ChartOptions,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    if !is_file_name(&symbol.0) {
        return Err(Error::InvalidSymbol(symbol.0.clone()));
    }
    let path = dir.as_ref().join(format!("{}.json", symbol.0));
    write_figure(&build_figure(symbol, series, signals, options), &path)?;
    Ok(path)
}

fn is_file_name(symbol: &str) -> bool {
    !symbol.is_empty() && !symbol.contains(['/', '\\']) && !symbol.contains("..")
}

fn average_trace(name: &str, color: &str, x: &[String], ma: &MovingAverageSeries) -> Trace {
    Trace::Scatter {
        name: name.to_string(),
        mode: Mode::Lines,
        x: x.to_vec(),
        y: ma.points().iter().map(|p| p.value().and_then(|v| v.to_f64())).collect(),
        color: color.to_string(),
    }
}

fn marker_trace(name: &str, color: &str, events: &[SignalEvent], scale: Decimal) -> Trace {
    Trace::Scatter {
        name: name.to_string(),
        mode: Mode::Markers,
        x: events.iter().map(|e| format_time(e.time)).collect(),
        y: events.iter().map(|e| e.price.checked_mul(scale).and_then(|v| v.to_f64())).collect(),
        color: color.to_string(),
    }
}

fn to_f64s(values: &[Decimal]) -> Vec<f64> {
    values.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect()
}

fn format_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Average, Candle, SignalKind};

    const HOUR: i64 = 3_600_000;

    fn series() -> CandleSeries {
        let candles = (0..3)
            .map(|i| Candle {
                time: i * HOUR,
                open: dec!(100),
                high: dec!(110),
                low: dec!(90),
                close: dec!(105),
                volume: dec!(1),
            })
            .collect();
        let mut series = CandleSeries::new(candles).unwrap();
        let fast = MovingAverageSeries::new(2, vec![Average::Unset, Average::Value(dec!(105)), Average::Value(dec!(105))]);
        let slow = MovingAverageSeries::new(3, vec![Average::Unset, Average::Unset, Average::Value(dec!(105))]);
        series.attach_averages(fast, slow).unwrap();
        series
    }

    fn signals() -> Signals {
        Signals {
            buys: vec![SignalEvent { time: HOUR, price: dec!(90), kind: SignalKind::Buy }],
            sells: vec![SignalEvent { time: 2 * HOUR, price: dec!(100), kind: SignalKind::Sell }],
        }
    }

    fn names(figure: &Figure) -> Vec<&str> {
        figure.traces.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn figure_has_all_traces_in_order() {
        let figure = build_figure(&Symbol("BTCUSDT".into()), &series(), &signals(), &ChartOptions::default());
        assert_eq!(figure.title, "BTCUSDT");
        assert_eq!(names(&figure), vec![CANDLE_TRACE, SLOW_MA_TRACE, FAST_MA_TRACE, BUY_TRACE, SELL_TRACE]);
    }

    #[test]
    fn sell_markers_are_offset_two_percent() {
        let figure = build_figure(&Symbol("X".into()), &series(), &signals(), &ChartOptions::default());
        match figure.trace(SELL_TRACE) {
            Some(Trace::Scatter { y, mode, .. }) => {
                assert_eq!(*mode, Mode::Markers);
                assert_eq!(y, &vec![Some(102.0)]);
            }
            other => panic!("unexpected sell trace: {other:?}"),
        }
        match figure.trace(BUY_TRACE) {
            Some(Trace::Scatter { y, .. }) => assert_eq!(y, &vec![Some(90.0)]),
            other => panic!("unexpected buy trace: {other:?}"),
        }
    }

    #[test]
    fn disabled_or_empty_kinds_have_no_trace() {
        let options = ChartOptions { include_buy: false, include_sell: true };
        let figure = build_figure(&Symbol("X".into()), &series(), &signals(), &options);
        assert!(figure.trace(BUY_TRACE).is_none());
        assert!(figure.trace(SELL_TRACE).is_some());

        let figure = build_figure(&Symbol("X".into()), &series(), &Signals::default(), &ChartOptions::default());
        assert_eq!(names(&figure), vec![CANDLE_TRACE, SLOW_MA_TRACE, FAST_MA_TRACE]);
    }

    #[test]
    fn unset_averages_serialise_as_null() {
        let figure = build_figure(&Symbol("X".into()), &series(), &Signals::default(), &ChartOptions::default());
        let json = serde_json::to_value(&figure).unwrap();
        let slow = &json["traces"][1];
        assert_eq!(slow["type"], "scatter");
        assert_eq!(slow["mode"], "lines");
        assert_eq!(slow["y"], serde_json::json!([null, null, 105.0]));
        assert_eq!(json["traces"][0]["x"][1], "1970-01-01T01:00:00+00:00");
    }

    #[test]
    fn render_writes_symbol_named_file() {
        let dir = std::env::temp_dir().join(format!("chart-test-{}", std::process::id()));
        let path = render(&Symbol("ETHUSDT".into()), &series(), &signals(), &ChartOptions::default(), &dir).unwrap();
        assert_eq!(path, dir.join("ETHUSDT.json"));

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(written["title"], "ETHUSDT");
        assert_eq!(written["traces"].as_array().map(|t| t.len()), Some(5));
    }

    #[test]
    fn render_rejects_symbols_that_leave_the_directory() {
        let dir = std::env::temp_dir().join(format!("chart-escape-{}", std::process::id()));
        for bad in ["../x", "a/b", "a\\b", ""] {
            let err = render(&Symbol(bad.into()), &series(), &signals(), &ChartOptions::default(), &dir).unwrap_err();
            assert!(matches!(err, Error::InvalidSymbol(ref s) if s == bad), "{bad:?}");
        }
        assert!(!dir.exists());
        assert!(!std::env::temp_dir().join("x.json").exists());
    }

    #[test]
    fn marker_that_overflows_the_offset_is_null() {
        let signals = Signals {
            buys: vec![],
            sells: vec![SignalEvent { time: HOUR, price: Decimal::MAX, kind: SignalKind::Sell }],
        };
        let figure = build_figure(&Symbol("X".into()), &series(), &signals, &ChartOptions::default());
        match figure.trace(SELL_TRACE) {
            Some(Trace::Scatter { y, .. }) => assert_eq!(y, &vec![None]),
            other => panic!("unexpected sell trace: {other:?}"),
        }
    }
}
