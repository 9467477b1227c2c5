// In crates/core-types/src/series.rs

use crate::error::{Error, Result};
use crate::types::{Candle, MovingAverageSeries};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Number of leading fields in a kline row that describe the candle.
/// Anything after these (quote volume, trade count, ...) is ignored.
pub const CANDLE_FIELDS: usize = 6;

/// The six raw fields of one candle before numeric coercion.
///
/// Values may be JSON numbers or numeric strings, which is how Binance
/// delivers them (times as numbers, prices as strings).
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandle {
    pub time: Value,
    pub open: Value,
    pub high: Value,
    pub low: Value,
    pub close: Value,
    pub volume: Value,
}

impl RawCandle {
    /// Takes the leading six fields of a kline row.
    pub fn from_row(row: &[Value]) -> Result<Self> {
        if row.len() < CANDLE_FIELDS {
            return Err(Error::DataFormat(format!(
                "expected at least {} fields per candle, got {}",
                CANDLE_FIELDS,
                row.len()
            )));
        }
        Ok(Self {
            time: row[0].clone(),
            open: row[1].clone(),
            high: row[2].clone(),
            low: row[3].clone(),
            close: row[4].clone(),
            volume: row[5].clone(),
        })
    }

    fn parse(&self, index: usize) -> Result<Candle> {
        Ok(Candle {
            time: parse_time(&self.time, index)?,
            open: parse_real(&self.open, "open", index)?,
            high: parse_real(&self.high, "high", index)?,
            low: parse_real(&self.low, "low", index)?,
            close: parse_real(&self.close, "close", index)?,
            volume: parse_real(&self.volume, "volume", index)?,
        })
    }
}

/// Parallel raw columns, one entry per candle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawColumns {
    pub time: Vec<Value>,
    pub open: Vec<Value>,
    pub high: Vec<Value>,
    pub low: Vec<Value>,
    pub close: Vec<Value>,
    pub volume: Vec<Value>,
}

/// An ordered, time-indexed series of candles with its attached averages.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
    fast_ma: Option<MovingAverageSeries>,
    slow_ma: Option<MovingAverageSeries>,
}

impl CandleSeries {
    /// Builds a series from typed candles.
    ///
    /// The series must be non-empty and strictly ascending in time.
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        if candles.is_empty() {
            return Err(Error::DataFormat("candle series is empty".into()));
        }
        if let Some(i) = candles.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(Error::DataFormat(format!(
                "candle times must be strictly ascending (index {} has {} after {})",
                i + 1,
                candles[i + 1].time,
                candles[i].time
            )));
        }
        Ok(Self { candles, fast_ma: None, slow_ma: None })
    }

    /// Builds a series from raw kline rows as returned by the exchange.
    pub fn from_rows(rows: &[Vec<Value>]) -> Result<Self> {
        let candles = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                RawCandle::from_row(row)
                    .map_err(|e| Error::DataFormat(format!("row {}: {}", i, e.detail())))?
                    .parse(i)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(candles)
    }

    /// Builds a series from six parallel columns of raw values.
    pub fn from_columns(columns: RawColumns) -> Result<Self> {
        let n = columns.time.len();
        let lengths = [
            ("open", columns.open.len()),
            ("high", columns.high.len()),
            ("low", columns.low.len()),
            ("close", columns.close.len()),
            ("volume", columns.volume.len()),
        ];
        if n == 0 {
            return Err(Error::DataFormat("candle columns are empty".into()));
        }
        if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != n) {
            return Err(Error::DataFormat(format!(
                "column `{}` has {} values but `time` has {}",
                name, len, n
            )));
        }

        let candles = (0..n)
            .map(|i| {
                RawCandle {
                    time: columns.time[i].clone(),
                    open: columns.open[i].clone(),
                    high: columns.high[i].clone(),
                    low: columns.low[i].clone(),
                    close: columns.close[i].clone(),
                    volume: columns.volume[i].clone(),
                }
                .parse(i)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(candles)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn first(&self) -> &Candle {
        &self.candles[0]
    }

    pub fn last(&self) -> &Candle {
        &self.candles[self.candles.len() - 1]
    }

    pub fn times(&self) -> Vec<i64> {
        self.candles.iter().map(|c| c.time).collect()
    }

    pub fn opens(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.open).collect()
    }

    pub fn highs(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// Attaches the fast and slow averages. Both must be aligned with the series.
    pub fn attach_averages(
        &mut self,
        fast: MovingAverageSeries,
        slow: MovingAverageSeries,
    ) -> Result<()> {
        for (name, ma) in [("fast", &fast), ("slow", &slow)] {
            if ma.len() != self.len() {
                return Err(Error::DataFormat(format!(
                    "{} average has {} points but the series has {} candles",
                    name,
                    ma.len(),
                    self.len()
                )));
            }
        }
        self.fast_ma = Some(fast);
        self.slow_ma = Some(slow);
        Ok(())
    }

    pub fn fast_ma(&self) -> Option<&MovingAverageSeries> {
        self.fast_ma.as_ref()
    }

    pub fn slow_ma(&self) -> Option<&MovingAverageSeries> {
        self.slow_ma.as_ref()
    }

    pub fn has_averages(&self) -> bool {
        self.fast_ma.is_some() && self.slow_ma.is_some()
    }
}

impl Error {
    fn detail(&self) -> String {
        match self {
            Error::DataFormat(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Accepts integers and integral reals such as `1499040000000.0`; anything
/// with a fractional part is rejected rather than truncated.
fn parse_time(value: &Value, index: usize) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| parse_integral(&n.to_string())),
        Value::String(s) => s.trim().parse::<i64>().ok().or_else(|| parse_integral(s.trim())),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::DataFormat(format!("row {}: `time` is not an integer timestamp: {}", index, value))
    })
}

fn parse_real(value: &Value, field: &str, index: usize) -> Result<Decimal> {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::DataFormat(format!("row {}: `{}` is not a real number: {}", index, field, value))
    })
}

fn parse_integral(s: &str) -> Option<i64> {
    parse_decimal(s)
        .filter(|d| d.fract().is_zero())
        .and_then(|d| i64::try_from(d).ok())
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).ok().or_else(|| Decimal::from_scientific(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn candle(time: i64, price: Decimal) -> Candle {
        Candle { time, open: price, high: price, low: price, close: price, volume: dec!(1) }
    }

    #[test]
    fn rejects_empty_series() {
        assert!(matches!(CandleSeries::new(vec![]), Err(Error::DataFormat(_))));
    }

    #[test]
    fn rejects_non_ascending_times() {
        let candles = vec![candle(1, dec!(1)), candle(3, dec!(1)), candle(3, dec!(1))];
        assert!(matches!(CandleSeries::new(candles), Err(Error::DataFormat(_))));
    }

    #[test]
    fn parses_binance_rows() {
        let rows = vec![
            vec![
                json!(1_500_000_000_000i64),
                json!("100.5"),
                json!("110"),
                json!("99"),
                json!("105.25"),
                json!("12.5"),
                json!(1_500_003_599_999i64),
                json!("1300.0"),
                json!(42),
            ],
            vec![json!(1_500_003_600_000i64), json!(105), json!(106), json!(104), json!(105), json!(3)],
        ];
        let series = CandleSeries::from_rows(&rows).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().open, dec!(100.5));
        assert_eq!(series.first().close, dec!(105.25));
        assert_eq!(series.last().high, dec!(106));
        assert_eq!(series.times(), vec![1_500_000_000_000, 1_500_003_600_000]);
    }

    #[test]
    fn short_row_is_a_data_format_error() {
        let rows = vec![vec![json!(1), json!("1"), json!("1"), json!("1"), json!("1")]];
        let err = CandleSeries::from_rows(&rows).unwrap_err();
        assert!(matches!(err, Error::DataFormat(ref msg) if msg.contains("row 0")));
    }

    #[test]
    fn non_numeric_field_is_a_data_format_error() {
        let rows = vec![vec![json!(1), json!("1"), json!("abc"), json!("1"), json!("1"), json!("1")]];
        let err = CandleSeries::from_rows(&rows).unwrap_err();
        assert!(matches!(err, Error::DataFormat(ref msg) if msg.contains("high")));

        let rows = vec![vec![json!(1), json!(null), json!("1"), json!("1"), json!("1"), json!("1")]];
        assert!(matches!(CandleSeries::from_rows(&rows), Err(Error::DataFormat(_))));
    }

    #[test]
    fn integral_float_times_are_accepted() {
        let row = |time| vec![time, json!(1), json!(1), json!(1), json!(1), json!(1)];
        let rows = vec![row(json!(1499040000000.0)), row(json!("1499043600000.0"))];
        let series = CandleSeries::from_rows(&rows).unwrap();
        assert_eq!(series.times(), vec![1_499_040_000_000, 1_499_043_600_000]);

        for fractional in [json!(1.5), json!("1499040000000.5")] {
            let err = CandleSeries::from_rows(&[row(fractional)]).unwrap_err();
            assert!(matches!(err, Error::DataFormat(ref msg) if msg.contains("time")));
        }
    }

    #[test]
    fn columns_must_have_equal_length() {
        let columns = RawColumns {
            time: vec![json!(1), json!(2)],
            open: vec![json!("1"), json!("1")],
            high: vec![json!("1"), json!("1")],
            low: vec![json!("1")],
            close: vec![json!("1"), json!("1")],
            volume: vec![json!("1"), json!("1")],
        };
        let err = CandleSeries::from_columns(columns).unwrap_err();
        assert!(matches!(err, Error::DataFormat(ref msg) if msg.contains("low")));
    }

    #[test]
    fn empty_columns_are_rejected() {
        assert!(matches!(
            CandleSeries::from_columns(RawColumns::default()),
            Err(Error::DataFormat(_))
        ));
    }

    #[test]
    fn columns_build_a_series() {
        let columns = RawColumns {
            time: vec![json!("1"), json!(2)],
            open: vec![json!("1.5"), json!(2.5)],
            high: vec![json!("2"), json!(3)],
            low: vec![json!("1"), json!(2)],
            close: vec![json!("1.75"), json!(2.75)],
            volume: vec![json!("1e2"), json!(0)],
        };
        let series = CandleSeries::from_columns(columns).unwrap();
        assert_eq!(series.closes(), vec![dec!(1.75), dec!(2.75)]);
        assert_eq!(series.volumes(), vec![dec!(100), dec!(0)]);
    }

    #[test]
    fn averages_must_align_with_series() {
        let mut series = CandleSeries::new(vec![candle(1, dec!(1)), candle(2, dec!(1))]).unwrap();
        let aligned = MovingAverageSeries::new(1, vec![Default::default(); 2]);
        let short = MovingAverageSeries::new(1, vec![Default::default(); 1]);

        assert!(series.attach_averages(aligned.clone(), short).is_err());
        assert!(!series.has_averages());

        series.attach_averages(aligned.clone(), aligned).unwrap();
        assert!(series.has_averages());
        assert_eq!(series.fast_ma().map(|m| m.len()), Some(2));
    }
}
