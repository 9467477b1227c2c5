// In crates/core-types/src/types.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A trading pair symbol, e.g. "BTCUSDT".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One OHLCV record for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in milliseconds since the Unix epoch.
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// A single point of a moving average.
///
/// Indices inside the warm-up period carry `Unset` rather than a numeric
/// placeholder, so a missing average can never compare as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Average {
    #[default]
    Unset,
    Value(Decimal),
}

impl Average {
    pub fn value(self) -> Option<Decimal> {
        match self {
            Average::Unset => None,
            Average::Value(v) => Some(v),
        }
    }

    pub fn is_set(self) -> bool {
        matches!(self, Average::Value(_))
    }
}

impl From<Option<Decimal>> for Average {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Average::Unset, Average::Value)
    }
}

/// A moving average aligned index-for-index with the series it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovingAverageSeries {
    window: usize,
    points: Vec<Average>,
}

impl MovingAverageSeries {
    pub fn new(window: usize, points: Vec<Average>) -> Self {
        Self { window, points }
    }

    /// The trailing window length the average was computed with.
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point at `index`, or `Unset` when out of range.
    pub fn get(&self, index: usize) -> Average {
        self.points.get(index).copied().unwrap_or_default()
    }

    pub fn points(&self) -> &[Average] {
        &self.points
    }

    /// Number of warmed-up points.
    pub fn set_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_set()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
}

/// A detected signal. The price is always taken from the candle itself:
/// its low for a buy, its high for a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalEvent {
    pub time: i64,
    pub price: Decimal,
    pub kind: SignalKind,
}

impl SignalEvent {
    pub fn buy(candle: &Candle) -> Self {
        Self { time: candle.time, price: candle.low, kind: SignalKind::Buy }
    }

    pub fn sell(candle: &Candle) -> Self {
        Self { time: candle.time, price: candle.high, kind: SignalKind::Sell }
    }
}

/// Detector output, partitioned by kind. Each list is in ascending time order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub buys: Vec<SignalEvent>,
    pub sells: Vec<SignalEvent>,
}

impl Signals {
    pub fn push(&mut self, event: SignalEvent) {
        match event.kind {
            SignalKind::Buy => self.buys.push(event),
            SignalKind::Sell => self.sells.push(event),
        }
    }

    pub fn len(&self) -> usize {
        self.buys.len() + self.sells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    /// Both kinds interleaved into a single ascending-time sequence.
    pub fn merged(&self) -> Vec<SignalEvent> {
        let mut merged = Vec::with_capacity(self.len());
        let (mut b, mut s) = (self.buys.iter().peekable(), self.sells.iter().peekable());
        loop {
            let next = match (b.peek(), s.peek()) {
                (Some(buy), Some(sell)) if buy.time <= sell.time => b.next(),
                (Some(_), Some(_)) => s.next(),
                (Some(_), None) => b.next(),
                (None, Some(_)) => s.next(),
                (None, None) => break,
            };
            merged.extend(next.copied());
        }
        merged
    }
}
