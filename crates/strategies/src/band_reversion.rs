// In crates/strategies/src/band_reversion.rs

use crate::moving_average::MovingAverageCalculator;
use crate::types::BandReversionSettings;
use crate::Strategy;
use core_types::{Average, Candle, CandleSeries, MovingAverageSeries, Result, SignalEvent, Signals};
use rust_decimal::Decimal;

/// Moving-average band reversion.
///
/// A candle is a buy when the slow average sits well above its low, and a sell
/// when the fast average pokes just above its high. Each candle is classified
/// on its own; nothing is carried from one index to the next.
#[derive(Debug, Clone)]
pub struct BandReversion {
    settings: BandReversionSettings,
    calculator: MovingAverageCalculator,
}

impl BandReversion {
    pub fn new(settings: BandReversionSettings) -> Self {
        Self {
            calculator: MovingAverageCalculator::new(settings.smoothing),
            settings,
        }
    }

    pub fn settings(&self) -> &BandReversionSettings {
        &self.settings
    }

    fn averages(&self, series: &CandleSeries) -> Result<(MovingAverageSeries, MovingAverageSeries)> {
        let closes = series.closes();
        let fast = self.calculator.compute(&closes, self.settings.fast_period as usize)?;
        let slow = self.calculator.compute(&closes, self.settings.slow_period as usize)?;
        Ok((fast, slow))
    }

    /// Classifies a single candle. The buy check wins when both would match.
    pub fn classify(&self, candle: &Candle, fast: Average, slow: Average) -> Option<SignalEvent> {
        if is_buy(candle.low, slow, self.settings.buy_threshold) {
            Some(SignalEvent::buy(candle))
        } else if is_sell(candle.high, fast, self.settings.sell_threshold) {
            Some(SignalEvent::sell(candle))
        } else {
            None
        }
    }

    fn scan(&self, candles: &[Candle], fast: &MovingAverageSeries, slow: &MovingAverageSeries) -> Signals {
        let mut signals = Signals::default();
        // Index 0 has no prior context and is never classified.
        for (i, candle) in candles.iter().enumerate().skip(1) {
            if let Some(event) = self.classify(candle, fast.get(i), slow.get(i)) {
                signals.push(event);
            }
        }
        signals
    }
}

impl Strategy for BandReversion {
    fn name(&self) -> &'static str {
        "MovingAverageBandReversion"
    }

    fn prepare(&self, series: &mut CandleSeries) -> Result<()> {
        let (fast, slow) = self.averages(series)?;
        series.attach_averages(fast, slow)
    }

    fn detect(&self, series: &CandleSeries) -> Result<Signals> {
        if series.len() < 2 {
            return Ok(Signals::default());
        }

        let signals = match (series.fast_ma(), series.slow_ma()) {
            (Some(fast), Some(slow)) => self.scan(series.candles(), fast, slow),
            _ => {
                let (fast, slow) = self.averages(series)?;
                self.scan(series.candles(), &fast, &slow)
            }
        };

        tracing::debug!(
            strategy = self.name(),
            candles = series.len(),
            buys = signals.buys.len(),
            sells = signals.sells.len(),
            "Scan complete."
        );
        Ok(signals)
    }
}

/// Slow average above the low by strictly more than `threshold` of the low.
/// A comparison that overflows `Decimal` does not fire.
fn is_buy(low: Decimal, slow: Average, threshold: Decimal) -> bool {
    match slow.value() {
        Some(slow) => slow > low && gap(slow, low, threshold).is_some_and(|(diff, limit)| diff > limit),
        None => false,
    }
}

/// Fast average above the high by strictly less than `threshold` of the high.
fn is_sell(high: Decimal, fast: Average, threshold: Decimal) -> bool {
    match fast.value() {
        Some(fast) => fast > high && gap(fast, high, threshold).is_some_and(|(diff, limit)| diff < limit),
        None => false,
    }
}

fn gap(average: Decimal, price: Decimal, threshold: Decimal) -> Option<(Decimal, Decimal)> {
    Some((average.checked_sub(price)?, threshold.checked_mul(price)?))
}
