// In crates/strategies/src/lib.rs

use core_types::{CandleSeries, Result, Signals};

pub mod band_reversion;
pub mod moving_average;
pub mod types;

pub use band_reversion::BandReversion;
pub use moving_average::MovingAverageCalculator;

/// The universal interface for a signal-producing strategy.
///
/// A strategy scans a complete candle series and classifies its candles into
/// buy and sell events. It holds no state between calls.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Computes whatever derived series the strategy needs and attaches them.
    fn prepare(&self, series: &mut CandleSeries) -> Result<()>;

    /// Scans the series and returns every detected signal.
    fn detect(&self, series: &CandleSeries) -> Result<Signals>;
}
