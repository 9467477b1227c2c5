// In crates/strategies/src/moving_average.rs

use crate::types::Smoothing;
use core_types::{Average, Error, MovingAverageSeries, Result};
use rust_decimal::Decimal;

/// Turns a closing-price sequence into an aligned moving average.
///
/// Output has one point per input price. The first `window - 1` points are
/// `Average::Unset`; from index `window - 1` on every point carries a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovingAverageCalculator {
    smoothing: Smoothing,
}

impl MovingAverageCalculator {
    pub fn new(smoothing: Smoothing) -> Self {
        Self { smoothing }
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Computes the average of `closes` over a trailing `window`.
    ///
    /// Fails with `InvalidWindow` when the window is zero or longer than the input.
    pub fn compute(&self, closes: &[Decimal], window: usize) -> Result<MovingAverageSeries> {
        if window == 0 || window > closes.len() {
            return Err(Error::InvalidWindow { window, len: closes.len() });
        }

        let points = match self.smoothing {
            Smoothing::Simple => simple(closes, window)?,
            Smoothing::Smoothed => smoothed(closes, window)?,
        };
        Ok(MovingAverageSeries::new(window, points))
    }
}

fn overflow(index: usize) -> Error {
    Error::DataFormat(format!("closing prices overflow the moving average at index {}", index))
}

fn simple(closes: &[Decimal], window: usize) -> Result<Vec<Average>> {
    let divisor = Decimal::from(window);
    let mut sum = Decimal::ZERO;
    let mut points = Vec::with_capacity(closes.len());

    for (i, close) in closes.iter().enumerate() {
        sum = sum.checked_add(*close).ok_or_else(|| overflow(i))?;
        if i >= window {
            sum = sum.checked_sub(closes[i - window]).ok_or_else(|| overflow(i))?;
        }
        points.push(if i + 1 >= window {
            Average::Value(sum / divisor)
        } else {
            Average::Unset
        });
    }
    Ok(points)
}

fn smoothed(closes: &[Decimal], window: usize) -> Result<Vec<Average>> {
    let decay = Decimal::ONE - Decimal::ONE / Decimal::from(window);
    // Weighted sum of prices and sum of weights, both decayed every step.
    let mut weighted = Decimal::ZERO;
    let mut weights = Decimal::ZERO;
    let mut points = Vec::with_capacity(closes.len());

    for (i, close) in closes.iter().enumerate() {
        weighted = decay
            .checked_mul(weighted)
            .and_then(|w| close.checked_add(w))
            .ok_or_else(|| overflow(i))?;
        weights = Decimal::ONE + decay * weights;
        points.push(if i + 1 >= window {
            Average::Value(weighted / weights)
        } else {
            Average::Unset
        });
    }
    Ok(points)
}
