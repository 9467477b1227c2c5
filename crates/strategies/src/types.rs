// In crates/strategies/src/types.rs

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How closing prices are averaged once a window is warmed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
    /// Plain rolling mean over the trailing window.
    #[default]
    Simple,
    /// Exponentially weighted mean with `alpha = 1 / window`,
    /// bias-adjusted over the full history.
    Smoothed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BandReversionSettings {
    // Window of the fast average, compared against the candle high.
    #[serde(default = "default_fast_period")]
    pub fast_period: u32,
    // Window of the slow average, compared against the candle low.
    #[serde(default = "default_slow_period")]
    pub slow_period: u32,

    /// A buy fires when the slow average sits more than this fraction above the low.
    #[serde(default = "default_threshold")]
    pub buy_threshold: Decimal,
    /// A sell fires when the fast average overshoots the high by less than this fraction.
    #[serde(default = "default_threshold")]
    pub sell_threshold: Decimal,

    #[serde(default)]
    pub smoothing: Smoothing,
}

impl Default for BandReversionSettings {
    fn default() -> Self {
        Self {
            fast_period: default_fast_period(),
            slow_period: default_slow_period(),
            buy_threshold: default_threshold(),
            sell_threshold: default_threshold(),
            smoothing: Smoothing::default(),
        }
    }
}

fn default_fast_period() -> u32 { 10 }
fn default_slow_period() -> u32 { 30 }
fn default_threshold() -> Decimal { dec!(0.035) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_survive_a_json_round_trip() {
        let settings = BandReversionSettings {
            fast_period: 7,
            slow_period: 21,
            buy_threshold: dec!(0.05),
            sell_threshold: dec!(0.01),
            smoothing: Smoothing::Smoothed,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""smoothing":"smoothed""#));
        assert_eq!(serde_json::from_str::<BandReversionSettings>(&json).unwrap(), settings);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: BandReversionSettings = serde_json::from_str(r#"{"slow_period":20}"#).unwrap();
        assert_eq!(settings.slow_period, 20);
        assert_eq!(settings.fast_period, 10);
        assert_eq!(settings.buy_threshold, dec!(0.035));
        assert_eq!(settings.sell_threshold, dec!(0.035));
        assert_eq!(settings.smoothing, Smoothing::Simple);
    }
}
