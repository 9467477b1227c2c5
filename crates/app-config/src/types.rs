// In crates/app-config/src/types.rs

use chart::ChartOptions;
use serde::Deserialize;
use strategies::types::BandReversionSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the Binance API.
    pub binance: BinanceSettings,
    /// Which market to scan when the command line does not say.
    #[serde(default)]
    pub scan: ScanSettings,
    /// Parameters of the band reversion detector.
    #[serde(default)]
    pub strategy: BandReversionSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BinanceSettings {
    /// The REST API base URL for Binance.
    pub rest_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScanSettings {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    pub limit: Option<u16>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { symbol: default_symbol(), interval: default_interval(), limit: None }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChartSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_enabled")]
    pub include_buy: bool,
    #[serde(default = "default_enabled")]
    pub include_sell: bool,
}

impl ChartSettings {
    pub fn options(&self) -> ChartOptions {
        ChartOptions { include_buy: self.include_buy, include_sell: self.include_sell }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            output_dir: default_output_dir(),
            include_buy: default_enabled(),
            include_sell: default_enabled(),
        }
    }
}

/// Helper functions for serde defaults
fn default_timeout() -> u64 { 10 }
fn default_symbol() -> String { "BTCUSDT".into() }
fn default_interval() -> String { "1h".into() }
fn default_enabled() -> bool { true }
fn default_output_dir() -> String { "charts".into() }
