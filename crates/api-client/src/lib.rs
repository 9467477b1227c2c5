// In crates/api-client/src/lib.rs

use app_config::types::BinanceSettings;
use core_types::{CandleSeries, Symbol};
use std::path::Path;
use std::time::Duration;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// Path of the spot kline endpoint.
pub const KLINES_ENDPOINT: &str = "/api/v1/klines";

impl ApiClient {
    /// Constructs a new ApiClient from BinanceSettings.
    pub fn new(settings: &BinanceSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;
        Ok(ApiClient {
            http_client,
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the kline request URL.
    pub fn klines_url(&self, symbol: &Symbol, interval: &str, limit: Option<u16>) -> String {
        let mut url = format!(
            "{}{}?symbol={}&interval={}",
            self.base_url, KLINES_ENDPOINT, symbol.0, interval
        );
        if let Some(l) = limit {
            url.push_str(&format!("&limit={}", l));
        }
        url
    }

    /// Fetches raw kline rows.
    ///
    /// This corresponds to the `GET /api/v1/klines` endpoint.
    ///
    /// # Arguments
    ///
    /// * `symbol`: The symbol to fetch klines for.
    /// * `interval`: The kline interval (e.g., "1h").
    /// * `limit`: Optional number of klines to return (Binance defaults to 500).
    pub async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: &str,
        limit: Option<u16>,
    ) -> Result<Vec<RawKline>> {
        let url = self.klines_url(symbol, interval, limit);
        tracing::debug!(url = %url, "Requesting klines.");

        let response_body = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        let rows = decode_klines(&response_body)?;
        tracing::info!(symbol = %symbol, interval, count = rows.len(), "Received klines.");
        Ok(rows)
    }

    /// Fetches klines and builds a candle series from them.
    pub async fn fetch_series(
        &self,
        symbol: &Symbol,
        interval: &str,
        limit: Option<u16>,
    ) -> Result<CandleSeries> {
        let rows = self.get_klines(symbol, interval, limit).await?;
        Ok(CandleSeries::from_rows(&rows)?)
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &BinanceSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}

/// Decodes a kline response body.
///
/// Binance answers failures with an `{"code": .., "msg": ..}` object instead
/// of an array, which is surfaced as `Error::ApiError`.
pub fn decode_klines(body: &str) -> Result<Vec<RawKline>> {
    serde_json::from_str::<Vec<RawKline>>(body).map_err(|e| {
        if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(body) {
            return Error::ApiError { code: api_error.code, msg: api_error.msg };
        }
        Error::DeserializationFailed(e)
    })
}

/// Reads kline rows previously saved from the klines endpoint.
pub fn read_klines_file(path: impl AsRef<Path>) -> Result<Vec<RawKline>> {
    let body = std::fs::read_to_string(path.as_ref())?;
    let rows = decode_klines(&body)?;
    tracing::info!(path = %path.as_ref().display(), count = rows.len(), "Loaded klines from file.");
    Ok(rows)
}
