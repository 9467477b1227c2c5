// In crates/api-client/src/types.rs

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// A client for the public Binance market-data endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The base URL for the Binance REST API.
    pub base_url: String,
}

/// One kline row as Binance returns it: a JSON array of mixed types.
///
/// Field order is open time, open, high, low, close, volume, close time,
/// quote volume, trade count, taker base volume, taker quote volume, ignore.
/// Only the first six are used.
pub type RawKline = Vec<Value>;

/// The error object Binance returns in place of data.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
