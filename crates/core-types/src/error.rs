// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed candle data: {0}")]
    DataFormat(String),

    #[error("Invalid moving-average window {window} for a series of {len} candles")]
    InvalidWindow { window: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
