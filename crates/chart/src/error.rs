// In crates/chart/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize chart: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Symbol cannot be used as a file name: {0:?}")]
    InvalidSymbol(String),
}

pub type Result<T> = std::result::Result<T, Error>;
