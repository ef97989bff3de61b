/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Insufficient history for {indicator}: need {required} bars, got {available}")]
    InsufficientHistory {
        indicator: String,
        required: usize,
        available: usize,
    },

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Unsupported interval: {0}")]
    UnsupportedInterval(String),

    #[error("Delivery failure: {0}")]
    DeliveryFailure(String),

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SignalError {
    pub fn insufficient(indicator: &str, required: usize, available: usize) -> Self {
        SignalError::InsufficientHistory {
            indicator: indicator.to_string(),
            required,
            available,
        }
    }
}
