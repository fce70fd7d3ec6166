use thiserror::Error;

use crate::data::price_source::PriceSourceError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Price source error: {0}")]
    PriceSource(#[from] PriceSourceError),

    #[error("No price data available for '{symbol}'")]
    EmptySeries { symbol: String },

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Alert store error: {0}")]
    AlertStoreError(String),

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    // Catch-all for helpers that report through anyhow
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// True for failures caused by the input bars rather than by the
    /// machinery around them.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            EngineError::EmptySeries { .. }
                | EngineError::InvalidSeries(_)
                | EngineError::CsvDataFormatError(_)
                | EngineError::PriceSource(PriceSourceError::NoData { .. })
                | EngineError::PriceSource(PriceSourceError::InvalidData { .. })
        )
    }
}
