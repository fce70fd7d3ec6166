//! Where daily bars come from.
//!
//! [`PriceSource`] is the seam between the engine and a market data vendor.
//! The engine only ever asks for the full daily history of one symbol; how
//! the vendor is reached is up to the implementation.

use async_trait::async_trait;
use shared::models::Bar;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use super::csv_parser::BarCsvParser;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceSourceError {
    #[error("No price data returned for '{symbol}'")]
    NoData { symbol: String },

    #[error("Unknown symbol '{symbol}'")]
    NotFound { symbol: String },

    #[error("Temporary failure fetching '{symbol}': {reason}")]
    Transient { symbol: String, reason: String },

    #[error("Unreadable price data for '{symbol}': {reason}")]
    InvalidData { symbol: String, reason: String },
}

impl PriceSourceError {
    /// Only transient failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PriceSourceError::Transient { .. })
    }
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Full daily history for `symbol`, in any order.
    async fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, PriceSourceError>;
}

/// Reads `<SYMBOL>.csv` files from a directory.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    data_dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, PriceSourceError> {
        let path = self.path_for(symbol);
        match tokio::fs::metadata(&path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PriceSourceError::NotFound { symbol: symbol.to_string() });
            }
            Err(e) => {
                return Err(PriceSourceError::Transient { symbol: symbol.to_string(), reason: e.to_string() });
            }
        }

        debug!(symbol = %symbol, path = %path.display(), "Reading price file");
        // csv is a blocking reader
        let read_path = path.clone();
        let parsed = tokio::task::spawn_blocking(move || BarCsvParser::load_bars_from_csv(&read_path))
            .await
            .map_err(|e| PriceSourceError::Transient { symbol: symbol.to_string(), reason: e.to_string() })?;

        let bars = parsed.map_err(|e| PriceSourceError::InvalidData {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;
        if bars.is_empty() {
            return Err(PriceSourceError::NoData { symbol: symbol.to_string() });
        }
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_csv_source_reads_symbol_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("AAPL.csv"),
            "Date,Open,High,Low,Close,Volume\n2024-01-02,10,11,9,10.5,100\n2024-01-03,10.5,12,10,11.5,200\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(dir.path());
        let bars = source.fetch("AAPL").await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 11.5);
    }

    #[tokio::test]
    async fn test_csv_source_error_kinds() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("EMPTY.csv"), "Date,Open,High,Low,Close,Volume\n").unwrap();
        fs::write(dir.path().join("BAD.csv"), "Date,Open,High,Low,Close,Volume\nnot-a-date,1,1,1,1,1\n").unwrap();
        let source = CsvPriceSource::new(dir.path());

        assert_eq!(
            source.fetch("MISSING").await.unwrap_err(),
            PriceSourceError::NotFound { symbol: "MISSING".to_string() }
        );
        assert_eq!(source.fetch("EMPTY").await.unwrap_err(), PriceSourceError::NoData { symbol: "EMPTY".to_string() });
        let err = source.fetch("BAD").await.unwrap_err();
        assert!(matches!(err, PriceSourceError::InvalidData { .. }));
        assert!(!err.is_retryable());
    }
}
