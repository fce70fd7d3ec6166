// Outcome types and fetch retry for the alert service
use serde::Serialize;
use shared::models::{Alert, Bar};
use std::fmt::Write;
use std::time::Duration;

use crate::config::RefreshSettings;
use crate::data::{PriceSource, PriceSourceError};

const SUMMARY_MAX_ERRORS: usize = 5;

/// Result of refreshing one ticker. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshOutcome {
    pub symbol: String,
    pub success: bool,
    pub alert_count: usize,
    pub alerts: Vec<Alert>,
    pub error: Option<String>,
}

impl RefreshOutcome {
    pub fn succeeded(symbol: &str, alerts: Vec<Alert>) -> Self {
        RefreshOutcome { symbol: symbol.to_string(), success: true, alert_count: alerts.len(), alerts, error: None }
    }

    pub fn failed(symbol: &str, error: impl Into<String>) -> Self {
        RefreshOutcome {
            symbol: symbol.to_string(),
            success: false,
            alert_count: 0,
            alerts: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerError {
    pub symbol: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    pub total_tickers: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_alerts: usize,
    pub errors: Vec<TickerError>,
}

impl RefreshStats {
    pub fn record(&mut self, outcome: &RefreshOutcome) {
        self.total_tickers += 1;
        if outcome.success {
            self.successful += 1;
            self.total_alerts += outcome.alert_count;
        } else {
            self.failed += 1;
            self.errors.push(TickerError {
                symbol: outcome.symbol.clone(),
                error: outcome.error.clone().unwrap_or_default(),
            });
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Processed {} ticker(s): {} successful, {} failed. Generated {} alert(s).",
            self.total_tickers, self.successful, self.failed, self.total_alerts
        );
        if !self.errors.is_empty() {
            let _ = write!(summary, "\n\nErrors ({}):", self.errors.len());
            for e in self.errors.iter().take(SUMMARY_MAX_ERRORS) {
                let _ = write!(summary, "\n- {}: {}", e.symbol, e.error);
            }
            if self.errors.len() > SUMMARY_MAX_ERRORS {
                let _ = write!(summary, "\n... and {} more", self.errors.len() - SUMMARY_MAX_ERRORS);
            }
        }
        summary
    }
}

/// Fetches bars, retrying transient failures with a fixed backoff.
pub async fn fetch_with_retry(
    source: &dyn PriceSource,
    symbol: &str,
    settings: &RefreshSettings,
) -> Result<Vec<Bar>, PriceSourceError> {
    let attempts = settings.fetch_retries.max(1);
    let mut attempt = 1;
    loop {
        match source.fetch(symbol).await {
            Ok(bars) => return Ok(bars),
            Err(e) if e.is_retryable() && attempt < attempts => {
                tracing::warn!(symbol = %symbol, attempt, max_attempts = attempts, error = %e, "Fetch failed, retrying");
                tokio::time::sleep(Duration::from_millis(settings.retry_backoff_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_summary_lists_first_five_errors() {
        let mut stats = RefreshStats::default();
        stats.record(&RefreshOutcome::succeeded("AAPL", Vec::new()));
        for i in 0..7 {
            stats.record(&RefreshOutcome::failed(&format!("BAD{}", i), "No price data"));
        }

        assert_eq!((stats.total_tickers, stats.successful, stats.failed), (8, 1, 7));
        let summary = stats.summary();
        assert!(summary.starts_with("Processed 8 ticker(s): 1 successful, 7 failed. Generated 0 alert(s)."));
        assert!(summary.contains("Errors (7):"));
        assert!(summary.contains("- BAD4: No price data"));
        assert!(!summary.contains("BAD5"));
        assert!(summary.ends_with("... and 2 more"));
    }

    #[test]
    fn test_summary_without_errors() {
        let stats = RefreshStats::default();
        assert_eq!(stats.summary(), "Processed 0 ticker(s): 0 successful, 0 failed. Generated 0 alert(s).");
    }
}
