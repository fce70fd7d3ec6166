// Regenerate and store the alerts of one ticker
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::RefreshOutcome;
use super::AlertService;
use crate::data::AlertStore;
use shared::models::Ticker;

pub async fn handle_refresh_ticker<S: AlertStore + 'static>(
    service: &AlertService<S>,
    ticker: &Ticker,
    alert_store: Arc<RwLock<S>>,
) -> RefreshOutcome {
    // Serializes refreshes of the same ticker; other tickers proceed
    let ticker_lock = service.ticker_lock(ticker.id);
    let _guard = ticker_lock.lock().await;

    let alerts = match service.generate_for_ticker(ticker).await {
        Ok(alerts) => alerts,
        Err(e) => {
            tracing::error!(symbol = %ticker.symbol, error = %e, data_error = e.is_data_error(), "Alert generation failed");
            return RefreshOutcome::failed(&ticker.symbol, e.to_string());
        }
    };

    let mut store = alert_store.write().await;
    match store.replace_alerts(ticker, &alerts) {
        Ok(count) => {
            tracing::info!(symbol = %ticker.symbol, count, "Alerts replaced");
            RefreshOutcome::succeeded(&ticker.symbol, alerts)
        }
        Err(e) => {
            tracing::error!(symbol = %ticker.symbol, error = %e, "Failed to store alerts");
            RefreshOutcome::failed(&ticker.symbol, format!("Alert store update failed: {}", e))
        }
    }
}
