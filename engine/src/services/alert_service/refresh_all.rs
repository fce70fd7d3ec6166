// Bulk refresh: sequential with a rate limit, or a bounded worker pool
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

use super::helpers::{RefreshOutcome, RefreshStats};
use super::AlertService;
use crate::data::AlertStore;
use shared::models::Ticker;

pub async fn handle_refresh_all<S, F>(service: &AlertService<S>, tickers: &[Ticker], mut progress: F) -> RefreshStats
where
    S: AlertStore + 'static,
    F: FnMut(usize, usize, &str),
{
    let total = tickers.len();
    let mut stats = RefreshStats::default();
    let max_concurrency = service.settings().refresh.max_concurrency;

    if max_concurrency <= 1 {
        let pause = Duration::from_millis(service.settings().refresh.rate_limit_ms);
        for (idx, ticker) in tickers.iter().enumerate() {
            let outcome = service.refresh_ticker(ticker).await;
            stats.record(&outcome);
            progress(idx + 1, total, &ticker.symbol);

            // Rate limit between tickers, not after the last one
            if idx + 1 < total && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
        return stats;
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let mut workers = JoinSet::new();
    // Task id -> symbol, for workers that die without an outcome
    let mut symbols = HashMap::new();
    for ticker in tickers.iter().cloned() {
        let service = service.clone();
        let semaphore = semaphore.clone();
        let symbol = ticker.symbol.clone();
        let handle = workers.spawn(
            async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return RefreshOutcome::failed(&ticker.symbol, "worker pool closed");
                };
                service.refresh_ticker(&ticker).await
            }
            .in_current_span(),
        );
        symbols.insert(handle.id(), symbol);
    }

    let mut completed = 0;
    while let Some(joined) = workers.join_next().await {
        completed += 1;
        let outcome = joined.unwrap_or_else(|e| {
            let symbol = symbols.get(&e.id()).map_or("<unknown>", String::as_str);
            tracing::error!(symbol = %symbol, error = %e, "Refresh worker panicked");
            RefreshOutcome::failed(symbol, format!("worker failed: {}", e))
        });
        stats.record(&outcome);
        progress(completed, total, &outcome.symbol);
    }
    stats
}
