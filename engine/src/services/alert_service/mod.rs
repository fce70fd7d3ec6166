// engine/src/services/alert_service/mod.rs
// The AlertService struct and the entry points of alert refreshing. Each
// operation logs and dispatches to its handler module.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, RwLock};
use tracing::Instrument;
use uuid::Uuid;

use crate::alerts::validate_alerts;
use crate::config::EngineSettings;
use crate::data::{AlertPage, AlertQuery, AlertStore, Clock, PriceCache, PriceSource};
use crate::error::EngineError;
use crate::models::{Series, SignalFrame};
use crate::pipeline::{compute_alerts, compute_signal_frame};
use shared::models::{Alert, Ticker, TickerId};

pub mod helpers;
pub mod load_series;
pub mod refresh_all;
pub mod refresh_ticker;

pub use helpers::{RefreshOutcome, RefreshStats, TickerError};

pub struct AlertService<S: AlertStore> {
    price_source: Arc<dyn PriceSource>,
    price_cache: Arc<RwLock<PriceCache>>,
    alert_store: Arc<RwLock<S>>,
    clock: Arc<dyn Clock>,
    settings: Arc<EngineSettings>,
    ticker_locks: Arc<StdMutex<HashMap<TickerId, Arc<Mutex<()>>>>>,
}

impl<S: AlertStore> Clone for AlertService<S> {
    fn clone(&self) -> Self {
        AlertService {
            price_source: self.price_source.clone(),
            price_cache: self.price_cache.clone(),
            alert_store: self.alert_store.clone(),
            clock: self.clock.clone(),
            settings: self.settings.clone(),
            ticker_locks: self.ticker_locks.clone(),
        }
    }
}

impl<S: AlertStore + 'static> AlertService<S> {
    pub fn new(price_source: Arc<dyn PriceSource>, alert_store: S, clock: Arc<dyn Clock>, settings: EngineSettings) -> Self {
        AlertService {
            price_source,
            price_cache: Arc::new(RwLock::new(PriceCache::new())),
            alert_store: Arc::new(RwLock::new(alert_store)),
            clock,
            settings: Arc::new(settings),
            ticker_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub(crate) fn ticker_lock(&self, ticker_id: TickerId) -> Arc<Mutex<()>> {
        let mut locks = self.ticker_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(ticker_id).or_default().clone()
    }

    // Drops locks nobody holds or waits on
    fn prune_ticker_locks(&self) {
        let mut locks = self.ticker_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Cached series when fresh, otherwise fetched and merged into the cache.
    pub async fn load_series(&self, ticker: &Ticker) -> Result<Series, EngineError> {
        load_series::handle_load_series(
            ticker,
            self.price_source.as_ref(),
            self.price_cache.clone(),
            self.clock.as_ref(),
            &self.settings,
        )
        .await
    }

    pub async fn signals_for_ticker(&self, ticker: &Ticker) -> Result<SignalFrame, EngineError> {
        let series = self.load_series(ticker).await?;
        Ok(compute_signal_frame(&series, &self.settings.indicators))
    }

    /// Runs the pipeline for one ticker without touching the alert store.
    pub async fn generate_for_ticker(&self, ticker: &Ticker) -> Result<Vec<Alert>, EngineError> {
        tracing::debug!(ticker_id = ticker.id, symbol = %ticker.symbol, "Generating alerts");
        let series = self.load_series(ticker).await?;
        let alerts = compute_alerts(&series, &self.settings.indicators);
        if !validate_alerts(&alerts) {
            return Err(EngineError::ProcessingError(format!(
                "deduplicated alerts for {} break the open/close pairing: {:?}",
                ticker.symbol, alerts
            )));
        }
        Ok(alerts)
    }

    /// Regenerates the ticker's alerts and replaces its stored set.
    pub async fn refresh_ticker(&self, ticker: &Ticker) -> RefreshOutcome {
        tracing::info!(ticker_id = ticker.id, symbol = %ticker.symbol, "Refreshing alerts");
        let outcome = refresh_ticker::handle_refresh_ticker(self, ticker, self.alert_store.clone()).await;
        self.prune_ticker_locks();
        outcome
    }

    /// Refreshes every ticker; one failing ticker never stops the batch.
    /// `progress` receives `(completed, total, symbol)` after each ticker.
    pub async fn refresh_all<F>(&self, tickers: &[Ticker], progress: F) -> RefreshStats
    where
        F: FnMut(usize, usize, &str),
    {
        let span = tracing::info_span!("refresh_all", refresh_id = %Uuid::new_v4(), tickers = tickers.len());
        async {
            tracing::info!(
                max_concurrency = self.settings.refresh.max_concurrency,
                rate_limit_ms = self.settings.refresh.rate_limit_ms,
                "Starting bulk refresh"
            );
            let stats = refresh_all::handle_refresh_all(self, tickers, progress).await;
            tracing::info!(
                successful = stats.successful,
                failed = stats.failed,
                total_alerts = stats.total_alerts,
                "Bulk refresh finished"
            );
            stats
        }
        .instrument(span)
        .await
    }

    pub async fn list_alerts(&self, query: &AlertQuery) -> Result<AlertPage, EngineError> {
        self.alert_store.read().await.list_alerts(query)
    }
}
