// Cache-or-fetch of a ticker's price series
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::fetch_with_retry;
use crate::config::EngineSettings;
use crate::data::{Clock, PriceCache, PriceSource};
use crate::error::EngineError;
use crate::models::Series;
use shared::models::Ticker;

pub async fn handle_load_series(
    ticker: &Ticker,
    price_source: &dyn PriceSource,
    price_cache: Arc<RwLock<PriceCache>>,
    clock: &dyn Clock,
    settings: &EngineSettings,
) -> Result<Series, EngineError> {
    let today = clock.today();

    {
        let cache = price_cache.read().await;
        if cache.is_fresh(ticker.id, today, settings.cache.max_age_days) {
            match cache.get_series(ticker.id, &ticker.symbol) {
                Ok(Some(series)) => {
                    tracing::debug!(symbol = %ticker.symbol, bars = series.len(), "Price cache hit");
                    return Ok(series);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(symbol = %ticker.symbol, error = %e, "Cached series unusable, refetching"),
            }
        }
    }

    let latest = price_cache.read().await.latest_date(ticker.id);
    tracing::debug!(symbol = %ticker.symbol, latest = ?latest, "Price cache stale or empty, fetching");
    let bars = fetch_with_retry(price_source, &ticker.symbol, &settings.refresh).await?;
    // Rejected bars never reach the cache
    let fetched = Series::from_unsorted(ticker.symbol.as_str(), bars)?;

    let mut cache = price_cache.write().await;
    let merged = cache.upsert_bars(ticker.id, fetched.bars().iter().copied());
    match cache.get_series(ticker.id, &ticker.symbol) {
        Ok(Some(series)) => {
            tracing::debug!(symbol = %ticker.symbol, stored = merged, "Price cache updated");
            Ok(series)
        }
        Ok(None) => Err(EngineError::EmptySeries { symbol: ticker.symbol.clone() }),
        Err(e) => {
            tracing::warn!(symbol = %ticker.symbol, error = %e, "Cached bars conflict with fetch, replacing them");
            cache.clear(ticker.id);
            cache.upsert_bars(ticker.id, fetched.bars().iter().copied());
            Ok(fetched)
        }
    }
}
