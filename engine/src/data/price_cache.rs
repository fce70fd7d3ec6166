// Cached daily bars per ticker
use chrono::NaiveDate;
use shared::models::{Bar, TickerId};
use std::collections::{BTreeMap, HashMap};

use crate::error::EngineError;
use crate::models::Series;

/// True when the newest cached bar is at most `max_age_days` calendar days
/// before `today`.
pub fn is_fresh(latest: NaiveDate, today: NaiveDate, max_age_days: i64) -> bool {
    (today - latest).num_days() <= max_age_days
}

pub struct PriceCache {
    // Bars keyed by date, so re-saving a date overwrites it
    data: HashMap<TickerId, BTreeMap<NaiveDate, Bar>>,
}

impl PriceCache {
    pub fn new() -> Self {
        PriceCache { data: HashMap::new() }
    }

    /// Inserts or overwrites bars by `(ticker, date)`. Returns how many bars
    /// the ticker holds afterwards.
    pub fn upsert_bars(&mut self, ticker_id: TickerId, bars: impl IntoIterator<Item = Bar>) -> usize {
        let ticker_data = self.data.entry(ticker_id).or_default();
        for bar in bars {
            ticker_data.insert(bar.date, bar);
        }
        ticker_data.len()
    }

    pub fn get_series(&self, ticker_id: TickerId, symbol: &str) -> Result<Option<Series>, EngineError> {
        match self.data.get(&ticker_id) {
            Some(bars) if !bars.is_empty() => Series::new(symbol, bars.values().copied().collect()).map(Some),
            _ => Ok(None),
        }
    }

    pub fn latest_date(&self, ticker_id: TickerId) -> Option<NaiveDate> {
        self.data.get(&ticker_id).and_then(|bars| bars.keys().next_back().copied())
    }

    /// Whether the ticker has bars recent enough to skip a fetch.
    pub fn is_fresh(&self, ticker_id: TickerId, today: NaiveDate, max_age_days: i64) -> bool {
        self.latest_date(ticker_id).is_some_and(|latest| is_fresh(latest, today, max_age_days))
    }

    /// Drops every cached bar of the ticker.
    pub fn clear(&mut self, ticker_id: TickerId) -> bool {
        self.data.remove(&ticker_id).is_some()
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}
