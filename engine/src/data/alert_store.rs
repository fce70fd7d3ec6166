use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{Alert, AlertType, Ticker, TickerId};

use crate::config::AlertListSettings;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredAlert {
    pub id: u64,
    pub ticker_id: TickerId,
    pub symbol: String,
    pub alert_type: AlertType,
    pub signal_date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters and paging for [`AlertStore::list_alerts`]. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertQuery {
    pub ticker_ids: Vec<TickerId>,
    pub alert_types: Vec<AlertType>,
    /// 1-based; 0 is read as 1.
    pub page: usize,
    pub page_size: Option<usize>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPage {
    pub alerts: Vec<StoredAlert>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

pub trait AlertStore: Send + Sync {
    /// Deletes every alert of the ticker and inserts `alerts` in its place.
    /// Either all of it happens or none of it.
    fn replace_alerts(&mut self, ticker: &Ticker, alerts: &[Alert]) -> Result<usize, EngineError>;

    fn list_alerts(&self, query: &AlertQuery) -> Result<AlertPage, EngineError>;
}

pub struct InMemoryAlertStore {
    alerts: Vec<StoredAlert>,
    next_id: u64,
    settings: AlertListSettings,
}

impl InMemoryAlertStore {
    pub fn new(settings: AlertListSettings) -> Self {
        Self { alerts: Vec::new(), next_id: 1, settings }
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Default for InMemoryAlertStore {
    fn default() -> Self {
        Self::new(AlertListSettings::default())
    }
}

impl AlertStore for InMemoryAlertStore {
    fn replace_alerts(&mut self, ticker: &Ticker, alerts: &[Alert]) -> Result<usize, EngineError> {
        if alerts.len() > 2 {
            return Err(EngineError::AlertStoreError(format!(
                "refusing to store {} alerts for {}; at most 2 are kept per ticker",
                alerts.len(),
                ticker.symbol
            )));
        }

        // Validated before touching the table, so a failure leaves it unchanged
        self.alerts.retain(|a| a.ticker_id != ticker.id);
        for alert in alerts {
            self.alerts.push(StoredAlert {
                id: self.next_id,
                ticker_id: ticker.id,
                symbol: ticker.symbol.clone(),
                alert_type: alert.alert_type,
                signal_date: alert.signal_date,
                price: alert.price,
            });
            self.next_id += 1;
        }
        Ok(alerts.len())
    }

    fn list_alerts(&self, query: &AlertQuery) -> Result<AlertPage, EngineError> {
        if self.settings.max_page_size == 0 {
            return Err(EngineError::ConfigError("alerts.max_page_size must be positive".to_string()));
        }
        let page_size = query
            .page_size
            .unwrap_or(self.settings.default_page_size)
            .clamp(1, self.settings.max_page_size);
        let page = query.page.max(1);

        let mut matching: Vec<&StoredAlert> = self
            .alerts
            .iter()
            .filter(|a| query.ticker_ids.is_empty() || query.ticker_ids.contains(&a.ticker_id))
            .filter(|a| query.alert_types.is_empty() || query.alert_types.contains(&a.alert_type))
            .collect();
        matching.sort_by_key(|a| (a.signal_date, a.id));
        if query.sort == SortOrder::Desc {
            matching.reverse();
        }

        let total = matching.len();
        let alerts = matching.into_iter().skip((page - 1) * page_size).take(page_size).cloned().collect();
        Ok(AlertPage { alerts, total, page, page_size, total_pages: total.div_ceil(page_size) })
    }
}
