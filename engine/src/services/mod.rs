// Orchestration around the signal pipeline
pub mod alert_service;

pub use alert_service::{AlertService, RefreshOutcome, RefreshStats, TickerError};
