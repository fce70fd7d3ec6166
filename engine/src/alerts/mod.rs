pub mod deduplicator;

pub use deduplicator::{alert_summary, deduplicate, validate_alerts};
