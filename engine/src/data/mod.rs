// Price sources, caching and alert persistence
pub mod alert_store;
pub mod clock;
pub mod csv_parser;
pub mod price_cache;
pub mod price_source;

pub use alert_store::{AlertPage, AlertQuery, AlertStore, InMemoryAlertStore, SortOrder, StoredAlert};
pub use clock::{Clock, FixedClock, SystemClock};
pub use csv_parser::BarCsvParser;
pub use price_cache::PriceCache;
pub use price_source::{CsvPriceSource, PriceSource, PriceSourceError};
