// Engine-side views over the shared bar model.
pub mod frame;
pub mod series;

pub use frame::{IndicatorFrame, SignalCounts, SignalDates, SignalFrame, SignalRow};
pub use series::Series;
