use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TickerId = i64;

/// One trading day's OHLCV reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker {
    pub id: TickerId,
    pub symbol: String,
}

impl Ticker {
    pub fn new(id: TickerId, symbol: impl Into<String>) -> Self {
        Self { id, symbol: symbol.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LongOpen,
    LongClose,
    ShortOpen,
    ShortClose,
}

impl AlertType {
    pub fn is_open(self) -> bool {
        matches!(self, AlertType::LongOpen | AlertType::ShortOpen)
    }

    pub fn is_close(self) -> bool {
        !self.is_open()
    }

    /// The close that ends a position opened by `self`. Closes map to themselves.
    pub fn matching_close(self) -> AlertType {
        match self {
            AlertType::LongOpen | AlertType::LongClose => AlertType::LongClose,
            AlertType::ShortOpen | AlertType::ShortClose => AlertType::ShortClose,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::LongOpen => "LONG_OPEN",
            AlertType::LongClose => "LONG_CLOSE",
            AlertType::ShortOpen => "SHORT_OPEN",
            AlertType::ShortClose => "SHORT_CLOSE",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(' ', "_").as_str() {
            "LONG_OPEN" => Ok(AlertType::LongOpen),
            "LONG_CLOSE" => Ok(AlertType::LongClose),
            "SHORT_OPEN" => Ok(AlertType::ShortOpen),
            "SHORT_CLOSE" => Ok(AlertType::ShortClose),
            other => Err(anyhow::anyhow!("Unknown alert type '{}'", other)),
        }
    }
}

/// Per-bar signal label. When a bar carries two events (auto-flip) the
/// open wins: LONG OPEN > SHORT OPEN > LONG CLOSE > SHORT CLOSE > HOLD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalLabel {
    #[serde(rename = "LONG OPEN")]
    LongOpen,
    #[serde(rename = "SHORT OPEN")]
    ShortOpen,
    #[serde(rename = "LONG CLOSE")]
    LongClose,
    #[serde(rename = "SHORT CLOSE")]
    ShortClose,
    #[serde(rename = "HOLD")]
    Hold,
}

impl SignalLabel {
    pub fn alert_type(self) -> Option<AlertType> {
        match self {
            SignalLabel::LongOpen => Some(AlertType::LongOpen),
            SignalLabel::ShortOpen => Some(AlertType::ShortOpen),
            SignalLabel::LongClose => Some(AlertType::LongClose),
            SignalLabel::ShortClose => Some(AlertType::ShortClose),
            SignalLabel::Hold => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalLabel::LongOpen => "LONG OPEN",
            SignalLabel::ShortOpen => "SHORT OPEN",
            SignalLabel::LongClose => "LONG CLOSE",
            SignalLabel::ShortClose => "SHORT CLOSE",
            SignalLabel::Hold => "HOLD",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deduplicated open or close signal for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_type: AlertType,
    pub signal_date: NaiveDate,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_type_round_trips_through_db_names() {
        for t in [AlertType::LongOpen, AlertType::LongClose, AlertType::ShortOpen, AlertType::ShortClose] {
            assert_eq!(t.as_str().parse::<AlertType>().unwrap(), t);
        }
        // Labels with a space are accepted too
        assert_eq!("short close".parse::<AlertType>().unwrap(), AlertType::ShortClose);
        assert!("HOLD".parse::<AlertType>().is_err());
    }

    #[test]
    fn matching_close_pairs_sides() {
        assert_eq!(AlertType::LongOpen.matching_close(), AlertType::LongClose);
        assert_eq!(AlertType::ShortOpen.matching_close(), AlertType::ShortClose);
        assert!(AlertType::LongClose.is_close());
        assert!(!AlertType::ShortOpen.is_close());
    }

    #[test]
    fn alert_serializes_with_db_type_name() {
        let alert = Alert {
            alert_type: AlertType::ShortOpen,
            signal_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            price: 12.5,
        };
        let json = serde_json::to_value(alert).unwrap();
        assert_eq!(json["alert_type"], "SHORT_OPEN");
        assert_eq!(json["signal_date"], "2024-03-05");
    }

    #[test]
    fn hold_label_has_no_alert_type() {
        assert_eq!(SignalLabel::Hold.alert_type(), None);
        assert_eq!(SignalLabel::LongClose.alert_type(), Some(AlertType::LongClose));
        assert_eq!(SignalLabel::ShortOpen.to_string(), "SHORT OPEN");
    }
}
