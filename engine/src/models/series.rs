use chrono::NaiveDate;
use shared::models::Bar;

use crate::error::EngineError;

/// Bars for one ticker, ascending by date, without duplicate dates and
/// never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Builds a series from bars that are already in order.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, EngineError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(EngineError::EmptySeries { symbol });
        }

        for (idx, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(EngineError::InvalidSeries(format!(
                    "{}: bar {} ({}) has a non-positive or non-finite price",
                    symbol, idx, bar.date
                )));
            }
            if idx > 0 && bars[idx - 1].date >= bar.date {
                return Err(EngineError::InvalidSeries(format!(
                    "{}: bar {} ({}) is not after {}",
                    symbol,
                    idx,
                    bar.date,
                    bars[idx - 1].date
                )));
            }
        }

        Ok(Series { symbol, bars })
    }

    /// Sorts by date and keeps the last bar seen for a repeated date.
    pub fn from_unsorted(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self, EngineError> {
        // Stable sort, so equal dates keep their arrival order
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self::new(symbol, deduped)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest_date(&self) -> NaiveDate {
        // Non-empty by construction
        self.bars[self.bars.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close, high: close, low: close, close,
            volume: 100,
        }
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = Series::new("AAPL", vec![]).unwrap_err();
        assert!(matches!(err, EngineError::EmptySeries { ref symbol } if symbol == "AAPL"));
    }

    #[test]
    fn test_new_rejects_out_of_order_and_duplicates() {
        assert!(Series::new("T", vec![bar(2, 1.0), bar(1, 1.0)]).is_err());
        let err = Series::new("T", vec![bar(1, 1.0), bar(1, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("is not after"));
    }

    #[test]
    fn test_new_rejects_bad_prices() {
        assert!(Series::new("T", vec![bar(1, 0.0)]).is_err());
        assert!(Series::new("T", vec![bar(1, f64::NAN)]).is_err());
    }

    #[test]
    fn test_gaps_are_allowed() {
        let series = Series::new("T", vec![bar(1, 1.0), bar(5, 1.0), bar(6, 1.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.latest_date(), NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[test]
    fn test_from_unsorted_sorts_and_keeps_last_duplicate() {
        let series = Series::from_unsorted("T", vec![bar(3, 3.0), bar(1, 1.0), bar(3, 4.0), bar(2, 2.0)]).unwrap();
        let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 4.0]);
    }
}
