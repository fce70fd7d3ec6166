use tracing::debug;

use super::SignalFlags;
use crate::models::IndicatorFrame;

/// Untracked entry/exit conditions, one flag per bar and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConditions {
    pub long_open: Vec<bool>,
    pub long_close: Vec<bool>,
    pub short_open: Vec<bool>,
    pub short_close: Vec<bool>,
}

impl RawConditions {
    pub fn from_flags(flags: impl IntoIterator<Item = SignalFlags>) -> Self {
        let mut raw = RawConditions::default();
        for f in flags {
            raw.long_open.push(f.long_open);
            raw.long_close.push(f.long_close);
            raw.short_open.push(f.short_open);
            raw.short_close.push(f.short_close);
        }
        raw
    }

    pub fn len(&self) -> usize {
        self.long_open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.long_open.is_empty()
    }

    pub fn flags_at(&self, idx: usize) -> SignalFlags {
        SignalFlags {
            long_open: self.long_open[idx],
            long_close: self.long_close[idx],
            short_open: self.short_open[idx],
            short_close: self.short_close[idx],
        }
    }
}

// Comparisons against a missing operand are false.
fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

pub fn detect_raw_conditions(frame: &IndicatorFrame) -> RawConditions {
    let len = frame.len();
    let mut raw = RawConditions {
        long_open: Vec::with_capacity(len),
        long_close: Vec::with_capacity(len),
        short_open: Vec::with_capacity(len),
        short_close: Vec::with_capacity(len),
    };

    for i in 0..len {
        let bar = &frame.bars[i];
        let close = Some(bar.close);
        let gann = Some(frame.gann_hilo[i]);
        let macd = frame.macd[i];
        let signal = frame.macd_signal[i];
        let rsi = frame.rsi[i];
        let rsi_ma = frame.rsi_ma[i];
        let supertrend = frame.supertrend[i];
        let previous = i.checked_sub(1);
        let prev_high = previous.map(|p| frame.bars[p].high);
        let prev_low = previous.map(|p| frame.bars[p].low);
        let prev_macd = previous.and_then(|p| frame.macd[p]);

        let (span_a, span_b) = (frame.ichimoku_span_a[i], frame.ichimoku_span_b[i]);
        let in_cloud = (lt(close, span_a) && gt(close, span_b)) || (gt(close, span_a) && lt(close, span_b));

        raw.long_open.push(
            gt(macd, signal) && gt(close, gann) && gt(rsi, rsi_ma) && gt(close, supertrend) && gt(close, prev_high),
        );
        raw.long_close.push(lt(close, gann) || lt(macd, signal) || in_cloud);
        raw.short_open.push(
            lt(macd, signal)
                && lt(macd, prev_macd)
                && lt(close, gann)
                && lt(rsi, rsi_ma)
                && lt(close, supertrend)
                && lt(close, prev_low),
        );
        raw.short_close.push(gt(close, gann) || gt(macd, signal) || in_cloud);
    }

    debug!(
        symbol = %frame.symbol,
        long_open = raw.long_open.iter().filter(|v| **v).count(),
        short_open = raw.short_open.iter().filter(|v| **v).count(),
        "Raw conditions detected"
    );
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Direction;
    use chrono::{Duration, NaiveDate};
    use shared::models::Bar;
    use std::collections::BTreeMap;

    fn frame(closes: &[f64]) -> IndicatorFrame {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let len = closes.len();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, c)| Bar {
                date: start + Duration::days(i as i64),
                open: *c,
                high: c + 1.0,
                low: c - 1.0,
                close: *c,
                volume: 100,
            })
            .collect();
        IndicatorFrame {
            symbol: "TEST".to_string(),
            bars,
            macd: vec![None; len],
            macd_signal: vec![None; len],
            macd_hist: vec![None; len],
            rsi: vec![None; len],
            rsi_ma: vec![None; len],
            supertrend: vec![None; len],
            supertrend_direction: vec![None; len],
            ichimoku_conversion: vec![None; len],
            ichimoku_base: vec![None; len],
            ichimoku_span_a: vec![None; len],
            ichimoku_span_b: vec![None; len],
            gann_hilo: closes.to_vec(),
            gann_direction: vec![Direction::Up; len],
            emas: BTreeMap::new(),
            volume_ma: vec![None; len],
        }
    }

    #[test]
    fn test_missing_operands_are_false() {
        let raw = detect_raw_conditions(&frame(&[10.0, 10.0, 10.0]));
        assert_eq!(raw.len(), 3);
        assert!(raw.long_open.iter().chain(&raw.long_close).all(|v| !v));
        assert!(raw.short_open.iter().chain(&raw.short_close).all(|v| !v));
    }

    #[test]
    fn test_long_open_requires_every_term() {
        let mut f = frame(&[10.0, 12.0]);
        f.gann_hilo = vec![9.0, 11.0];
        f.macd = vec![Some(0.5), Some(1.0)];
        f.macd_signal = vec![Some(0.4), Some(0.8)];
        f.rsi = vec![Some(60.0), Some(65.0)];
        f.rsi_ma = vec![Some(55.0), Some(58.0)];
        f.supertrend = vec![Some(8.0), Some(9.0)];

        let raw = detect_raw_conditions(&f);
        // Bar 0 has no previous high
        assert!(!raw.long_open[0]);
        // 12 > previous high 11
        assert!(raw.long_open[1]);
        assert!(raw.short_close[1]);
        assert!(!raw.long_close[1]);

        f.rsi_ma[1] = None;
        assert!(!detect_raw_conditions(&f).long_open[1]);
    }

    #[test]
    fn test_short_open_requires_falling_macd() {
        let mut f = frame(&[20.0, 18.0]);
        f.gann_hilo = vec![21.0, 19.0];
        f.macd = vec![Some(-0.5), Some(-0.7)];
        f.macd_signal = vec![Some(-0.2), Some(-0.3)];
        f.rsi = vec![Some(40.0), Some(35.0)];
        f.rsi_ma = vec![Some(45.0), Some(44.0)];
        f.supertrend = vec![Some(22.0), Some(21.0)];

        assert!(detect_raw_conditions(&f).short_open[1]);

        f.macd[0] = Some(-0.8);
        assert!(!detect_raw_conditions(&f).short_open[1]);
    }

    #[test]
    fn test_in_cloud_closes_both_sides() {
        let mut f = frame(&[10.0, 10.0]);
        f.ichimoku_span_a = vec![Some(9.0), Some(11.0)];
        f.ichimoku_span_b = vec![Some(11.0), Some(9.0)];
        let raw = detect_raw_conditions(&f);
        assert_eq!(raw.long_close, vec![true, true]);
        assert_eq!(raw.short_close, vec![true, true]);

        // On the edge of the cloud is not inside it
        f.ichimoku_span_a = vec![Some(10.0), Some(10.0)];
        let raw = detect_raw_conditions(&f);
        assert_eq!(raw.long_close, vec![false, false]);
    }
}
