use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{Bar, SignalLabel};

use crate::indicators::Direction;
use crate::signals::{Position, SignalFlags, TrackedSignals};

/// A series with one column per indicator. Every column has one entry per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_hist: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub rsi_ma: Vec<Option<f64>>,
    pub supertrend: Vec<Option<f64>>,
    pub supertrend_direction: Vec<Option<Direction>>,
    pub ichimoku_conversion: Vec<Option<f64>>,
    pub ichimoku_base: Vec<Option<f64>>,
    pub ichimoku_span_a: Vec<Option<f64>>,
    pub ichimoku_span_b: Vec<Option<f64>>,
    /// Defined from bar 0.
    pub gann_hilo: Vec<f64>,
    pub gann_direction: Vec<Direction>,
    /// Keyed by period.
    pub emas: BTreeMap<usize, Vec<Option<f64>>>,
    pub volume_ma: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn ema(&self, period: usize) -> Option<&[Option<f64>]> {
        self.emas.get(&period).map(Vec::as_slice)
    }
}

/// An indicator frame annotated with tracked position events.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFrame {
    pub indicators: IndicatorFrame,
    pub long_open: Vec<bool>,
    pub long_close: Vec<bool>,
    pub short_open: Vec<bool>,
    pub short_close: Vec<bool>,
    pub labels: Vec<SignalLabel>,
    pub final_position: Position,
}

/// Date, close and label of one bar; the deduplicator's input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Option<SignalLabel>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalCounts {
    pub long_open: usize,
    pub long_close: usize,
    pub short_open: usize,
    pub short_close: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalDates {
    pub long_open: Vec<NaiveDate>,
    pub long_close: Vec<NaiveDate>,
    pub short_open: Vec<NaiveDate>,
    pub short_close: Vec<NaiveDate>,
}

impl SignalFrame {
    pub fn new(indicators: IndicatorFrame, tracked: TrackedSignals) -> Self {
        let len = tracked.events.len();
        let mut frame = SignalFrame {
            indicators,
            long_open: Vec::with_capacity(len),
            long_close: Vec::with_capacity(len),
            short_open: Vec::with_capacity(len),
            short_close: Vec::with_capacity(len),
            labels: Vec::with_capacity(len),
            final_position: tracked.final_position,
        };
        for flags in tracked.events {
            frame.long_open.push(flags.long_open);
            frame.long_close.push(flags.long_close);
            frame.short_open.push(flags.short_open);
            frame.short_close.push(flags.short_close);
            frame.labels.push(flags.label());
        }
        frame
    }

    pub fn symbol(&self) -> &str {
        &self.indicators.symbol
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn flags_at(&self, idx: usize) -> SignalFlags {
        SignalFlags {
            long_open: self.long_open[idx],
            long_close: self.long_close[idx],
            short_open: self.short_open[idx],
            short_close: self.short_close[idx],
        }
    }

    /// One row per bar; every bar carries a label, HOLD included.
    pub fn rows(&self) -> Vec<SignalRow> {
        self.indicators
            .bars
            .iter()
            .zip(&self.labels)
            .map(|(bar, label)| SignalRow { date: bar.date, close: bar.close, signal: Some(*label) })
            .collect()
    }

    pub fn signal_counts(&self) -> SignalCounts {
        let count = |column: &[bool]| column.iter().filter(|v| **v).count();
        SignalCounts {
            long_open: count(&self.long_open),
            long_close: count(&self.long_close),
            short_open: count(&self.short_open),
            short_close: count(&self.short_close),
        }
    }

    pub fn signal_dates(&self) -> SignalDates {
        let bars = &self.indicators.bars;
        let dates = |column: &[bool]| -> Vec<NaiveDate> {
            column.iter().zip(bars).filter(|(v, _)| **v).map(|(_, bar)| bar.date).collect()
        };
        SignalDates {
            long_open: dates(&self.long_open),
            long_close: dates(&self.long_close),
            short_open: dates(&self.short_open),
            short_close: dates(&self.short_close),
        }
    }
}
