use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::{
    rolling_mean, Ema, GannHiLo, Ichimoku, IndicatorCalculator, Macd, PriceField, Rsi, Sma, Supertrend,
};
use crate::config::IndicatorSettings;
use crate::models::{IndicatorFrame, Series};

/// Computes every indicator column of a series with one parameter set.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
}

impl IndicatorEngine {
    pub fn new(settings: IndicatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    pub fn compute(&self, series: &Series) -> IndicatorFrame {
        let symbol = series.symbol();
        let bars = series.bars();
        let s = &self.settings;
        debug!(symbol = %symbol, bars = bars.len(), "Computing indicators");

        let macd = Macd::new(s.macd.fast, s.macd.slow, s.macd.signal).compute(bars);
        let rsi = Rsi::new(s.rsi.period).calculate(bars);
        let rsi_ma = rolling_mean(&rsi, s.rsi.ma_period);
        let supertrend = Supertrend::new(s.supertrend.period, s.supertrend.multiplier).compute(bars);
        let ichimoku = Ichimoku::new(
            s.ichimoku.conversion,
            s.ichimoku.base,
            s.ichimoku.span_b,
            s.ichimoku.displacement,
        )
        .compute(bars);
        let gann = GannHiLo::new(s.gann_hilo.fast, s.gann_hilo.slow).compute(bars);
        let emas: BTreeMap<usize, Vec<Option<f64>>> = s
            .ema_periods
            .iter()
            .map(|period| (*period, checked(symbol, &format!("ema_{}", period), Ema::new(*period).calculate(bars))))
            .collect();
        let volume_ma = Sma::new(s.volume_ma_period).on(PriceField::Volume).calculate(bars);

        let frame = IndicatorFrame {
            symbol: symbol.to_string(),
            bars: bars.to_vec(),
            macd: checked(symbol, "macd", macd.macd),
            macd_signal: checked(symbol, "macd_signal", macd.signal),
            macd_hist: macd.histogram,
            rsi: checked(symbol, "rsi", rsi),
            rsi_ma: checked(symbol, "rsi_ma", rsi_ma),
            supertrend: checked(symbol, "supertrend", supertrend.line),
            supertrend_direction: supertrend.direction,
            ichimoku_conversion: checked(symbol, "ichimoku_conversion", ichimoku.conversion),
            ichimoku_base: checked(symbol, "ichimoku_base", ichimoku.base),
            ichimoku_span_a: checked(symbol, "ichimoku_span_a", ichimoku.span_a),
            ichimoku_span_b: checked(symbol, "ichimoku_span_b", ichimoku.span_b),
            gann_hilo: gann.hilo,
            gann_direction: gann.direction,
            emas,
            volume_ma: checked(symbol, "volume_ma", volume_ma),
        };

        info!(symbol = %symbol, bars = frame.len(), "Indicators calculated");
        frame
    }
}

// A column with no defined value means the series is shorter than the lookback.
fn checked(symbol: &str, column: &str, values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    if !values.is_empty() && values.iter().all(Option::is_none) {
        warn!(symbol = %symbol, indicator = column, bars = values.len(), "Indicator has no defined values");
    }
    values
}
