// Moving Average Convergence Divergence (MACD) indicator implementation
use super::{ema_of, IndicatorCalculator, PriceField};
use serde_json::Value;
use shared::models::Bar;

pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
        }
    }

    pub fn compute(&self, data: &[Bar]) -> MacdOutput {
        let closes = PriceField::Close.extract(data);
        let fast = ema_of(&closes, self.fast);
        let slow = ema_of(&closes, self.slow);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();
        let signal = ema_of(&macd, self.signal);
        let histogram = macd
            .iter()
            .zip(&signal)
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m - s),
                _ => None,
            })
            .collect();

        MacdOutput { macd, signal, histogram }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    /// The MACD line; use `compute` for signal and histogram.
    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        self.compute(data).macd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_bar(close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            open: close, high: close, low: close, close,
            volume: 0,
        }
    }

    #[test]
    fn test_macd_warmup() {
        let bars: Vec<Bar> = (0..40).map(|i| create_bar(100.0 + i as f64)).collect();
        let output = Macd::new(12, 26, 9).compute(&bars);

        // Line from the slow EMA seed, signal 8 bars later
        assert!(output.macd[24].is_none());
        assert!(output.macd[25].is_some());
        assert!(output.signal[32].is_none());
        assert!(output.signal[33].is_some());
        assert!(output.histogram[32].is_none());
        assert!(output.histogram[33].is_some());
    }

    #[test]
    fn test_macd_positive_on_linear_uptrend() {
        let bars: Vec<Bar> = (0..60).map(|i| create_bar(50.0 + i as f64)).collect();
        let output = Macd::new(3, 6, 3).compute(&bars);
        let last = output.macd.last().copied().flatten().unwrap();
        assert!(last > 0.0);
        // Constant slope: the line converges to (6 - 3) / 2 = 1.5
        assert!((last - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_macd_short_series_is_missing() {
        let bars = vec![create_bar(1.0); 10];
        let output = Macd::new(12, 26, 9).compute(&bars);
        assert!(output.macd.iter().all(Option::is_none));
        assert!(output.signal.iter().all(Option::is_none));
    }
}
