// Average True Range (ATR) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::Bar;

pub struct Atr {
    name: String,
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ATR({})", period),
            period,
        }
    }
}

/// True range per bar; undefined on bar 0, which has no previous close.
pub fn true_range(data: &[Bar]) -> Vec<Option<f64>> {
    let mut results = vec![None; data.len()];
    for i in 1..data.len() {
        let previous_close = data[i - 1].close;
        let bar = &data[i];
        let range = (bar.high - bar.low)
            .max((bar.high - previous_close).abs())
            .max((bar.low - previous_close).abs());
        results[i] = Some(range);
    }
    results
}

impl IndicatorCalculator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        if data.len() <= self.period || self.period == 0 {
            return vec![None; data.len()];
        }

        let ranges: Vec<f64> = true_range(data).into_iter().flatten().collect();
        let mut results = vec![None; self.period];

        let mut atr = ranges[..self.period].iter().sum::<f64>() / self.period as f64;
        results.push(Some(atr));

        for range in &ranges[self.period..] {
            atr = (atr * (self.period - 1) as f64 + range) / self.period as f64;
            results.push(Some(atr));
        }
        results
    }
}
