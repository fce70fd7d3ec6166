// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::Bar;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0 // No losses in the window
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        }
    }
}

impl IndicatorCalculator for Rsi {
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

        let mut results = vec![None; self.period]; // RSI needs 'period' initial changes

        let mut gains = 0.0;
        let mut losses = 0.0;
        for i in 1..=self.period {
            let change = data[i].close - data[i - 1].close;
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }

        let mut avg_gain = gains / self.period as f64;
        let mut avg_loss = losses / self.period as f64;
        results.push(Some(Self::value(avg_gain, avg_loss)));

        // Wilder smoothing
        for i in (self.period + 1)..data.len() {
            let change = data[i].close - data[i - 1].close;
            let (current_gain, current_loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };

            avg_gain = (avg_gain * (self.period - 1) as f64 + current_gain) / self.period as f64;
            avg_loss = (avg_loss * (self.period - 1) as f64 + current_loss) / self.period as f64;
            results.push(Some(Self::value(avg_gain, avg_loss)));
        }
        results
    }
}
