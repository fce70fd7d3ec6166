// Exponential Moving Average (EMA) indicator implementation
use super::{ema_of, IndicatorCalculator, PriceField};
use serde_json::Value;
use shared::models::Bar;

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        // Seeded with the SMA of the first `period` closes
        ema_of(&PriceField::Close.extract(data), self.period)
    }
}
