// Simple Moving Average (SMA) indicator implementation
use super::{rolling_mean, IndicatorCalculator, PriceField};
use serde_json::Value;
use shared::models::Bar;

pub struct Sma {
    name: String,
    period: usize,
    field: PriceField,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
            field: PriceField::Close,
        }
    }

    /// Averages another bar field instead of the close.
    pub fn on(mut self, field: PriceField) -> Self {
        self.field = field;
        if field != PriceField::Close {
            self.name = format!("SMA({},{})", self.period, field.as_str());
        }
        self
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "field": self.field.as_str() })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        rolling_mean(&self.field.extract(data), self.period)
    }
}
