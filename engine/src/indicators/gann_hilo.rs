// Gann HiLo activator
use super::{rolling_mean, Direction, IndicatorCalculator, PriceField};
use serde_json::Value;
use shared::models::Bar;

/// Trend-following line: SMA of lows while the trend is up, SMA of highs
/// while it is down. The trend flips when the close breaks the previous
/// bar's opposite average.
pub struct GannHiLo {
    name: String,
    fast: usize,
    slow: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GannHiLoOutput {
    pub hilo: Vec<f64>,
    pub direction: Vec<Direction>,
}

impl GannHiLo {
    /// `fast` averages the highs, `slow` the lows.
    pub fn new(fast: usize, slow: usize) -> Self {
        Self {
            name: format!("GANN_HILO({},{})", fast, slow),
            fast,
            slow,
        }
    }

    pub fn compute(&self, data: &[Bar]) -> GannHiLoOutput {
        let sma_high = rolling_mean(&PriceField::High.extract(data), self.fast);
        let sma_low = rolling_mean(&PriceField::Low.extract(data), self.slow);

        let mut hilo = Vec::with_capacity(data.len());
        let mut direction = Vec::with_capacity(data.len());
        let Some(first) = data.first() else {
            return GannHiLoOutput { hilo, direction };
        };
        hilo.push(first.close);
        direction.push(Direction::Up);

        for i in 1..data.len() {
            let close = data[i].close;
            let previous = direction[i - 1];
            let trend = match (sma_high[i - 1], sma_low[i - 1]) {
                (Some(high), _) if close > high => Direction::Up,
                (_, Some(low)) if close < low => Direction::Down,
                _ => previous,
            };
            let active = match trend {
                Direction::Up => sma_low[i],
                Direction::Down => sma_high[i],
            };
            hilo.push(active.unwrap_or(hilo[i - 1]));
            direction.push(trend);
        }

        GannHiLoOutput { hilo, direction }
    }
}

impl IndicatorCalculator for GannHiLo {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        self.compute(data).hilo.into_iter().map(Some).collect()
    }
}
