// Supertrend indicator implementation
use super::{Atr, Direction, IndicatorCalculator};
use serde_json::Value;
use shared::models::Bar;

pub struct Supertrend {
    name: String,
    period: usize,
    multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupertrendOutput {
    pub line: Vec<Option<f64>>,
    pub direction: Vec<Option<Direction>>,
}

impl Supertrend {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self {
            name: format!("SUPERTREND({},{})", period, multiplier),
            period,
            multiplier,
        }
    }

    pub fn compute(&self, data: &[Bar]) -> SupertrendOutput {
        let len = data.len();
        let mut line = vec![None; len];
        let mut direction = vec![None; len];

        let atr = Atr::new(self.period).calculate(data);
        let Some(start) = atr.iter().position(Option::is_some) else {
            return SupertrendOutput { line, direction };
        };

        let mut upper = vec![0.0; len];
        let mut lower = vec![0.0; len];
        for i in start..len {
            let hl2 = (data[i].high + data[i].low) / 2.0;
            let band = self.multiplier * atr[i].unwrap_or_default();
            upper[i] = hl2 + band;
            lower[i] = hl2 - band;
        }

        let mut trend = Direction::Up;
        direction[start] = Some(trend);
        line[start] = Some(lower[start]);

        for i in (start + 1)..len {
            let close = data[i].close;
            if close > upper[i - 1] {
                trend = Direction::Up;
            } else if close < lower[i - 1] {
                trend = Direction::Down;
            } else {
                // Trend persists; the active band only tightens
                match trend {
                    Direction::Up if lower[i] < lower[i - 1] => lower[i] = lower[i - 1],
                    Direction::Down if upper[i] > upper[i - 1] => upper[i] = upper[i - 1],
                    _ => {}
                }
            }
            direction[i] = Some(trend);
            line[i] = Some(match trend {
                Direction::Up => lower[i],
                Direction::Down => upper[i],
            });
        }

        SupertrendOutput { line, direction }
    }
}

impl IndicatorCalculator for Supertrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "multiplier": self.multiplier })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        self.compute(data).line
    }
}
