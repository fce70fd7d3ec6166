// Technical indicators module
pub mod atr;
pub mod ema;
pub mod engine;
pub mod gann_hilo;
pub mod ichimoku;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod supertrend;

pub use atr::Atr;
pub use ema::Ema;
pub use engine::IndicatorEngine;
pub use gann_hilo::{GannHiLo, GannHiLoOutput};
pub use ichimoku::{Ichimoku, IchimokuOutput};
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use sma::Sma;
pub use supertrend::{Supertrend, SupertrendOutput};

use serde::Serialize;
use serde_json::Value;
use shared::models::Bar;

use crate::error::EngineError;

// Common trait for all single-line indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>>; // None where the lookback window is not yet filled
}

/// Trend direction of Supertrend and Gann HiLo, reported as +1 / -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Which bar value an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    pub fn value(self, bar: &Bar) -> f64 {
        match self {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
            PriceField::Volume => bar.volume as f64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }

    pub fn extract(self, data: &[Bar]) -> Vec<Option<f64>> {
        data.iter().map(|bar| Some(self.value(bar))).collect()
    }
}

/// Mean of the last `window` values. A window containing a missing value
/// yields a missing value.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; values.len()];
    if window == 0 {
        return results;
    }
    for i in window.saturating_sub(1)..values.len() {
        let total = values[i + 1 - window..=i].iter().try_fold(0.0, |acc, v| v.map(|x| acc + x));
        results[i] = total.map(|sum| sum / window as f64);
    }
    results
}

/// Exponential moving average starting at the first defined value, seeded
/// with the SMA of the first `period` values. Stops at the next gap.
pub fn ema_of(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; values.len()];
    if period == 0 {
        return results;
    }
    let Some(start) = values.iter().position(Option::is_some) else {
        return results;
    };
    if values.len() - start < period {
        return results;
    }
    let Some(seed_sum) = values[start..start + period].iter().try_fold(0.0, |acc, v| v.map(|x| acc + x)) else {
        return results;
    };

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut previous_ema = seed_sum / period as f64;
    results[start + period - 1] = Some(previous_ema);

    for i in (start + period)..values.len() {
        let Some(value) = values[i] else { break };
        previous_ema = (value - previous_ema) * multiplier + previous_ema;
        results[i] = Some(previous_ema);
    }
    results
}

/// Shifts values `periods` bars forward; the first `periods` slots become missing.
pub fn shift_forward(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; values.len()];
    for i in periods..values.len() {
        results[i] = values[i - periods];
    }
    results
}

/// Builds a single-line calculator by name, e.g. `("rsi", {"period": 14})`.
pub fn calculator_from_spec(kind: &str, params: &Value) -> Result<Box<dyn IndicatorCalculator>, EngineError> {
    let period = |key: &str, default: usize| -> Result<usize, EngineError> {
        let value = match params.get(key) {
            None | Some(Value::Null) => default,
            Some(raw) => raw.as_u64().map(|n| n as usize).ok_or_else(|| {
                EngineError::ProcessingError(format!("Indicator parameter '{}' must be a whole number, got {}", key, raw))
            })?,
        };
        if value == 0 {
            return Err(EngineError::ProcessingError(format!("Indicator parameter '{}' cannot be 0", key)));
        }
        Ok(value)
    };

    let calculator: Box<dyn IndicatorCalculator> = match kind.to_lowercase().as_str() {
        "sma" => Box::new(Sma::new(period("period", 20)?)),
        "ema" => Box::new(Ema::new(period("period", 20)?)),
        "rsi" => Box::new(Rsi::new(period("period", 14)?)),
        "atr" => Box::new(Atr::new(period("period", 14)?)),
        "volume_ma" => Box::new(Sma::new(period("period", 20)?).on(PriceField::Volume)),
        "macd" => Box::new(Macd::new(period("fast", 12)?, period("slow", 26)?, period("signal", 9)?)),
        "supertrend" => {
            let multiplier = match params.get("multiplier") {
                None | Some(Value::Null) => 3.0,
                Some(raw) => raw.as_f64().ok_or_else(|| {
                    EngineError::ProcessingError(format!("Supertrend multiplier must be a number, got {}", raw))
                })?,
            };
            if multiplier <= 0.0 {
                return Err(EngineError::ProcessingError("Supertrend multiplier must be positive".to_string()));
            }
            Box::new(Supertrend::new(period("period", 10)?, multiplier))
        }
        "gann_hilo" => Box::new(GannHiLo::new(period("fast", 13)?, period("slow", 21)?)),
        _ => {
            tracing::error!(indicator_type = %kind, "Unknown indicator type requested");
            return Err(EngineError::ProcessingError(format!("Unknown indicator type: {}", kind)));
        }
    };
    Ok(calculator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_requires_full_window() {
        let values = vec![Some(1.0), None, Some(3.0), Some(5.0), Some(7.0)];
        assert_eq!(rolling_mean(&values, 2), vec![None, None, None, Some(4.0), Some(6.0)]);
        assert_eq!(rolling_mean(&values, 10), vec![None; 5]);
    }

    #[test]
    fn test_ema_of_starts_at_first_defined_value() {
        let values = vec![None, None, Some(10.0), Some(11.0), Some(12.0), Some(13.0)];
        let ema = ema_of(&values, 3);
        assert_eq!(ema[..4], [None, None, None, None]);
        assert_eq!(ema[4], Some(11.0));
        assert_eq!(ema[5], Some(12.0));
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Up.as_i8(), 1);
        assert_eq!(Direction::Down.as_i8(), -1);
    }

    #[test]
    fn test_shift_forward() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(shift_forward(&values, 2), vec![None, None, Some(1.0)]);
        assert_eq!(shift_forward(&values, 5), vec![None; 3]);
    }

    #[test]
    fn test_calculator_from_spec() {
        let rsi = calculator_from_spec("RSI", &serde_json::json!({ "period": 7 })).unwrap();
        assert_eq!(rsi.name(), "RSI(7)");
        assert_eq!(rsi.parameters(), serde_json::json!({ "period": 7 }));

        let macd = calculator_from_spec("macd", &Value::Null).unwrap();
        assert_eq!(macd.name(), "MACD(12,26,9)");

        assert!(calculator_from_spec("ema", &serde_json::json!({ "period": 0 })).is_err());
        assert!(calculator_from_spec("bollinger", &Value::Null).is_err());
    }

    #[test]
    fn test_calculator_from_spec_rejects_malformed_parameters() {
        for bad in [serde_json::json!("7"), serde_json::json!(7.5), serde_json::json!(-3)] {
            let result = calculator_from_spec("sma", &serde_json::json!({ "period": bad.clone() }));
            assert!(matches!(result, Err(EngineError::ProcessingError(_))), "accepted {}", bad);
        }
        assert!(calculator_from_spec("supertrend", &serde_json::json!({ "multiplier": "3" })).is_err());

        // Missing or null keys fall back to defaults
        let sma = calculator_from_spec("sma", &serde_json::json!({ "period": null })).unwrap();
        assert_eq!(sma.name(), "SMA(20)");
        assert!(calculator_from_spec("supertrend", &serde_json::json!({ "period": 7 })).is_ok());
    }
}
