// Engine settings, loaded from a JSON config file or taken from defaults
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_RSI_MA_PERIOD: usize = 14;
pub const DEFAULT_SUPERTREND_PERIOD: usize = 10;
pub const DEFAULT_SUPERTREND_MULTIPLIER: f64 = 3.0;
pub const DEFAULT_ICHIMOKU_CONVERSION: usize = 9;
pub const DEFAULT_ICHIMOKU_BASE: usize = 26;
pub const DEFAULT_ICHIMOKU_SPAN_B: usize = 52;
pub const DEFAULT_ICHIMOKU_DISPLACEMENT: usize = 26;
pub const DEFAULT_GANN_FAST: usize = 13;
pub const DEFAULT_GANN_SLOW: usize = 21;
pub const DEFAULT_EMA_PERIODS: [usize; 3] = [8, 21, 50];
pub const DEFAULT_VOLUME_MA_PERIOD: usize = 20;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Directory holding `<SYMBOL>.csv` price files for the CSV price source.
    pub data_dir: PathBuf,
    pub refresh: RefreshSettings,
    pub cache: CacheSettings,
    pub alerts: AlertListSettings,
    pub indicators: IndicatorSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            data_dir: PathBuf::from("data"),
            refresh: RefreshSettings::default(),
            cache: CacheSettings::default(),
            alerts: AlertListSettings::default(),
            indicators: IndicatorSettings::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RefreshSettings {
    /// Tickers processed at once by a bulk refresh. `1` means sequential
    /// with `rate_limit_ms` between tickers.
    pub max_concurrency: usize,
    pub rate_limit_ms: u64,
    /// Attempts per fetch when the price source reports a transient failure.
    pub fetch_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        RefreshSettings {
            max_concurrency: 1,
            rate_limit_ms: 500,
            fetch_retries: 3,
            retry_backoff_ms: 250,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// A cached series is fresh while its latest bar is at most this many
    /// calendar days old.
    pub max_age_days: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings { max_age_days: 1 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AlertListSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for AlertListSettings {
    fn default() -> Self {
        AlertListSettings { default_page_size: 50, max_page_size: 200 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub macd: MacdSettings,
    pub rsi: RsiSettings,
    pub supertrend: SupertrendSettings,
    pub ichimoku: IchimokuSettings,
    pub gann_hilo: GannHiLoSettings,
    pub ema_periods: Vec<usize>,
    pub volume_ma_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            macd: MacdSettings::default(),
            rsi: RsiSettings::default(),
            supertrend: SupertrendSettings::default(),
            ichimoku: IchimokuSettings::default(),
            gann_hilo: GannHiLoSettings::default(),
            ema_periods: DEFAULT_EMA_PERIODS.to_vec(),
            volume_ma_period: DEFAULT_VOLUME_MA_PERIOD,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MacdSettings {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdSettings {
    fn default() -> Self {
        MacdSettings { fast: DEFAULT_MACD_FAST, slow: DEFAULT_MACD_SLOW, signal: DEFAULT_MACD_SIGNAL }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RsiSettings {
    pub period: usize,
    pub ma_period: usize,
}

impl Default for RsiSettings {
    fn default() -> Self {
        RsiSettings { period: DEFAULT_RSI_PERIOD, ma_period: DEFAULT_RSI_MA_PERIOD }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SupertrendSettings {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for SupertrendSettings {
    fn default() -> Self {
        SupertrendSettings { period: DEFAULT_SUPERTREND_PERIOD, multiplier: DEFAULT_SUPERTREND_MULTIPLIER }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct IchimokuSettings {
    pub conversion: usize,
    pub base: usize,
    pub span_b: usize,
    pub displacement: usize,
}

impl Default for IchimokuSettings {
    fn default() -> Self {
        IchimokuSettings {
            conversion: DEFAULT_ICHIMOKU_CONVERSION,
            base: DEFAULT_ICHIMOKU_BASE,
            span_b: DEFAULT_ICHIMOKU_SPAN_B,
            displacement: DEFAULT_ICHIMOKU_DISPLACEMENT,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GannHiLoSettings {
    /// SMA window over highs.
    pub fast: usize,
    /// SMA window over lows.
    pub slow: usize,
}

impl Default for GannHiLoSettings {
    fn default() -> Self {
        GannHiLoSettings { fast: DEFAULT_GANN_FAST, slow: DEFAULT_GANN_SLOW }
    }
}

impl EngineSettings {
    /// Reads settings from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let settings = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(raw)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the invariants serde cannot express. All problems are reported at once.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut errors: Vec<String> = Vec::new();
        let ind = &self.indicators;

        let periods = [
            ("indicators.macd.fast", ind.macd.fast),
            ("indicators.macd.slow", ind.macd.slow),
            ("indicators.macd.signal", ind.macd.signal),
            ("indicators.rsi.period", ind.rsi.period),
            ("indicators.rsi.ma_period", ind.rsi.ma_period),
            ("indicators.supertrend.period", ind.supertrend.period),
            ("indicators.ichimoku.conversion", ind.ichimoku.conversion),
            ("indicators.ichimoku.base", ind.ichimoku.base),
            ("indicators.ichimoku.span_b", ind.ichimoku.span_b),
            ("indicators.gann_hilo.fast", ind.gann_hilo.fast),
            ("indicators.gann_hilo.slow", ind.gann_hilo.slow),
            ("indicators.volume_ma_period", ind.volume_ma_period),
        ];
        for (name, value) in periods {
            if value == 0 {
                errors.push(format!("{} must be greater than 0", name));
            }
        }
        if ind.macd.fast >= ind.macd.slow {
            errors.push(format!(
                "indicators.macd: fast ({}) must be below slow ({})",
                ind.macd.fast, ind.macd.slow
            ));
        }
        if ind.supertrend.multiplier.is_nan() || ind.supertrend.multiplier <= 0.0 {
            errors.push("indicators.supertrend.multiplier must be positive".to_string());
        }
        if ind.ema_periods.is_empty() {
            errors.push("indicators.ema_periods must not be empty".to_string());
        }
        if ind.ema_periods.contains(&0) {
            errors.push("indicators.ema_periods must not contain 0".to_string());
        }
        if self.refresh.max_concurrency == 0 {
            errors.push("refresh.max_concurrency must be at least 1".to_string());
        }
        if self.refresh.fetch_retries == 0 {
            errors.push("refresh.fetch_retries must be at least 1".to_string());
        }
        if self.cache.max_age_days < 0 {
            errors.push("cache.max_age_days must not be negative".to_string());
        }
        if self.alerts.default_page_size == 0 || self.alerts.max_page_size == 0 {
            errors.push("alerts page sizes must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EngineError::ConfigError(format!(
                "{} problem{}:\n  - {}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" },
                errors.join("\n  - ")
            )))
        }
    }
}
