pub mod settings;

pub use settings::{
    AlertListSettings, CacheSettings, EngineSettings, GannHiLoSettings, IchimokuSettings, IndicatorSettings,
    MacdSettings, RefreshSettings, RsiSettings, SupertrendSettings,
};
