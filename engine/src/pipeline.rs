use shared::models::Alert;
use tracing::info;

use crate::alerts::deduplicate;
use crate::config::IndicatorSettings;
use crate::indicators::IndicatorEngine;
use crate::models::{Series, SignalFrame};
use crate::signals::{detect_raw_conditions, track_positions};

/// Indicators, raw conditions and tracked events for one series.
pub fn compute_signal_frame(series: &Series, settings: &IndicatorSettings) -> SignalFrame {
    let indicators = IndicatorEngine::new(settings.clone()).compute(series);
    let raw = detect_raw_conditions(&indicators);
    let tracked = track_positions(&raw);
    let frame = SignalFrame::new(indicators, tracked);

    let counts = frame.signal_counts();
    info!(
        symbol = %series.symbol(),
        long_open = counts.long_open,
        long_close = counts.long_close,
        short_open = counts.short_open,
        short_close = counts.short_close,
        position = ?frame.final_position,
        "Signals generated"
    );
    frame
}

/// The full pipeline: at most two alerts for the series.
pub fn compute_alerts(series: &Series, settings: &IndicatorSettings) -> Vec<Alert> {
    let frame = compute_signal_frame(series, settings);
    deduplicate(&frame.rows())
}
