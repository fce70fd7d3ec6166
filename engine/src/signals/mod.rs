// Signal detection and position tracking
pub mod detector;
pub mod tracker;

pub use detector::{detect_raw_conditions, RawConditions};
pub use tracker::{track_positions, Position, PositionTracker, TrackedSignals};

use serde::Serialize;
use shared::models::SignalLabel;

/// The four event flags of one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalFlags {
    pub long_open: bool,
    pub long_close: bool,
    pub short_open: bool,
    pub short_close: bool,
}

impl SignalFlags {
    pub fn any(&self) -> bool {
        self.long_open || self.long_close || self.short_open || self.short_close
    }

    pub fn count(&self) -> usize {
        [self.long_open, self.long_close, self.short_open, self.short_close]
            .iter()
            .filter(|f| **f)
            .count()
    }

    /// Opens win over closes, long over short.
    pub fn label(&self) -> SignalLabel {
        if self.long_open {
            SignalLabel::LongOpen
        } else if self.short_open {
            SignalLabel::ShortOpen
        } else if self.long_close {
            SignalLabel::LongClose
        } else if self.short_close {
            SignalLabel::ShortClose
        } else {
            SignalLabel::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_priority() {
        let flip_to_long = SignalFlags { long_open: true, short_close: true, ..Default::default() };
        assert_eq!(flip_to_long.label(), SignalLabel::LongOpen);
        assert_eq!(flip_to_long.count(), 2);

        let flip_to_short = SignalFlags { short_open: true, long_close: true, ..Default::default() };
        assert_eq!(flip_to_short.label(), SignalLabel::ShortOpen);

        let close = SignalFlags { short_close: true, ..Default::default() };
        assert_eq!(close.label(), SignalLabel::ShortClose);

        assert_eq!(SignalFlags::default().label(), SignalLabel::Hold);
        assert!(!SignalFlags::default().any());
    }
}
