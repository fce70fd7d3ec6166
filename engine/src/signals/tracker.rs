use serde::Serialize;

use super::{RawConditions, SignalFlags};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    #[default]
    Flat,
    Long,
    Short,
}

/// Single-position state machine. Opening the opposite side closes the
/// current position on the same bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionTracker {
    position: Position,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Applies one bar of raw conditions and returns the events emitted.
    /// Rules are checked in order and at most one fires.
    pub fn step(&mut self, raw: SignalFlags) -> SignalFlags {
        let mut events = SignalFlags::default();
        if raw.long_open && self.position != Position::Long {
            events.long_open = true;
            events.short_close = self.position == Position::Short;
            self.position = Position::Long;
        } else if raw.long_close && self.position == Position::Long {
            events.long_close = true;
            self.position = Position::Flat;
        } else if raw.short_open && self.position != Position::Short {
            events.short_open = true;
            events.long_close = self.position == Position::Long;
            self.position = Position::Short;
        } else if raw.short_close && self.position == Position::Short {
            events.short_close = true;
            self.position = Position::Flat;
        }
        events
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedSignals {
    pub events: Vec<SignalFlags>,
    pub final_position: Position,
}

pub fn track_positions(raw: &RawConditions) -> TrackedSignals {
    let mut tracker = PositionTracker::new();
    let events = (0..raw.len()).map(|i| tracker.step(raw.flags_at(i))).collect();
    TrackedSignals { events, final_position: tracker.position() }
}
