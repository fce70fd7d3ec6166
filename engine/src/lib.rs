// Engine library root
// Indicator computation, signal tracking and alert generation for daily bars.

pub mod alerts;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod signals;

pub use error::EngineError;
pub use pipeline::{compute_alerts, compute_signal_frame};
