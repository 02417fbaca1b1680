//! Stroke history and gesture recording.
//!
//! This module provides:
//! - [`StrokeHistory`] - append-only list of committed strokes with listeners
//! - [`HistoryEvent`] - lifecycle events delivered to those listeners
//! - [`StrokeRecorder`] - accumulator for the gesture in progress
//!
//! The history is the only persistent drawing state. Every full redraw,
//! static or reactive, is a pure function of its strokes plus the current
//! transform parameters.

mod events;
mod recorder;
mod storage;

pub use events::{DiscardReason, HistoryEvent};
pub use recorder::{RecorderError, StrokeRecorder};
pub use storage::StrokeHistory;
