//! Events emitted by the stroke history and the capture pipeline.

use crate::types::{DrawTool, Point};

/// Why a gesture ended without adding a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Polygon drag not longer than the minimum
    BelowDragThreshold,
    /// Recorder held no points at pointer-up
    NoPoints,
    /// The gesture produced a point that is not finite
    InvalidPoints,
    /// Gesture interrupted, e.g. by playback starting
    Cancelled,
}

/// Stroke lifecycle events, delivered to history listeners.
///
/// The app session registers a listener that logs each one.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    /// A gesture began
    StrokeStarted { tool: DrawTool, at: Option<Point> },
    /// A stroke was appended at `index`
    StrokeCommitted {
        index: usize,
        tool: DrawTool,
        point_count: usize,
    },
    /// A gesture ended without a stroke
    StrokeDiscarded { tool: DrawTool, reason: DiscardReason },
    /// The whole history was dropped
    HistoryCleared { removed: usize },
}
