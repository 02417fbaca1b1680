//! Point accumulator for the gesture in progress.

use crate::types::{Point, Selection, Stroke};
use crate::validation::{ValidationError, validate_points};

use super::events::HistoryEvent;

/// Error type for stroke recording operations.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Stroke not started - call start() first")]
    NotStarted,
    #[error("Stroke already started - call finish() or abort() first")]
    AlreadyStarted,
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Collects points for one gesture and turns them into a [`Stroke`].
///
/// The selection is captured at `start`, so changing the brush mid-gesture
/// does not affect the stroke being drawn.
///
/// # Example
///
/// ```ignore
/// let mut recorder = StrokeRecorder::new();
/// recorder.start(selection, Some(Point::new(10.0, 10.0)))?;
/// recorder.push(Point::new(12.0, 11.0))?;
/// let stroke = recorder.finish(seed)?;
/// history.append(stroke)?;
/// ```
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    selection: Option<Selection>,
    points: Vec<Point>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.selection.is_some()
    }

    /// Begin a gesture, optionally with its first point.
    ///
    /// Returns the `StrokeStarted` event for the caller to emit.
    pub fn start(
        &mut self,
        selection: Selection,
        first: Option<Point>,
    ) -> Result<HistoryEvent, RecorderError> {
        if self.selection.is_some() {
            return Err(RecorderError::AlreadyStarted);
        }
        if let Some(point) = first {
            validate_points(&[point])?;
        }

        self.selection = Some(selection);
        self.points.clear();
        self.points.extend(first);

        Ok(HistoryEvent::StrokeStarted {
            tool: selection.tool,
            at: first,
        })
    }

    /// Append a point to the gesture
    pub fn push(&mut self, point: Point) -> Result<(), RecorderError> {
        if self.selection.is_none() {
            return Err(RecorderError::NotStarted);
        }
        validate_points(&[point])?;
        self.points.push(point);
        Ok(())
    }

    /// Replace all points, as a polygon preview does on every move
    ///
    /// Rejected points leave the previous ones in place.
    pub fn replace_points(&mut self, points: Vec<Point>) -> Result<(), RecorderError> {
        if self.selection.is_none() {
            return Err(RecorderError::NotStarted);
        }
        validate_points(&points)?;
        self.points = points;
        Ok(())
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Finish the gesture and build the stroke.
    ///
    /// The recorder is reset even when the points fail validation.
    pub fn finish(&mut self, seed: u64) -> Result<Stroke, RecorderError> {
        let selection = self.selection.take().ok_or(RecorderError::NotStarted)?;
        let points = std::mem::take(&mut self.points);
        validate_points(&points)?;
        Ok(Stroke::from_selection(points, &selection, seed))
    }

    /// Drop the gesture in progress, returning how many points it had
    pub fn abort(&mut self) -> usize {
        self.selection = None;
        let dropped = self.points.len();
        self.points.clear();
        dropped
    }
}
