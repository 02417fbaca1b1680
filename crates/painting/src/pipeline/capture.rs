//! Pointer capture state machine for the painting pipeline

use tracing::debug;

use crate::history::{DiscardReason, HistoryEvent, RecorderError};
use crate::shapes::regular_polygon;
use crate::types::{DrawTool, Point, Selection, Stroke};
use crate::validation::{ValidationError, exceeds_drag_threshold, is_degenerate_segment};

use super::{PaintingPipeline, stroke_seed};

/// Where the current gesture is
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    /// Freehand drawing; `last` is the newest accepted point
    Capturing { last: Point },
    /// Polygon placement from `start` toward `cursor`
    Placing { start: Point, cursor: Point },
}

impl PaintingPipeline {
    pub fn capture_state(&self) -> CaptureState {
        self.capture
    }

    /// True while a gesture is in progress
    pub fn is_capturing(&self) -> bool {
        self.capture != CaptureState::Idle
    }

    /// Begin a gesture at `at` (canvas pixels)
    ///
    /// Freehand stamps the start point under every copy right away. A
    /// gesture still in progress is finished first.
    pub fn pointer_down(&mut self, at: Point) {
        if self.is_capturing() {
            debug!("pointer_down: gesture still active, finishing it first");
            self.pointer_up();
        }
        if !at.is_finite() {
            debug!("pointer_down: non-finite position, ignoring");
            return;
        }

        self.stroke_sequence = self.stroke_sequence.wrapping_add(1);
        let selection = self.selection;
        let first = (selection.tool == DrawTool::Freehand).then_some(at);

        let event = match self.recorder.start(selection, first) {
            Ok(event) => event,
            Err(e) => {
                debug!("pointer_down: recorder refused start: {}", e);
                return;
            }
        };
        self.history.notify(&event);

        match selection.tool {
            DrawTool::Freehand => {
                let seed = self.segment_seed();
                self.renderer.draw_dot(&mut self.surface, at, &selection, self.center, seed);
                self.capture = CaptureState::Capturing { last: at };
            }
            DrawTool::Polygon => {
                self.capture = CaptureState::Placing { start: at, cursor: at };
            }
        }
        debug!("pointer_down: {:?} at ({:.1}, {:.1})", selection.tool, at.x, at.y);
    }

    /// Continue the gesture toward `to`
    pub fn pointer_move(&mut self, to: Point) {
        if !to.is_finite() {
            debug!("pointer_move: non-finite position, ignoring");
            return;
        }

        match self.capture {
            CaptureState::Idle => {}
            CaptureState::Capturing { last } => {
                if is_degenerate_segment(last, to) {
                    return;
                }
                let selection = self.gesture_selection();
                let seed = self.segment_seed();
                self.renderer.draw_segment(
                    &mut self.surface,
                    last,
                    to,
                    &selection,
                    self.center,
                    seed,
                );
                if let Err(e) = self.recorder.push(to) {
                    debug!("pointer_move: dropped point: {}", e);
                    return;
                }
                self.capture = CaptureState::Capturing { last: to };
            }
            CaptureState::Placing { start, .. } => {
                let selection = self.gesture_selection();
                let ring = regular_polygon(start, to, selection.symmetry.count());
                if let Err(e) = self.recorder.replace_points(ring.clone()) {
                    debug!("pointer_move: polygon ring rejected: {}", e);
                    self.capture = CaptureState::Idle;
                    self.recorder.abort();
                    self.history.notify(&HistoryEvent::StrokeDiscarded {
                        tool: DrawTool::Polygon,
                        reason: discard_reason(&e),
                    });
                    self.render_all();
                    return;
                }
                self.capture = CaptureState::Placing { start, cursor: to };

                let seed = stroke_seed(self.stroke_sequence);
                let preview = Stroke::from_selection(ring, &selection, seed);
                self.render_all();
                self.renderer.render_stroke(&mut self.surface, &preview, self.center);
            }
        }
    }

    /// Finish the gesture, returning the history index of a committed stroke
    ///
    /// Freehand always commits, even a single point. A polygon commits only
    /// when dragged further than the minimum, and its release always ends
    /// with a full redraw so the preview disappears.
    pub fn pointer_up(&mut self) -> Option<usize> {
        let state = std::mem::take(&mut self.capture);
        let seed = stroke_seed(self.stroke_sequence);

        match state {
            CaptureState::Idle => None,
            CaptureState::Capturing { .. } => self.commit(DrawTool::Freehand, seed),
            CaptureState::Placing { start, cursor } => {
                let min_drag = self.capture_config.polygon_min_drag;
                let index = if exceeds_drag_threshold(start, cursor, min_drag) {
                    self.commit(DrawTool::Polygon, seed)
                } else {
                    self.recorder.abort();
                    debug!(
                        "pointer_up: polygon drag {:.2} <= {:.2}, discarded",
                        start.distance(cursor),
                        min_drag
                    );
                    self.history.notify(&HistoryEvent::StrokeDiscarded {
                        tool: DrawTool::Polygon,
                        reason: DiscardReason::BelowDragThreshold,
                    });
                    None
                };
                self.render_all();
                index
            }
        }
    }

    /// Pointer left the canvas; behaves like a release
    pub fn pointer_leave(&mut self) -> Option<usize> {
        self.pointer_up()
    }

    /// Drop the gesture in progress without committing and redraw
    pub fn cancel_capture(&mut self) {
        let state = std::mem::take(&mut self.capture);
        let tool = match state {
            CaptureState::Idle => return,
            CaptureState::Capturing { .. } => DrawTool::Freehand,
            CaptureState::Placing { .. } => DrawTool::Polygon,
        };
        let dropped = self.recorder.abort();
        debug!("cancel_capture: dropped {:?} gesture with {} points", tool, dropped);
        self.history.notify(&HistoryEvent::StrokeDiscarded {
            tool,
            reason: DiscardReason::Cancelled,
        });
        self.render_all();
    }

    fn commit(&mut self, tool: DrawTool, seed: u64) -> Option<usize> {
        let appended = match self.recorder.finish(seed) {
            Ok(stroke) => self.history.append(stroke).map_err(RecorderError::from),
            Err(e) => Err(e),
        };

        match appended {
            Ok(index) => Some(index),
            Err(e) => {
                debug!("commit: {:?} gesture not committed: {}", tool, e);
                self.history.notify(&HistoryEvent::StrokeDiscarded {
                    tool,
                    reason: discard_reason(&e),
                });
                None
            }
        }
    }

    /// Selection the current gesture started with
    fn gesture_selection(&self) -> Selection {
        self.recorder.selection().copied().unwrap_or(self.selection)
    }

    /// Seed for the next live segment's scatter
    fn segment_seed(&self) -> u64 {
        stroke_seed(self.stroke_sequence ^ ((self.recorder.point_count() as u64) << 32))
    }
}

fn discard_reason(error: &RecorderError) -> DiscardReason {
    match error {
        RecorderError::Validation(ValidationError::EmptyStroke) | RecorderError::NotStarted => {
            DiscardReason::NoPoints
        }
        RecorderError::Validation(_) | RecorderError::AlreadyStarted => {
            DiscardReason::InvalidPoints
        }
    }
}
