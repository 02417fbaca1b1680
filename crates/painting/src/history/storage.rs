//! Append-only stroke storage.

use tracing::{debug, info};

use crate::types::Stroke;
use crate::validation::{ValidationError, validate_points};

use super::events::HistoryEvent;

type Listener = Box<dyn Fn(&HistoryEvent)>;

/// Ordered, append-only list of committed strokes.
///
/// Strokes are never edited in place: the only mutations are [`append`]
/// and [`clear`]. Render passes borrow the strokes read-only.
///
/// [`append`]: StrokeHistory::append
/// [`clear`]: StrokeHistory::clear
#[derive(Default)]
pub struct StrokeHistory {
    strokes: Vec<Stroke>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for StrokeHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeHistory")
            .field("stroke_count", &self.strokes.len())
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stroke, returning its index.
    ///
    /// Emits `StrokeCommitted` to all listeners.
    pub fn append(&mut self, stroke: Stroke) -> Result<usize, ValidationError> {
        validate_points(&stroke.points)?;

        let index = self.strokes.len();
        let event = HistoryEvent::StrokeCommitted {
            index,
            tool: stroke.tool,
            point_count: stroke.points.len(),
        };
        debug!(
            "StrokeHistory::append: #{} {:?} {:?} with {} points",
            index,
            stroke.tool,
            stroke.style,
            stroke.points.len()
        );
        self.strokes.push(stroke);
        self.notify(&event);
        Ok(index)
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// Drop every stroke, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.strokes.len();
        self.strokes.clear();
        info!("History cleared ({} strokes)", removed);
        self.notify(&HistoryEvent::HistoryCleared { removed });
        removed
    }

    /// Register a listener for history and capture events
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(&HistoryEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn notify(&self, event: &HistoryEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}
