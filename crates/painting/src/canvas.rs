//! Drawing primitives and the canvas interface the render engine targets
//!
//! The render engine never touches pixels directly. It issues
//! [`DrawCommand`]s to a [`Canvas`], wrapping each symmetric copy in a
//! save/restore scope so the copy's transform cannot leak into later draws.

use glam::Affine2;
use tracing::debug;

use crate::types::Point;

/// How the ends of an open polyline are finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// Semicircular ends; a zero-length line draws a disc
    Round,
    /// Flat ends at the endpoints; a zero-length line draws a square
    Butt,
}

/// A single drawing primitive, in the canvas's current transform space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Stroked open polyline, optionally with a glow halo underneath
    Polyline {
        points: Vec<Point>,
        width: f32,
        color: [f32; 4],
        cap: LineCap,
        glow: f32,
    },
    /// Filled dots, round or square, all of the same size
    Dots {
        centers: Vec<Point>,
        size: f32,
        color: [f32; 4],
        round: bool,
    },
}

/// Immediate-mode drawing target
pub trait Canvas {
    /// Canvas resolution in pixels
    fn size(&self) -> (u32, u32);

    /// Push the current drawing state
    fn save(&mut self);

    /// Pop back to the last saved drawing state
    fn restore(&mut self);

    /// Post-multiply the current transform
    fn concat(&mut self, transform: Affine2);

    /// Composite a color over the whole canvas, ignoring the transform
    fn fill(&mut self, color: [f32; 4]);

    /// Draw one primitive under the current transform
    fn draw(&mut self, command: &DrawCommand);
}

/// Run `f` between a save and the matching restore
pub fn with_saved_state<C, R>(canvas: &mut C, f: impl FnOnce(&mut C) -> R) -> R
where
    C: Canvas + ?Sized,
{
    canvas.save();
    let result = f(canvas);
    canvas.restore();
    result
}

/// Mutable drawing state tracked by save/restore
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub transform: Affine2,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
        }
    }
}

impl DrawState {
    /// Uniform scale factor of the transform, applied to line widths
    pub fn scale_factor(&self) -> f32 {
        self.transform.matrix2.determinant().abs().sqrt()
    }
}

/// Save/restore stack shared by canvas implementations
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the last saved state; an unmatched restore is ignored
    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(state) => self.current = state,
            None => debug!("StateStack::restore: no saved state, ignoring"),
        }
    }

    pub fn concat(&mut self, transform: Affine2) {
        self.current.transform = self.current.transform * transform;
    }

    /// Number of outstanding saves
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// True when nothing is saved and the transform is the identity
    pub fn is_neutral(&self) -> bool {
        self.saved.is_empty() && self.current == DrawState::default()
    }
}

/// A call received by a [`CommandLog`]
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCall {
    Save,
    Restore,
    Concat(Affine2),
    Fill([f32; 4]),
    Draw {
        command: DrawCommand,
        /// Transform in effect when the command was issued
        transform: Affine2,
    },
}

/// Canvas that records every call instead of rasterizing
///
/// Hosts that render with their own 2D backend replay the log; tests use
/// it to inspect exactly what the render engine issued.
#[derive(Debug, Clone)]
pub struct CommandLog {
    width: u32,
    height: u32,
    state: StateStack,
    calls: Vec<CanvasCall>,
}

impl CommandLog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: StateStack::default(),
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[CanvasCall] {
        &self.calls
    }

    /// Drawn commands with the transform each was issued under
    pub fn draws(&self) -> impl Iterator<Item = (&DrawCommand, &Affine2)> {
        self.calls.iter().filter_map(|call| match call {
            CanvasCall::Draw { command, transform } => Some((command, transform)),
            _ => None,
        })
    }

    pub fn state(&self) -> &StateStack {
        &self.state
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for CommandLog {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn save(&mut self) {
        self.state.save();
        self.calls.push(CanvasCall::Save);
    }

    fn restore(&mut self) {
        self.state.restore();
        self.calls.push(CanvasCall::Restore);
    }

    fn concat(&mut self, transform: Affine2) {
        self.state.concat(transform);
        self.calls.push(CanvasCall::Concat(transform));
    }

    fn fill(&mut self, color: [f32; 4]) {
        self.calls.push(CanvasCall::Fill(color));
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.calls.push(CanvasCall::Draw {
            command: command.clone(),
            transform: self.state.current().transform,
        });
    }
}
