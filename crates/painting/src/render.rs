//! Render engine: draws strokes under their symmetric copies
//!
//! Two full-redraw modes share one code path. The static mode fills the
//! background and draws every stroke with θ = 0, s = 1. The reactive mode
//! composites a translucent afterglow over the previous frame and draws
//! every stroke with the frame's [`Modulation`], then the particle burst.
//! Live segment drawing touches only the newest segment.

use symmetra_config::{CanvasConfig, CaptureConfig};
use tracing::debug;

use crate::brush::{BrushEngine, StyleParams};
use crate::canvas::{Canvas, DrawCommand, with_saved_state};
use crate::particles::ParticleBurst;
use crate::reactive::Modulation;
use crate::symmetry::SymmetryTransform;
use crate::types::{Point, Selection, Stroke};

/// Stateless renderer over a [`Canvas`]
#[derive(Debug, Clone)]
pub struct RenderEngine {
    brush: BrushEngine,
    background: [f32; 4],
    afterglow: [f32; 4],
}

impl RenderEngine {
    pub fn new(canvas: &CanvasConfig, capture: &CaptureConfig, afterglow: [f32; 4]) -> Self {
        Self {
            brush: BrushEngine::new(capture),
            background: canvas.background,
            afterglow,
        }
    }

    pub fn brush(&self) -> &BrushEngine {
        &self.brush
    }

    /// Static full redraw: background, then every stroke in order
    pub fn render_all<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        strokes: &[Stroke],
        center: Point,
    ) {
        canvas.fill(self.background);
        for stroke in strokes {
            self.render_stroke(canvas, stroke, center);
        }
        debug!("RenderEngine::render_all: {} strokes", strokes.len());
    }

    /// Draw one stroke with θ = 0, s = 1
    pub fn render_stroke<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        stroke: &Stroke,
        center: Point,
    ) {
        let commands = self.brush.path_commands(stroke, &StyleParams::for_stroke(stroke));
        let transform = SymmetryTransform::new(center, stroke.symmetry);
        draw_copies(canvas, &transform, &commands);
    }

    /// Reactive frame: afterglow, modulated strokes, then particles
    ///
    /// Takes the strokes by shared reference; only the canvas and the
    /// particle burst change.
    pub fn render_frame<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        strokes: &[Stroke],
        center: Point,
        modulation: &Modulation,
        particles: &mut ParticleBurst,
    ) {
        canvas.fill(self.afterglow);

        for stroke in strokes {
            let params = StyleParams::reactive(stroke, modulation);
            let commands = self.brush.path_commands(stroke, &params);
            let transform = SymmetryTransform::new(center, stroke.symmetry)
                .with_rotation(modulation.rotation)
                .with_scale(modulation.scale);
            draw_copies(canvas, &transform, &commands);
        }

        particles.emit(center, modulation.features);
        particles.update();
        particles.draw(canvas);
    }

    /// Draw the segment `from → to` under every copy of the current selection
    pub fn draw_segment<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        from: Point,
        to: Point,
        selection: &Selection,
        center: Point,
        seed: u64,
    ) {
        let commands = self.brush.segment_commands(from, to, selection, seed);
        let transform = SymmetryTransform::new(center, selection.symmetry);
        draw_copies(canvas, &transform, &commands);
    }

    /// Stamp a single point under every copy, as a pointer-down does
    pub fn draw_dot<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        at: Point,
        selection: &Selection,
        center: Point,
        seed: u64,
    ) {
        self.draw_segment(canvas, at, at, selection, center, seed);
    }
}

/// Issue `commands` once per copy, each inside its own save/restore scope
fn draw_copies<C: Canvas + ?Sized>(
    canvas: &mut C,
    transform: &SymmetryTransform,
    commands: &[DrawCommand],
) {
    for copy in transform.copies() {
        with_saved_state(&mut *canvas, |canvas| {
            canvas.concat(copy.affine());
            for command in commands {
                canvas.draw(command);
            }
        });
    }
}
