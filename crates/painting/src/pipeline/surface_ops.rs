//! Surface operations for the painting pipeline

use tracing::debug;

use crate::canvas::Canvas;
use crate::particles::ParticleBurst;
use crate::reactive::Modulation;
use crate::tiles::TileCoord;

use super::PaintingPipeline;

impl PaintingPipeline {
    /// Static full redraw of the history onto the surface
    pub fn render_all(&mut self) {
        self.renderer.render_all(&mut self.surface, self.history.strokes(), self.center);
    }

    /// Static full redraw onto another canvas, e.g. a [`CommandLog`]
    ///
    /// [`CommandLog`]: crate::canvas::CommandLog
    pub fn render_all_to<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        self.renderer.render_all(canvas, self.history.strokes(), self.center);
    }

    /// One reactive frame onto the surface
    pub fn render_frame(&mut self, modulation: &Modulation, particles: &mut ParticleBurst) {
        self.renderer.render_frame(
            &mut self.surface,
            self.history.strokes(),
            self.center,
            modulation,
            particles,
        );
    }

    /// Drop every stroke and repaint the background
    pub fn clear_history(&mut self) -> usize {
        self.cancel_capture();
        let removed = self.history.clear();
        self.render_all();
        debug!("clear_history: removed {} strokes", removed);
        removed
    }

    /// Take dirty tiles for presentation
    ///
    /// Returns the list of tile coordinates that have been modified
    /// since the last call. The dirty flags are cleared.
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        self.surface.take_dirty_tiles()
    }

    pub fn has_dirty_tiles(&self) -> bool {
        self.surface.has_dirty_tiles()
    }

    /// Raw RGBA f32 bytes of the whole surface
    pub fn surface_bytes(&self) -> &[u8] {
        self.surface.surface().as_bytes()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.surface.surface().get_pixel(x, y)
    }
}
