//! Tiled CPU surface with dirty tracking
//!
//! Every raster operation marks the tiles it touched. A host presents the
//! canvas by taking the dirty set and uploading only those tiles, which is
//! what makes live segment drawing cheaper than a full redraw.

mod raster;

use std::collections::HashSet;

use tracing::trace;

use crate::canvas::StateStack;
use crate::surface::CpuSurface;

/// Tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

/// Pixel rectangle (x, y, width, height)
pub type PixelRect = (u32, u32, u32, u32);

/// Manages tiled access to a surface with dirty tracking
pub struct TiledSurface {
    pub(crate) surface: CpuSurface,
    pub(crate) tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
    pub(crate) dirty_tiles: HashSet<TileCoord>,
    pub(crate) state: StateStack,
}

impl TiledSurface {
    /// Create a new tiled surface with the given dimensions and tile size
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        let tile_size = tile_size.max(1);
        Self {
            surface: CpuSurface::new(width, height),
            tile_size,
            tiles_x: width.div_ceil(tile_size),
            tiles_y: height.div_ceil(tile_size),
            dirty_tiles: HashSet::new(),
            state: StateStack::default(),
        }
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[inline]
    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    #[inline]
    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// Get the underlying surface for direct pixel access
    #[inline]
    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    /// Save/restore state of the canvas interface
    pub fn draw_state(&self) -> &StateStack {
        &self.state
    }

    /// Mark a rectangular region as dirty
    pub fn mark_region_dirty(&mut self, x: u32, y: u32, w: u32, h: u32) {
        if w == 0 || h == 0 || x >= self.surface.width || y >= self.surface.height {
            return;
        }

        let x_end = (x + w).min(self.surface.width);
        let y_end = (y + h).min(self.surface.height);

        for ty in (y / self.tile_size)..=((y_end - 1) / self.tile_size) {
            for tx in (x / self.tile_size)..=((x_end - 1) / self.tile_size) {
                self.dirty_tiles.insert(TileCoord { x: tx, y: ty });
            }
        }

        trace!(
            "mark_region_dirty: ({}, {}) {}x{} -> {} dirty tiles",
            x,
            y,
            w,
            h,
            self.dirty_tiles.len()
        );
    }

    /// Mark every tile dirty
    pub fn mark_all_dirty(&mut self) {
        for ty in 0..self.tiles_y {
            for tx in 0..self.tiles_x {
                self.dirty_tiles.insert(TileCoord { x: tx, y: ty });
            }
        }
    }

    /// Get all dirty tiles (sorted) and clear the dirty set
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        let mut tiles: Vec<TileCoord> = self.dirty_tiles.drain().collect();
        tiles.sort();
        tiles
    }

    #[inline]
    pub fn has_dirty_tiles(&self) -> bool {
        !self.dirty_tiles.is_empty()
    }

    #[inline]
    pub fn dirty_tile_count(&self) -> usize {
        self.dirty_tiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiled_surface_creation() {
        let surface = TiledSurface::new(256, 256, 128);
        assert_eq!(surface.tiles_x(), 2);
        assert_eq!(surface.tiles_y(), 2);
        assert_eq!(surface.tile_size(), 128);
    }

    #[test]
    fn test_tiled_surface_non_aligned() {
        // 300x300 with 128 tile size should give 3x3 tiles
        let surface = TiledSurface::new(300, 300, 128);
        assert_eq!(surface.tiles_x(), 3);
        assert_eq!(surface.tiles_y(), 3);
    }

    #[test]
    fn test_mark_region_dirty() {
        let mut surface = TiledSurface::new(256, 256, 128);

        // A region straddling the tile corner touches all 4 tiles
        surface.mark_region_dirty(100, 100, 56, 56);
        assert_eq!(surface.dirty_tile_count(), 4);

        let tiles = surface.take_dirty_tiles();
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0], TileCoord { x: 0, y: 0 });
        assert!(!surface.has_dirty_tiles());
    }

    #[test]
    fn test_mark_region_outside_is_ignored() {
        let mut surface = TiledSurface::new(64, 64, 32);
        surface.mark_region_dirty(64, 0, 10, 10);
        surface.mark_region_dirty(0, 0, 0, 10);
        assert!(!surface.has_dirty_tiles());
    }

    #[test]
    fn test_mark_all_dirty() {
        let mut surface = TiledSurface::new(300, 200, 128);
        surface.mark_all_dirty();
        assert_eq!(surface.dirty_tile_count(), 6);
    }
}
