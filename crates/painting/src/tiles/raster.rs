//! Antialiased stroke and dot rasterization, and the [`Canvas`] impl

use tracing::trace;

use super::{PixelRect, TiledSurface};
use crate::canvas::{Canvas, DrawCommand, LineCap};
use crate::constants::{GLOW_OPACITY, MIN_SEGMENT_LENGTH};
use crate::types::Point;

/// Coverage of a pixel at `distance` from a round shape edge of `radius`
#[inline]
fn edge_coverage(radius: f32, distance: f32) -> f32 {
    (radius + 0.5 - distance).clamp(0.0, 1.0)
}

/// Coverage of pixel center `p` by a thick segment from `a` to `b`
fn segment_coverage(p: Point, a: Point, b: Point, half_width: f32, cap: LineCap) -> f32 {
    let axis = b - a;
    let length = axis.length();

    if length < MIN_SEGMENT_LENGTH {
        let d = p - a;
        return match cap {
            LineCap::Round => edge_coverage(half_width, d.length()),
            LineCap::Butt => {
                edge_coverage(half_width, d.x.abs()) * edge_coverage(half_width, d.y.abs())
            }
        };
    }

    let dir = axis / length;
    let along = (p - a).dot(dir);
    match cap {
        LineCap::Round => {
            let closest = a + dir * along.clamp(0.0, length);
            edge_coverage(half_width, p.distance(closest))
        }
        LineCap::Butt => {
            let across = (p - a).perp_dot(dir).abs();
            let inside = (along + 0.5).min(length - along + 0.5).clamp(0.0, 1.0);
            edge_coverage(half_width, across) * inside
        }
    }
}

impl TiledSurface {
    /// Clamp a float-space box to the surface, returning (x0, y0, x1, y1)
    fn clamp_box(&self, min: Point, max: Point) -> Option<(u32, u32, u32, u32)> {
        let x0 = (min.x.floor().max(0.0) as u32).min(self.surface.width);
        let y0 = (min.y.floor().max(0.0) as u32).min(self.surface.height);
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.surface.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.surface.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Stroke an open polyline in surface pixel coordinates
    ///
    /// Overlapping segments take the maximum coverage per pixel, so joints
    /// of translucent strokes are not composited twice. A single point
    /// draws the cap shape alone.
    /// Returns the affected region, or None if nothing landed on the surface.
    pub fn stroke_polyline(
        &mut self,
        points: &[Point],
        half_width: f32,
        cap: LineCap,
        color: [f32; 4],
        opacity: f32,
    ) -> Option<PixelRect> {
        if points.is_empty() || half_width <= 0.0 || opacity <= 0.0 {
            return None;
        }

        let pad = Point::splat(half_width + 1.0);
        let (min, max) = points
            .iter()
            .fold((points[0], points[0]), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        let (x0, y0, x1, y1) = self.clamp_box(min - pad, max + pad)?;

        let width = (x1 - x0) as usize;
        let mut coverage = vec![0.0f32; width * (y1 - y0) as usize];

        let segments: Vec<(Point, Point)> = if points.len() == 1 {
            vec![(points[0], points[0])]
        } else {
            points.windows(2).map(|w| (w[0], w[1])).collect()
        };

        for (a, b) in segments {
            let Some((sx0, sy0, sx1, sy1)) = self.clamp_box(a.min(b) - pad, a.max(b) + pad) else {
                continue;
            };
            for py in sy0..sy1 {
                for px in sx0..sx1 {
                    let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                    let c = segment_coverage(center, a, b, half_width, cap);
                    let slot = &mut coverage[(py - y0) as usize * width + (px - x0) as usize];
                    *slot = slot.max(c);
                }
            }
        }

        for py in y0..y1 {
            for px in x0..x1 {
                let c = coverage[(py - y0) as usize * width + (px - x0) as usize];
                if c > 0.0 {
                    self.surface.blend_pixel(px, py, color, opacity * c);
                }
            }
        }

        let region = (x0, y0, x1 - x0, y1 - y0);
        self.mark_region_dirty(region.0, region.1, region.2, region.3);
        trace!("stroke_polyline: {} points -> {:?}", points.len(), region);
        Some(region)
    }

    /// Fill a disc or an axis-aligned square of the given diameter
    pub fn fill_dot(
        &mut self,
        center: Point,
        size: f32,
        color: [f32; 4],
        round: bool,
    ) -> Option<PixelRect> {
        let cap = if round { LineCap::Round } else { LineCap::Butt };
        self.stroke_polyline(&[center], size * 0.5, cap, color, 1.0)
    }

    /// Composite a color over the whole surface
    pub fn fill_all(&mut self, color: [f32; 4]) {
        if color[3] >= 1.0 {
            self.surface.clear(color);
        } else {
            self.surface.blend_all(color);
        }
        self.mark_all_dirty();
    }
}

impl Canvas for TiledSurface {
    fn size(&self) -> (u32, u32) {
        (self.surface.width, self.surface.height)
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn concat(&mut self, transform: glam::Affine2) {
        self.state.concat(transform);
    }

    fn fill(&mut self, color: [f32; 4]) {
        self.fill_all(color);
    }

    fn draw(&mut self, command: &DrawCommand) {
        let state = *self.state.current();
        let scale = state.scale_factor();

        match command {
            DrawCommand::Polyline {
                points,
                width,
                color,
                cap,
                glow,
            } => {
                let mapped: Vec<Point> = points
                    .iter()
                    .map(|&p| state.transform.transform_point2(p))
                    .collect();
                if *glow > 0.0 {
                    let halo = (width + glow) * scale * 0.5;
                    self.stroke_polyline(&mapped, halo, *cap, *color, GLOW_OPACITY);
                }
                self.stroke_polyline(&mapped, width * scale * 0.5, *cap, *color, 1.0);
            }
            DrawCommand::Dots {
                centers,
                size,
                color,
                round,
            } => {
                for &center in centers {
                    let mapped = state.transform.transform_point2(center);
                    self.fill_dot(mapped, size * scale, *color, *round);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::with_saved_state;
    use glam::{Affine2, Vec2};

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn white_surface(size: u32) -> TiledSurface {
        let mut surface = TiledSurface::new(size, size, 32);
        surface.fill_all(WHITE);
        surface.take_dirty_tiles();
        surface
    }

    #[test]
    fn test_round_segment_covers_its_axis() {
        let mut surface = white_surface(64);
        let region = surface.stroke_polyline(
            &[Point::new(10.0, 20.5), Point::new(50.0, 20.5)],
            4.0,
            LineCap::Round,
            RED,
            1.0,
        );
        assert!(region.is_some());

        assert_eq!(surface.surface().get_pixel(30, 20), Some(RED));
        // Round cap extends past the endpoint
        assert_eq!(surface.surface().get_pixel(52, 20), Some(RED));
        // Well outside the stroke
        assert_eq!(surface.surface().get_pixel(30, 40), Some(WHITE));
    }

    #[test]
    fn test_butt_segment_stops_at_endpoint() {
        let mut surface = white_surface(64);
        surface.stroke_polyline(
            &[Point::new(10.0, 20.5), Point::new(50.0, 20.5)],
            4.0,
            LineCap::Butt,
            RED,
            1.0,
        );
        assert_eq!(surface.surface().get_pixel(30, 20), Some(RED));
        assert_eq!(surface.surface().get_pixel(53, 20), Some(WHITE));
    }

    #[test]
    fn test_single_point_draws_disc() {
        let mut surface = white_surface(32);
        surface.stroke_polyline(&[Point::new(16.0, 16.0)], 3.0, LineCap::Round, RED, 1.0);
        assert_eq!(surface.surface().get_pixel(15, 15), Some(RED));
        assert_eq!(surface.surface().get_pixel(25, 16), Some(WHITE));
    }

    #[test]
    fn test_stroke_outside_surface_returns_none() {
        let mut surface = white_surface(32);
        let region = surface.stroke_polyline(
            &[Point::new(-100.0, -100.0), Point::new(-80.0, -90.0)],
            2.0,
            LineCap::Round,
            RED,
            1.0,
        );
        assert!(region.is_none());
        assert!(!surface.has_dirty_tiles());
    }

    #[test]
    fn test_stroke_marks_only_touched_tiles() {
        let mut surface = white_surface(128);
        surface.stroke_polyline(
            &[Point::new(4.0, 4.0), Point::new(20.0, 10.0)],
            2.0,
            LineCap::Round,
            RED,
            1.0,
        );
        let tiles = surface.take_dirty_tiles();
        assert_eq!(tiles, vec![super::super::TileCoord { x: 0, y: 0 }]);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut surface = white_surface(8);
        surface.fill_all([0.0, 0.0, 0.0, 0.2]);
        let pixel = surface.surface().get_pixel(3, 3).unwrap();
        assert!((pixel[0] - 0.8).abs() < 1e-5);
        assert_eq!(surface.dirty_tile_count(), 1);
    }

    #[test]
    fn test_draw_applies_current_transform() {
        let mut surface = white_surface(64);
        with_saved_state(&mut surface, |canvas| {
            canvas.concat(Affine2::from_translation(Vec2::new(40.0, 0.0)));
            canvas.draw(&DrawCommand::Dots {
                centers: vec![Point::new(10.0, 10.0)],
                size: 6.0,
                color: RED,
                round: true,
            });
        });

        assert_eq!(surface.surface().get_pixel(50, 10), Some(RED));
        assert_eq!(surface.surface().get_pixel(10, 10), Some(WHITE));
        assert!(surface.draw_state().is_neutral());
    }

    #[test]
    fn test_glow_draws_halo_beyond_stroke() {
        let mut surface = white_surface(64);
        surface.draw(&DrawCommand::Polyline {
            points: vec![Point::new(10.0, 32.5), Point::new(54.0, 32.5)],
            width: 4.0,
            color: RED,
            cap: LineCap::Round,
            glow: 20.0,
        });

        // Core is solid, halo region is tinted but not solid
        assert_eq!(surface.surface().get_pixel(32, 32), Some(RED));
        let halo = surface.surface().get_pixel(32, 40).unwrap();
        assert!(halo[1] < 1.0 && halo[1] > 0.5);
    }
}
