//! Generated stroke geometry

use crate::types::Point;

/// Closed regular polygon ring centered on `center`
///
/// The radius is the distance from `center` to `pointer` and the first
/// vertex points toward `pointer`. The ring repeats its first vertex at the
/// end, so it holds `sides + 1` points.
pub fn regular_polygon(center: Point, pointer: Point, sides: u32) -> Vec<Point> {
    let offset = pointer - center;
    let radius = offset.length();
    let start_angle = offset.y.atan2(offset.x);
    let step = std::f32::consts::TAU / sides.max(1) as f32;

    let mut ring: Vec<Point> = (0..sides.max(1))
        .map(|i| {
            let angle = start_angle + i as f32 * step;
            center + Point::new(angle.cos(), angle.sin()) * radius
        })
        .collect();
    ring.push(ring[0]);
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_ring() {
        let ring = regular_polygon(Point::new(50.0, 50.0), Point::new(60.0, 50.0), 4);
        assert_eq!(ring.len(), 5);
        assert!(ring[0].distance(Point::new(60.0, 50.0)) < 1e-3);
        assert!(ring[1].distance(Point::new(50.0, 60.0)) < 1e-3);
        assert!(ring[2].distance(Point::new(40.0, 50.0)) < 1e-3);
        assert!(ring[4].distance(ring[0]) < 1e-3);
    }

    #[test]
    fn test_vertices_on_circle() {
        let center = Point::new(10.0, -4.0);
        let pointer = Point::new(13.0, 0.0);
        for vertex in regular_polygon(center, pointer, 12) {
            assert!((vertex.distance(center) - 5.0).abs() < 1e-3);
        }
    }
}
