use crate::constants::MAX_CANVAS_SIZE;
use crate::types::Point;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unsupported symmetry order: {0} (expected 2, 3, 4, 6, 8 or 12)")]
    UnsupportedSymmetry(u32),
    #[error("Stroke has no points")]
    EmptyStroke,
    #[error("Non-finite point: ({x}, {y})")]
    NonFinitePoint { x: f32, y: f32 },
    #[error("Invalid canvas size {width}x{height} (max {})", MAX_CANVAS_SIZE)]
    InvalidCanvasSize { width: u32, height: u32 },
}

/// Check that a point sequence can be committed as a stroke
pub fn validate_points(points: &[Point]) -> Result<(), ValidationError> {
    if points.is_empty() {
        return Err(ValidationError::EmptyStroke);
    }

    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        return Err(ValidationError::NonFinitePoint { x: bad.x, y: bad.y });
    }

    Ok(())
}

/// Check canvas dimensions
pub fn validate_canvas_size(width: u32, height: u32) -> Result<(), ValidationError> {
    if width == 0 || height == 0 || width > MAX_CANVAS_SIZE || height > MAX_CANVAS_SIZE {
        return Err(ValidationError::InvalidCanvasSize { width, height });
    }
    Ok(())
}

/// Whether a polygon drag is long enough to commit (strictly greater than `min_drag`)
pub fn exceeds_drag_threshold(start: Point, cursor: Point, min_drag: f32) -> bool {
    start.distance(cursor) > min_drag
}

/// Whether a segment is too short to draw
pub fn is_degenerate_segment(from: Point, to: Point) -> bool {
    from.distance(to) < crate::constants::MIN_SEGMENT_LENGTH
}
