//! Pointer input adapter - maps element-local events to canvas pixels
//!
//! The canvas element may be displayed at any size. Pointer positions
//! arrive in client coordinates and are scaled linearly from the element's
//! bounding box to the canvas resolution.

use serde::{Deserialize, Serialize};
use symmetra_painting::Point;

/// Displayed bounding box of the canvas element, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A pointer event from the host, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    /// Pointer left the element; treated as a release
    Leave,
}

/// Linear map from the element's box to canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMapper {
    rect: ElementRect,
    canvas_width: u32,
    canvas_height: u32,
}

impl PointerMapper {
    /// Mapper for an element displayed at exactly the canvas resolution
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            rect: ElementRect {
                left: 0.0,
                top: 0.0,
                width: canvas_width as f32,
                height: canvas_height as f32,
            },
            canvas_width,
            canvas_height,
        }
    }

    /// Update the element box after a layout change
    pub fn set_rect(&mut self, rect: ElementRect) {
        self.rect = rect;
    }

    /// Canvas position for a client position, or None for a collapsed element
    pub fn to_canvas(&self, client_x: f32, client_y: f32) -> Option<Point> {
        if self.rect.width <= 0.0 || self.rect.height <= 0.0 {
            return None;
        }
        Some(Point::new(
            (client_x - self.rect.left) * (self.canvas_width as f32 / self.rect.width),
            (client_y - self.rect.top) * (self.canvas_height as f32 / self.rect.height),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let mapper = PointerMapper::new(600, 600);
        assert_eq!(mapper.to_canvas(120.0, 45.0), Some(Point::new(120.0, 45.0)));
    }

    #[test]
    fn test_scaled_and_offset_element() {
        let mut mapper = PointerMapper::new(600, 600);
        mapper.set_rect(ElementRect {
            left: 10.0,
            top: 20.0,
            width: 300.0,
            height: 300.0,
        });
        assert_eq!(mapper.to_canvas(10.0, 20.0), Some(Point::ZERO));
        assert_eq!(mapper.to_canvas(160.0, 170.0), Some(Point::new(300.0, 300.0)));
    }

    #[test]
    fn test_collapsed_element() {
        let mut mapper = PointerMapper::new(600, 600);
        mapper.set_rect(ElementRect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 100.0,
        });
        assert_eq!(mapper.to_canvas(1.0, 1.0), None);
    }

    #[test]
    fn test_pointer_event_json() {
        let event: PointerEvent = serde_json::from_str(r#"{"type":"down","x":4,"y":5.5}"#).unwrap();
        assert_eq!(event, PointerEvent::Down { x: 4.0, y: 5.5 });

        let leave: PointerEvent = serde_json::from_str(r#"{"type":"leave"}"#).unwrap();
        assert_eq!(leave, PointerEvent::Leave);
    }
}
