//! Complete painting pipeline
//!
//! This module provides the main painting pipeline that connects:
//! - Pointer input (via `pointer_down`, `pointer_move`, `pointer_up`)
//! - The capture state machine (freehand and polygon gestures)
//! - The render engine (live segments and full redraws)
//! - Stroke history (append-only, with listeners)
//!
//! The pipeline owns no audio state; reactive frames are driven from the
//! outside with a [`Modulation`](crate::reactive::Modulation) per frame.

mod capture;
mod surface_ops;

use symmetra_config::{CaptureConfig, SymmetraConfig};
use tracing::debug;

use crate::history::{HistoryEvent, StrokeHistory, StrokeRecorder};
use crate::render::RenderEngine;
use crate::tiles::TiledSurface;
use crate::types::{Point, Selection};
use crate::validation::{ValidationError, validate_canvas_size};

pub use capture::CaptureState;

/// Complete painting pipeline for a symmetric canvas
///
/// This struct manages the full drawing workflow:
/// 1. Input comes in via `pointer_down`, `pointer_move`, `pointer_up`
/// 2. Live segments are drawn under every symmetric copy
/// 3. Finished gestures are committed to the history
/// 4. Full redraws replay the history onto the surface
/// 5. Dirty tiles are tracked for presentation
pub struct PaintingPipeline {
    /// Tiled raster target
    pub surface: TiledSurface,
    pub(crate) history: StrokeHistory,
    pub(crate) recorder: StrokeRecorder,
    pub(crate) capture: CaptureState,
    pub(crate) selection: Selection,
    pub(crate) renderer: RenderEngine,
    pub(crate) capture_config: CaptureConfig,
    /// Symmetry center in canvas pixels
    pub(crate) center: Point,
    /// Gestures started so far, the source of stroke seeds
    pub(crate) stroke_sequence: u64,
}

impl PaintingPipeline {
    /// Create a pipeline and draw the empty background
    pub fn new(config: &SymmetraConfig) -> Result<Self, ValidationError> {
        let canvas = &config.canvas;
        validate_canvas_size(canvas.width, canvas.height)?;

        let mut pipeline = Self {
            surface: TiledSurface::new(canvas.width, canvas.height, canvas.tile_size),
            history: StrokeHistory::new(),
            recorder: StrokeRecorder::new(),
            capture: CaptureState::Idle,
            selection: Selection::default(),
            renderer: RenderEngine::new(canvas, &config.capture, config.reactive.afterglow),
            capture_config: config.capture.clone(),
            center: Point::from(canvas.center()),
            stroke_sequence: 0,
        };
        pipeline.render_all();

        debug!(
            "PaintingPipeline::new: {}x{} canvas, {}x{} tiles",
            canvas.width,
            canvas.height,
            pipeline.surface.tiles_x(),
            pipeline.surface.tiles_y()
        );
        Ok(pipeline)
    }

    pub fn width(&self) -> u32 {
        self.surface.surface().width
    }

    pub fn height(&self) -> u32 {
        self.surface.surface().height
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn renderer(&self) -> &RenderEngine {
        &self.renderer
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the whole selection; a gesture in progress keeps its own
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn cycle_color(&mut self) -> Selection {
        self.selection.color = self.selection.color.next();
        self.selection
    }

    pub fn cycle_symmetry(&mut self) -> Selection {
        self.selection.symmetry = self.selection.symmetry.next();
        self.selection
    }

    pub fn cycle_size(&mut self) -> Selection {
        self.selection.size = self.selection.size.next();
        self.selection
    }

    pub fn cycle_style(&mut self) -> Selection {
        self.selection.style = self.selection.style.next();
        self.selection
    }

    pub fn cycle_tool(&mut self) -> Selection {
        self.selection.tool = self.selection.tool.next();
        self.selection
    }

    /// Register a listener for history and capture events
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(&HistoryEvent) + 'static,
    {
        self.history.add_event_listener(listener);
    }
}

/// Mix a sequence number into a well-spread 64-bit seed (splitmix64)
pub fn stroke_seed(sequence: u64) -> u64 {
    let mut z = sequence.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CommandLog;
    use crate::history::DiscardReason;
    use crate::particles::ParticleBurst;
    use crate::reactive::Modulation;
    use crate::types::{BrushStyle, DrawTool, SymmetryOrder};
    use std::cell::RefCell;
    use std::rc::Rc;
    use symmetra_config::CanvasConfig;

    const WHITE: [f32; 4] = [1.0; 4];

    fn small_config() -> SymmetraConfig {
        SymmetraConfig {
            canvas: CanvasConfig {
                tile_size: 16,
                ..CanvasConfig::new(128, 128)
            },
            ..SymmetraConfig::default()
        }
    }

    fn pipeline() -> PaintingPipeline {
        let mut pipeline = PaintingPipeline::new(&small_config()).unwrap();
        pipeline.take_dirty_tiles();
        pipeline
    }

    fn polygon_pipeline() -> PaintingPipeline {
        let mut pipeline = pipeline();
        pipeline.cycle_tool();
        assert_eq!(pipeline.selection().tool, DrawTool::Polygon);
        pipeline
    }

    #[test]
    fn test_pipeline_creation() {
        let pipeline = PaintingPipeline::new(&small_config()).unwrap();
        assert_eq!(pipeline.width(), 128);
        assert_eq!(pipeline.height(), 128);
        assert_eq!(pipeline.center(), Point::new(64.0, 64.0));
        assert_eq!(pipeline.get_pixel(3, 3), Some(WHITE));
    }

    #[test]
    fn test_rejects_bad_canvas() {
        let config = SymmetraConfig {
            canvas: CanvasConfig::new(0, 10),
            ..SymmetraConfig::default()
        };
        assert!(PaintingPipeline::new(&config).is_err());
    }

    #[test]
    fn test_freehand_stroke_commits() {
        let mut pipeline = pipeline();
        pipeline.pointer_down(Point::new(70.0, 64.0));
        assert!(pipeline.is_capturing());
        pipeline.pointer_move(Point::new(80.0, 66.0));
        pipeline.pointer_move(Point::new(90.0, 70.0));

        assert_eq!(pipeline.pointer_up(), Some(0));
        assert!(!pipeline.is_capturing());

        let stroke = &pipeline.history().strokes()[0];
        assert_eq!(stroke.points.len(), 3);
        assert_eq!(stroke.tool, DrawTool::Freehand);
    }

    #[test]
    fn test_single_point_stroke_is_committed() {
        let mut pipeline = pipeline();
        pipeline.pointer_down(Point::new(100.0, 64.0));
        assert_eq!(pipeline.pointer_up(), Some(0));
        assert_eq!(pipeline.history().strokes()[0].points, vec![Point::new(100.0, 64.0)]);

        // Rendered as a dot at the point and its mirror image
        pipeline.render_all();
        assert_ne!(pipeline.get_pixel(100, 64), Some(WHITE));
        assert_ne!(pipeline.get_pixel(28, 64), Some(WHITE));
    }

    #[test]
    fn test_zero_length_move_is_ignored() {
        let mut pipeline = pipeline();
        pipeline.pointer_down(Point::new(70.0, 64.0));
        pipeline.take_dirty_tiles();

        pipeline.pointer_move(Point::new(70.0, 64.0));
        assert!(!pipeline.has_dirty_tiles());

        pipeline.pointer_up();
        assert_eq!(pipeline.history().strokes()[0].points.len(), 1);
    }

    #[test]
    fn test_live_segment_dirties_only_nearby_tiles() {
        let mut pipeline = pipeline();
        pipeline.pointer_down(Point::new(100.0, 64.0));
        pipeline.take_dirty_tiles();

        pipeline.pointer_move(Point::new(104.0, 64.0));
        let dirty = pipeline.take_dirty_tiles();
        let total = (pipeline.surface.tiles_x() * pipeline.surface.tiles_y()) as usize;
        assert!(!dirty.is_empty());
        assert!(dirty.len() < total);
    }

    #[test]
    fn test_short_polygon_drag_is_discarded() {
        let mut pipeline = polygon_pipeline();
        let discarded = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&discarded);
        pipeline.add_event_listener(move |event| {
            if let HistoryEvent::StrokeDiscarded { reason, .. } = event {
                sink.borrow_mut().push(*reason);
            }
        });

        pipeline.pointer_down(Point::new(64.0, 64.0));
        pipeline.pointer_move(Point::new(67.0, 68.0));
        assert_eq!(pipeline.pointer_up(), None);

        assert!(pipeline.history().is_empty());
        assert_eq!(*discarded.borrow(), vec![DiscardReason::BelowDragThreshold]);
    }

    #[test]
    fn test_overflowing_polygon_ring_is_discarded_as_invalid() {
        let mut pipeline = polygon_pipeline();
        let discarded = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&discarded);
        pipeline.add_event_listener(move |event| {
            if let HistoryEvent::StrokeDiscarded { reason, .. } = event {
                sink.borrow_mut().push(*reason);
            }
        });

        // The radius overflows f32, so the ring is not finite
        pipeline.pointer_down(Point::new(-3.0e38, 0.0));
        pipeline.pointer_move(Point::new(3.0e38, 0.0));
        assert!(!pipeline.is_capturing());
        assert_eq!(pipeline.pointer_up(), None);

        assert!(pipeline.history().is_empty());
        assert_eq!(*discarded.borrow(), vec![DiscardReason::InvalidPoints]);
        let blank = PaintingPipeline::new(&small_config()).unwrap();
        assert_eq!(pipeline.surface_bytes(), blank.surface_bytes());
    }

    #[test]
    fn test_polygon_commits_ring_at_release_point() {
        let mut pipeline = polygon_pipeline();
        pipeline.cycle_symmetry();
        assert_eq!(pipeline.selection().symmetry, SymmetryOrder::Three);

        pipeline.pointer_down(Point::new(64.0, 64.0));
        pipeline.pointer_move(Point::new(74.0, 64.0));
        pipeline.pointer_move(Point::new(84.0, 64.0));
        assert_eq!(pipeline.pointer_up(), Some(0));

        let ring = &pipeline.history().strokes()[0].points;
        assert_eq!(ring.len(), 4);
        assert!(ring[0].distance(Point::new(84.0, 64.0)) < 1e-4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn test_polygon_up_without_move_is_discarded() {
        let mut pipeline = polygon_pipeline();
        pipeline.pointer_down(Point::new(64.0, 64.0));
        assert_eq!(pipeline.pointer_up(), None);
        assert!(pipeline.history().is_empty());
    }

    #[test]
    fn test_polygon_preview_is_erased_on_release() {
        let mut pipeline = polygon_pipeline();
        pipeline.pointer_down(Point::new(64.0, 64.0));
        pipeline.pointer_move(Point::new(67.0, 64.0));
        let blank = PaintingPipeline::new(&small_config()).unwrap();
        assert_ne!(pipeline.surface_bytes(), blank.surface_bytes());

        pipeline.pointer_up();
        assert_eq!(pipeline.surface_bytes(), blank.surface_bytes());
    }

    #[test]
    fn test_static_render_is_idempotent() {
        let mut pipeline = pipeline();
        pipeline.cycle_style();
        assert_eq!(pipeline.selection().style, BrushStyle::Spray);
        pipeline.pointer_down(Point::new(80.0, 70.0));
        pipeline.pointer_move(Point::new(90.0, 75.0));
        pipeline.pointer_up();

        pipeline.cycle_style();
        pipeline.pointer_down(Point::new(40.0, 30.0));
        pipeline.pointer_move(Point::new(30.0, 50.0));
        pipeline.pointer_up();

        pipeline.render_all();
        let first = pipeline.surface_bytes().to_vec();
        pipeline.render_all();
        assert_eq!(first, pipeline.surface_bytes());
    }

    #[test]
    fn test_render_frame_leaves_history_untouched() {
        let mut pipeline = pipeline();
        pipeline.pointer_down(Point::new(80.0, 70.0));
        pipeline.pointer_move(Point::new(90.0, 75.0));
        pipeline.pointer_up();
        let before = pipeline.history().strokes().to_vec();

        let mut particles = ParticleBurst::new(&Default::default(), 4);
        let modulation = Modulation {
            rotation: 1.0,
            scale: 1.3,
            ..Modulation::neutral()
        };
        pipeline.render_frame(&modulation, &mut particles);

        assert_eq!(pipeline.history().strokes(), &before[..]);
        assert!(pipeline.surface.draw_state().is_neutral());
    }

    #[test]
    fn test_render_to_command_log_is_balanced() {
        let mut pipeline = pipeline();
        pipeline.cycle_symmetry();
        pipeline.cycle_symmetry();
        pipeline.pointer_down(Point::new(80.0, 70.0));
        pipeline.pointer_move(Point::new(90.0, 75.0));
        pipeline.pointer_up();

        let mut log = CommandLog::new(128, 128);
        pipeline.render_all_to(&mut log);
        assert!(log.state().is_neutral());
        // Order 4 with mirror draws eight copies
        assert_eq!(log.draws().count(), 8);
    }

    #[test]
    fn test_clear_history() {
        let mut pipeline = pipeline();
        pipeline.pointer_down(Point::new(80.0, 70.0));
        pipeline.pointer_up();
        assert_eq!(pipeline.clear_history(), 1);
        assert!(pipeline.history().is_empty());
        assert_eq!(pipeline.get_pixel(80, 70), Some(WHITE));
    }

    #[test]
    fn test_stroke_seed_spreads() {
        assert_ne!(stroke_seed(0), stroke_seed(1));
        assert_eq!(stroke_seed(7), stroke_seed(7));
    }
}
