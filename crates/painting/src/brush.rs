//! Brush engine: style strategies that turn strokes into draw commands
//!
//! Each [`BrushStyle`] maps to a pair of plain functions, one that draws a
//! whole committed stroke and one that draws a single live segment while
//! the pointer is moving. The functions work in stroke space; the render
//! engine places the resulting commands under each symmetric copy's
//! transform.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use symmetra_config::CaptureConfig;
use tracing::debug;

use crate::canvas::{DrawCommand, LineCap};
use crate::constants::{RIBBON_WIDTH_FACTOR, SPRAY_DOT_SIZE, SPRAY_LIVE_DOT_SIZE};
use crate::reactive::Modulation;
use crate::types::{BrushStyle, Point, Selection, Stroke};

/// Spray scatter settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushTexture {
    /// Dots scattered per stored point in a committed spray stroke
    pub dots_per_point: u32,
    /// Dots scattered per step while drawing live
    pub live_density: u32,
    /// Distance in pixels between live scatter steps
    pub live_step: f32,
}

impl Default for BrushTexture {
    fn default() -> Self {
        Self::from(&CaptureConfig::default())
    }
}

impl From<&CaptureConfig> for BrushTexture {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            dots_per_point: config.spray_dots_per_point,
            live_density: config.spray_live_density,
            live_step: config.spray_live_step.max(0.1),
        }
    }
}

/// Resolved drawing parameters for one stroke in one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleParams {
    pub color: [f32; 4],
    /// Brush diameter after modulation
    pub width: f32,
    pub glow: f32,
    /// Drawn during reactive playback
    pub animated: bool,
}

impl StyleParams {
    /// Parameters for a static redraw
    pub fn for_stroke(stroke: &Stroke) -> Self {
        Self {
            color: stroke.color.rgba(),
            width: stroke.size.diameter(),
            glow: 0.0,
            animated: false,
        }
    }

    /// Parameters for a reactive frame
    pub fn reactive(stroke: &Stroke, modulation: &Modulation) -> Self {
        Self {
            color: stroke.color.shifted(modulation.color_shift).rgba(),
            width: stroke.size.diameter() * modulation.width_factor,
            glow: modulation.glow,
            animated: true,
        }
    }
}

/// Draws a whole stroke
pub type PathStrategy = fn(&Stroke, &StyleParams, &BrushTexture) -> Vec<DrawCommand>;

/// Draws one live segment; the rng drives any scatter
pub type SegmentStrategy =
    fn(Point, Point, &Selection, &BrushTexture, &mut StdRng) -> Vec<DrawCommand>;

/// Whole-stroke strategy for a style
pub fn path_strategy(style: BrushStyle) -> PathStrategy {
    match style {
        BrushStyle::Neon => neon_path,
        BrushStyle::Spray => spray_path,
        BrushStyle::Ribbon => ribbon_path,
    }
}

/// Live-segment strategy for a style
pub fn segment_strategy(style: BrushStyle) -> SegmentStrategy {
    match style {
        BrushStyle::Neon => neon_segment,
        BrushStyle::Spray => spray_segment,
        BrushStyle::Ribbon => ribbon_segment,
    }
}

fn neon_path(stroke: &Stroke, params: &StyleParams, _texture: &BrushTexture) -> Vec<DrawCommand> {
    vec![DrawCommand::Polyline {
        points: stroke.points.clone(),
        width: params.width,
        color: params.color,
        cap: LineCap::Round,
        glow: params.glow,
    }]
}

fn ribbon_path(stroke: &Stroke, params: &StyleParams, _texture: &BrushTexture) -> Vec<DrawCommand> {
    vec![DrawCommand::Polyline {
        points: stroke.points.clone(),
        width: params.width * RIBBON_WIDTH_FACTOR,
        color: params.color,
        cap: LineCap::Butt,
        glow: params.glow,
    }]
}

fn spray_path(stroke: &Stroke, params: &StyleParams, texture: &BrushTexture) -> Vec<DrawCommand> {
    if params.animated {
        // Dash gap follows the stroke's own size; bass only grows the dots
        let period = 1.0 + 2.0 * stroke.size.diameter();
        return vec![DrawCommand::Dots {
            centers: dash_centers(&stroke.points, period),
            size: params.width,
            color: params.color,
            round: true,
        }];
    }

    // Seeded so a redraw scatters exactly the same dots
    let mut rng = StdRng::seed_from_u64(stroke.seed);
    let spread = stroke.size.diameter();
    let mut centers = Vec::with_capacity(stroke.points.len() * texture.dots_per_point as usize);
    for &point in &stroke.points {
        for _ in 0..texture.dots_per_point {
            let offset = Point::new(
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
            );
            centers.push(point + offset);
        }
    }

    vec![DrawCommand::Dots {
        centers,
        size: SPRAY_DOT_SIZE,
        color: params.color,
        round: false,
    }]
}

/// Dash positions along a polyline, one every `period` pixels of arc length
fn dash_centers(points: &[Point], period: f32) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut centers = vec![first];
    let mut until_next = period;

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = a.distance(b);
        let mut travelled = 0.0;
        while length - travelled >= until_next {
            travelled += until_next;
            centers.push(a.lerp(b, travelled / length));
            until_next = period;
        }
        until_next -= length - travelled;
    }
    centers
}

fn neon_segment(
    from: Point,
    to: Point,
    selection: &Selection,
    _texture: &BrushTexture,
    _rng: &mut StdRng,
) -> Vec<DrawCommand> {
    vec![DrawCommand::Polyline {
        points: vec![from, to],
        width: selection.size.diameter(),
        color: selection.color.rgba(),
        cap: LineCap::Round,
        glow: 0.0,
    }]
}

fn ribbon_segment(
    from: Point,
    to: Point,
    selection: &Selection,
    _texture: &BrushTexture,
    _rng: &mut StdRng,
) -> Vec<DrawCommand> {
    vec![DrawCommand::Polyline {
        points: vec![from, to],
        width: selection.size.diameter() * RIBBON_WIDTH_FACTOR,
        color: selection.color.rgba(),
        cap: LineCap::Butt,
        glow: 0.0,
    }]
}

fn spray_segment(
    from: Point,
    to: Point,
    selection: &Selection,
    texture: &BrushTexture,
    rng: &mut StdRng,
) -> Vec<DrawCommand> {
    let radius = selection.size.diameter();
    let steps = ((from.distance(to) / texture.live_step).floor() as usize).max(1);

    let mut centers = Vec::with_capacity(steps * texture.live_density as usize);
    for step in 0..steps {
        let base = from.lerp(to, step as f32 / steps as f32);
        for _ in 0..texture.live_density {
            let r = rng.gen_range(0.0..radius);
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            centers.push(base + Point::from_angle(angle) * r);
        }
    }

    vec![DrawCommand::Dots {
        centers,
        size: SPRAY_LIVE_DOT_SIZE,
        color: selection.color.rgba(),
        round: false,
    }]
}

/// Brush engine holding the spray texture shared by all styles
#[derive(Debug, Clone, Default)]
pub struct BrushEngine {
    texture: BrushTexture,
}

impl BrushEngine {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            texture: BrushTexture::from(config),
        }
    }

    pub fn texture(&self) -> &BrushTexture {
        &self.texture
    }

    /// Commands for a whole stroke in stroke space
    pub fn path_commands(&self, stroke: &Stroke, params: &StyleParams) -> Vec<DrawCommand> {
        path_strategy(stroke.style)(stroke, params, &self.texture)
    }

    /// Commands for the newest live segment in stroke space
    pub fn segment_commands(
        &self,
        from: Point,
        to: Point,
        selection: &Selection,
        seed: u64,
    ) -> Vec<DrawCommand> {
        let mut rng = StdRng::seed_from_u64(seed);
        let strategy = segment_strategy(selection.style);
        let commands = strategy(from, to, selection, &self.texture, &mut rng);
        debug!(
            "BrushEngine::segment_commands: {:?} ({:.1}, {:.1}) -> ({:.1}, {:.1}), {} commands",
            selection.style,
            from.x,
            from.y,
            to.x,
            to.y,
            commands.len()
        );
        commands
    }
}
