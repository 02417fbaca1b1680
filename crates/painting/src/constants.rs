/// Maximum canvas edge length in pixels.
pub const MAX_CANVAS_SIZE: u32 = 4096;

/// Ribbon strokes are drawn at this fraction of the brush diameter.
pub const RIBBON_WIDTH_FACTOR: f32 = 0.5;

/// Side of a static spray dot in pixels.
pub const SPRAY_DOT_SIZE: f32 = 1.0;

/// Side of a live spray dot in pixels.
pub const SPRAY_LIVE_DOT_SIZE: f32 = 1.5;

/// Segments shorter than this are treated as zero-length.
pub const MIN_SEGMENT_LENGTH: f32 = 0.001;

/// Opacity of the glow halo drawn under reactive strokes.
pub const GLOW_OPACITY: f32 = 0.2;

/// Glow halo width around burst particles.
pub const PARTICLE_GLOW: f32 = 10.0;

/// Per-tick velocity damping of burst particles.
pub const PARTICLE_DAMPING: f32 = 0.95;

/// Base particle launch speed in pixels per tick.
pub const PARTICLE_MAX_SPEED: f32 = 15.0;
