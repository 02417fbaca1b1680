//! Shared configuration for Symmetra
//!
//! This crate provides the single source of truth for canvas dimensions,
//! capture thresholds, audio-reactive tuning and analyser settings shared
//! by the painting core, the audio crate and the driver binary.
//!
//! Every section is `#[serde(default)]`, so a JSON file only needs to name
//! the values it overrides.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 600;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 600;

/// Default tile size for dirty tracking
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Minimum drag distance (pixels) before a polygon is committed
pub const DEFAULT_POLYGON_MIN_DRAG: f32 = 5.0;

/// Default analyser FFT size (yields 128 usable bins)
pub const DEFAULT_FFT_SIZE: usize = 256;

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Canvas dimensions and background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Static-mode background, RGBA 0..1
    pub background: [f32; 4],
    /// Tile edge length used for dirty tracking
    pub tile_size: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: [1.0, 1.0, 1.0, 1.0],
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl CanvasConfig {
    /// Create a canvas config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Canvas center in pixel coordinates
    pub fn center(&self) -> [f32; 2] {
        [self.width as f32 / 2.0, self.height as f32 / 2.0]
    }
}

/// Stroke capture and brush texture settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Polygon drags at or below this distance are discarded
    pub polygon_min_drag: f32,
    /// Dots scattered around each stored point by the static spray brush
    pub spray_dots_per_point: u32,
    /// Dots scattered per interpolation step while drawing spray live
    pub spray_live_density: u32,
    /// Interpolation step (pixels) for live spray segments
    pub spray_live_step: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            polygon_min_drag: DEFAULT_POLYGON_MIN_DRAG,
            spray_dots_per_point: 3,
            spray_live_density: 5,
            spray_live_step: 2.0,
        }
    }
}

/// Audio-reactive modulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactiveConfig {
    /// Extra scale at maximum bass (scale = 1 + bass/255 * boost)
    pub scale_boost: f32,
    /// Rotation added every frame regardless of audio (radians)
    pub base_spin: f32,
    /// Rotation added at maximum mid level (radians)
    pub mid_spin: f32,
    /// Mid level per palette step of color shift
    pub color_shift_step: f32,
    /// Glow radius with silent bass
    pub glow_base: f32,
    /// Bass divisor for additional glow
    pub glow_bass_divisor: f32,
    /// Bass divisor for line width growth
    pub width_bass_divisor: f32,
    /// Fill composited over the previous frame, RGBA 0..1
    pub afterglow: [f32; 4],
    /// Bass level above which a frame counts as a beat hit
    pub beat_threshold: f32,
    /// Mid level above which particles are always emitted
    pub particle_mid_threshold: f32,
    /// Chance of emitting particles on a quiet frame
    pub particle_chance: f32,
    /// Mid level per emitted particle
    pub particle_mid_divisor: f32,
    /// Animation frame rate used by the paced scheduler
    pub frame_rate: f32,
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            scale_boost: 0.4,
            base_spin: 0.002,
            mid_spin: 0.02,
            color_shift_step: 30.0,
            glow_base: 15.0,
            glow_bass_divisor: 10.0,
            width_bass_divisor: 300.0,
            afterglow: [0.0, 0.0, 0.0, 0.2],
            beat_threshold: 200.0,
            particle_mid_threshold: 150.0,
            particle_chance: 0.1,
            particle_mid_divisor: 40.0,
            frame_rate: 60.0,
        }
    }
}

impl ReactiveConfig {
    /// Duration of one animation frame in seconds
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.frame_rate.max(1.0)
    }
}

/// Spectrum analyser and feature band settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// FFT window length in samples (bins = fft_size / 2)
    pub fft_size: usize,
    /// Smoothing time constant between analyser snapshots (0..1)
    pub smoothing: f32,
    /// Magnitude mapped to byte 0
    pub min_decibels: f32,
    /// Magnitude mapped to byte 255
    pub max_decibels: f32,
    /// Playback volume applied before analysis
    pub volume: f32,
    /// Bins averaged into the bass level, `[start, end)`
    pub bass_bins: [usize; 2],
    /// Bins averaged into the mid level, `[start, end)`
    pub mid_bins: [usize; 2],
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            volume: 0.6,
            bass_bins: [0, 10],
            mid_bins: [20, 100],
        }
    }
}

impl AudioConfig {
    /// Number of usable frequency bins
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Bass band as a range
    pub fn bass_range(&self) -> Range<usize> {
        self.bass_bins[0]..self.bass_bins[1]
    }

    /// Mid band as a range
    pub fn mid_range(&self) -> Range<usize> {
        self.mid_bins[0]..self.mid_bins[1]
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetraConfig {
    pub canvas: CanvasConfig,
    pub capture: CaptureConfig,
    pub reactive: ReactiveConfig,
    pub audio: AudioConfig,
}

impl SymmetraConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SymmetraConfig::default();
        assert_eq!(config.canvas.width, DEFAULT_WIDTH);
        assert_eq!(config.canvas.height, DEFAULT_HEIGHT);
        assert_eq!(config.capture.polygon_min_drag, 5.0);
        assert_eq!(config.audio.bin_count(), 128);
        assert_eq!(config.audio.bass_range(), 0..10);
        assert_eq!(config.audio.mid_range(), 20..100);
    }

    #[test]
    fn test_canvas_center() {
        let canvas = CanvasConfig::new(400, 300);
        assert_eq!(canvas.center(), [200.0, 150.0]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "canvas": { "width": 320 }, "reactive": { "scale_boost": 0.5 } }"#;
        let config = SymmetraConfig::from_json_str(json).unwrap();
        assert_eq!(config.canvas.width, 320);
        assert_eq!(config.canvas.height, DEFAULT_HEIGHT);
        assert_eq!(config.reactive.scale_boost, 0.5);
        assert_eq!(config.reactive.base_spin, 0.002);
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        let result = SymmetraConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "audio": {{ "fft_size": 512 }} }}"#).unwrap();

        let config = SymmetraConfig::load(file.path()).unwrap();
        assert_eq!(config.audio.fft_size, 512);
        assert_eq!(config.audio.bin_count(), 256);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SymmetraConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_frame_seconds() {
        let reactive = ReactiveConfig::default();
        assert!((reactive.frame_seconds() - 1.0 / 60.0).abs() < 1e-6);
    }
}
