//! Audio-reactive animation state
//!
//! [`ReactiveState`] integrates the rotation offset across frames and maps
//! each frame's [`AudioFeatures`] to a [`Modulation`] that the render engine
//! applies to every stroke. Stopping playback calls [`ReactiveState::reset`]
//! so the next static redraw starts from θ = 0, s = 1.

use symmetra_audio::AudioFeatures;
use symmetra_config::ReactiveConfig;
use tracing::trace;

/// Per-frame drawing parameters derived from audio levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub features: AudioFeatures,
    /// Accumulated rotation θ in radians
    pub rotation: f32,
    /// Uniform scale s about the canvas center
    pub scale: f32,
    /// Palette steps added to every stroke color
    pub color_shift: usize,
    /// Glow halo width in pixels
    pub glow: f32,
    /// Multiplier on stroke widths
    pub width_factor: f32,
    /// Bass above the beat threshold this frame
    pub beat: bool,
}

impl Modulation {
    /// Parameters that reproduce the static rendering
    pub fn neutral() -> Self {
        Self {
            features: AudioFeatures::default(),
            rotation: 0.0,
            scale: 1.0,
            color_shift: 0,
            glow: 0.0,
            width_factor: 1.0,
            beat: false,
        }
    }
}

impl Default for Modulation {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Scale factor for a bass level: 1 at silence, 1 + boost at 255
pub fn scale_for_bass(bass_level: f32, scale_boost: f32) -> f32 {
    1.0 + bass_level.clamp(0.0, 255.0) / 255.0 * scale_boost
}

/// Rotation and scale carried between reactive frames
#[derive(Debug, Clone)]
pub struct ReactiveState {
    config: ReactiveConfig,
    rotation: f32,
    scale: f32,
}

impl ReactiveState {
    pub fn new(config: &ReactiveConfig) -> Self {
        Self {
            config: config.clone(),
            rotation: 0.0,
            scale: 1.0,
        }
    }

    /// Step one frame with this frame's levels
    pub fn advance(&mut self, features: AudioFeatures) -> Modulation {
        let bass = features.bass_level.clamp(0.0, 255.0);
        let mid = features.mid_level.clamp(0.0, 255.0);
        let cfg = &self.config;

        self.scale = scale_for_bass(bass, cfg.scale_boost);
        self.rotation += cfg.base_spin + mid / 255.0 * cfg.mid_spin;

        let color_shift = if cfg.color_shift_step > 0.0 {
            (mid / cfg.color_shift_step).floor() as usize
        } else {
            0
        };

        let modulation = Modulation {
            features,
            rotation: self.rotation,
            scale: self.scale,
            color_shift,
            glow: cfg.glow_base + bass / cfg.glow_bass_divisor.max(f32::EPSILON),
            width_factor: 1.0 + bass / cfg.width_bass_divisor.max(f32::EPSILON),
            beat: bass > cfg.beat_threshold,
        };
        trace!(
            "ReactiveState::advance: bass={:.1} mid={:.1} -> θ={:.4} s={:.3} shift={}",
            bass,
            mid,
            modulation.rotation,
            modulation.scale,
            modulation.color_shift
        );
        modulation
    }

    /// Return to θ = 0, s = 1
    pub fn reset(&mut self) {
        self.rotation = 0.0;
        self.scale = 1.0;
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn config(&self) -> &ReactiveConfig {
        &self.config
    }
}
