//! Particle bursts drawn on top of reactive frames

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use symmetra_audio::AudioFeatures;
use symmetra_config::ReactiveConfig;
use tracing::trace;

use crate::canvas::{Canvas, DrawCommand, LineCap, with_saved_state};
use crate::constants::{PARTICLE_DAMPING, PARTICLE_GLOW, PARTICLE_MAX_SPEED};
use crate::types::{PaletteColor, Point};

/// A single glowing dot flying out from the center
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    /// Radius in pixels
    pub size: f32,
    pub color: PaletteColor,
    /// Remaining life; also the draw alpha
    pub life: f32,
    pub decay: f32,
}

impl Particle {
    /// Move one tick and fade
    pub fn update(&mut self) {
        self.position += self.velocity;
        self.velocity *= PARTICLE_DAMPING;
        self.life -= self.decay;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// The set of live particles plus the rng that spawns them
pub struct ParticleBurst {
    particles: Vec<Particle>,
    rng: StdRng,
    mid_threshold: f32,
    chance: f32,
    mid_divisor: f32,
}

impl ParticleBurst {
    pub fn new(config: &ReactiveConfig, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            mid_threshold: config.particle_mid_threshold,
            chance: config.particle_chance,
            mid_divisor: config.particle_mid_divisor.max(1.0),
        }
    }

    /// Maybe spawn particles at `origin` for this frame's levels
    ///
    /// A burst fires when the mid level is above the threshold, or by
    /// chance otherwise. Returns the number spawned.
    pub fn emit(&mut self, origin: Point, features: AudioFeatures) -> usize {
        let mid = features.mid_level.clamp(0.0, 255.0);
        let lucky = self.rng.gen_range(0.0..1.0f32) < self.chance;
        if mid <= self.mid_threshold && !lucky {
            return 0;
        }

        let count = (mid / self.mid_divisor).floor() as usize;
        let speed_factor = 1.0 + features.bass_level.clamp(0.0, 255.0) / 100.0;
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.gen_range(0.0..1.0f32) * PARTICLE_MAX_SPEED * speed_factor;
            let particle = Particle {
                position: origin,
                velocity: Point::from_angle(angle) * speed,
                size: self.rng.gen_range(2.0..12.0),
                color: PaletteColor::from_index(self.rng.gen_range(0..PaletteColor::ALL.len())),
                life: 1.0,
                decay: self.rng.gen_range(0.01..0.04),
            };
            self.particles.push(particle);
        }
        trace!("ParticleBurst::emit: {} spawned, {} live", count, self.particles.len());
        count
    }

    /// Advance every particle and drop the dead ones
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Draw every particle in its own save/restore scope
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for particle in &self.particles {
            let [r, g, b, _] = particle.color.rgba();
            let command = DrawCommand::Polyline {
                points: vec![particle.position],
                width: particle.size * 2.0,
                color: [r, g, b, particle.life.clamp(0.0, 1.0)],
                cap: LineCap::Round,
                glow: PARTICLE_GLOW,
            };
            with_saved_state(&mut *canvas, |canvas| canvas.draw(&command));
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
