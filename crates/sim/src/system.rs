//! Particle emitter: a capped population spawned around a movable anchor.
//!
//! Each update runs three phases in order:
//!
//! 1. **Cull** dead particles.
//! 2. **Spawn** exactly `creation_amount` particles at a copy of the anchor,
//!    but only if the whole batch fits under `max_amount`. A batch that would
//!    overflow the cap spawns nothing.
//! 3. **Advance** every live particle once, including the ones just spawned.

use drift_core::error::DriftError;
use drift_core::prng::UniformSource;
use drift_core::surface::Surface;
use serde_json::{json, Value};

use crate::config::EmitterConfig;
use crate::particle::Particle;
use crate::vector::{round_half_up, Vector};

/// Wheel delta units per particle-size step.
pub const SIZE_WHEEL_DIVISOR: f64 = 100.0;
/// Wheel delta units per unit of scatter.
pub const SCATTER_WHEEL_DIVISOR: f64 = 1000.0;
/// Smallest particle size reachable through wheel input.
pub const MIN_PARTICLE_SIZE: u32 = 1;

/// A configured emitter and its live particles, in spawn order.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    coords: Vector,
    gravity: Vector,
    max_amount: usize,
    creation_amount: usize,
    particle_size: u32,
    scatter: f64,
    controllable: bool,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new(config: &EmitterConfig) -> Self {
        Self {
            coords: config.coords,
            gravity: config.gravity,
            max_amount: config.max_amount,
            creation_amount: config.creation_amount,
            particle_size: config.particle_size,
            scatter: config.scatter,
            controllable: config.controllable,
            particles: Vec::with_capacity(config.max_amount),
        }
    }

    pub fn coords(&self) -> Vector {
        self.coords
    }

    pub fn gravity(&self) -> Vector {
        self.gravity
    }

    pub fn max_amount(&self) -> usize {
        self.max_amount
    }

    pub fn creation_amount(&self) -> usize {
        self.creation_amount
    }

    pub fn particle_size(&self) -> u32 {
        self.particle_size
    }

    pub fn scatter(&self) -> f64 {
        self.scatter
    }

    pub fn is_controllable(&self) -> bool {
        self.controllable
    }

    pub(crate) fn set_controllable(&mut self, controllable: bool) {
        self.controllable = controllable;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    /// Moves the spawn anchor. Existing particles keep their positions.
    pub fn set_coords(&mut self, coords: Vector) {
        self.coords = coords;
    }

    /// Applies a wheel delta to the size of future particles:
    /// `round(max(1, particle_size - delta / 100))`.
    pub fn adjust_particle_size(&mut self, wheel_delta: f64) {
        if !wheel_delta.is_finite() {
            return;
        }
        let target = (f64::from(self.particle_size) - wheel_delta / SIZE_WHEEL_DIVISOR)
            .max(f64::from(MIN_PARTICLE_SIZE));
        self.particle_size = round_half_up(target).min(f64::from(u32::MAX)) as u32;
    }

    /// Applies a wheel delta to the jitter of future particles:
    /// `max(0, scatter - delta / 1000)`.
    pub fn adjust_scatter(&mut self, wheel_delta: f64) {
        if !wheel_delta.is_finite() {
            return;
        }
        self.scatter = (self.scatter - wheel_delta / SCATTER_WHEEL_DIVISOR).max(0.0);
    }

    /// One cull / spawn / advance step.
    pub fn update<R: UniformSource + ?Sized>(&mut self, rng: &mut R) {
        self.particles.retain(Particle::is_alive);

        if self.particles.len() + self.creation_amount <= self.max_amount {
            let (gravity, size, scatter) = (self.gravity, self.particle_size, self.scatter);
            for _ in 0..self.creation_amount {
                self.particles
                    .push(Particle::new(self.coords.copy(), gravity, size, scatter));
            }
        } else {
            log::trace!(
                "spawn of {} refused: {} live of {} max",
                self.creation_amount,
                self.particles.len(),
                self.max_amount
            );
        }

        for particle in &mut self.particles {
            particle.update(rng);
        }
    }

    /// Draws every live particle in spawn order.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), DriftError> {
        self.particles
            .iter()
            .filter(|p| p.is_alive())
            .try_for_each(|p| p.draw(surface))
    }

    /// Current tunables and population as JSON.
    pub fn params(&self) -> Value {
        json!({
            "controllable": self.controllable,
            "coords": { "x": self.coords.x, "y": self.coords.y },
            "gravity": { "x": self.gravity.x, "y": self.gravity.y },
            "max_amount": self.max_amount,
            "creation_amount": self.creation_amount,
            "particle_size": self.particle_size,
            "scatter": self.scatter,
            "live": self.particles.len(),
        })
    }
}
