//! A single fading particle.

use drift_core::color::Rgba;
use drift_core::error::DriftError;
use drift_core::prng::UniformSource;
use drift_core::surface::{RadialGradient, Surface};

use crate::vector::Vector;

/// Gradient stop at the particle center.
pub const CORE_COLOR: Rgba = Rgba::white(0.5);
/// Gradient stop halfway to the rim.
pub const HALO_COLOR: Rgba = Rgba::white(0.25);
/// Offset of the halo stop.
pub const HALO_OFFSET: f64 = 0.5;

/// A point that shrinks by one unit per update and drifts along its
/// emitter's force with lateral jitter.
///
/// `size` doubles as remaining lifetime and draw radius. Once it reaches 0
/// the particle is dead: updates do nothing and it is not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vector,
    gravity: Vector,
    initial_size: u32,
    size: u32,
    scatter: f64,
}

impl Particle {
    /// Spawns a particle at `position` with `size` as both initial and
    /// current size. `gravity` and `scatter` are the emitter's values at
    /// spawn time.
    pub fn new(position: Vector, gravity: Vector, size: u32, scatter: f64) -> Self {
        Self {
            position,
            gravity,
            initial_size: size,
            size,
            scatter,
        }
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn gravity(&self) -> Vector {
        self.gravity
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn initial_size(&self) -> u32 {
        self.initial_size
    }

    pub fn scatter(&self) -> f64 {
        self.scatter
    }

    pub fn is_alive(&self) -> bool {
        self.size > 0
    }

    /// Opacity for the current size: `size / initial_size`.
    pub fn alpha(&self) -> f64 {
        if self.initial_size == 0 {
            return 0.0;
        }
        f64::from(self.size) / f64::from(self.initial_size)
    }

    /// Ages the particle by one step and moves it by
    /// `gravity + get_random(gravity, scatter)`. Does nothing once dead.
    pub fn update<R: UniformSource + ?Sized>(&mut self, rng: &mut R) {
        if self.size == 0 {
            return;
        }
        self.size -= 1;
        self.position = self.position + self.gravity + Vector::get_random(self.gravity, self.scatter, rng);
    }

    /// The radial glow used to fill this particle.
    pub fn gradient(&self) -> RadialGradient {
        let Vector { x, y } = self.position;
        RadialGradient::new(x, y, f64::from(self.size))
            .with_stop(0.0, CORE_COLOR)
            .with_stop(HALO_OFFSET, HALO_COLOR)
            .with_stop(1.0, Rgba::TRANSPARENT)
    }

    /// Fills a circle of radius `size` with the glow gradient at opacity
    /// [`Particle::alpha`]. Dead particles draw nothing.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), DriftError> {
        if !self.is_alive() {
            return Ok(());
        }
        surface.set_global_alpha(self.alpha());
        surface.fill_circle(
            self.position.x,
            self.position.y,
            f64::from(self.size),
            &self.gradient(),
        )
    }
}
