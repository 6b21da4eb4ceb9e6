//! Scene configuration: canvas, background, seed, and emitters.
//!
//! Every field has a default, so a scene file only needs the keys it changes.
//! [`SceneConfig::default`] is the four-emitter cross: one controllable
//! emitter at the bottom pushing up, and three fixed emitters at the top,
//! left, and right pushing toward the center.

use drift_core::color::Srgb;
use drift_core::error::DriftError;
use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Canvas width used when none is given (or when the host reports 0).
pub const DEFAULT_WIDTH: u32 = 500;
/// Canvas height used when none is given (or when the host reports 0).
pub const DEFAULT_HEIGHT: u32 = 500;
/// PRNG seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

pub const DEFAULT_MAX_AMOUNT: usize = 100;
pub const DEFAULT_CREATION_AMOUNT: usize = 1;
pub const DEFAULT_PARTICLE_SIZE: u32 = 50;
pub const DEFAULT_SCATTER: f64 = 1.5;

/// Static configuration of one emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Whether pointer input steers this emitter.
    pub controllable: bool,
    /// Spawn anchor.
    pub coords: Vector,
    /// Constant per-update displacement of every particle.
    pub gravity: Vector,
    /// Population cap.
    pub max_amount: usize,
    /// Particles spawned per update while under the cap.
    pub creation_amount: usize,
    /// Initial radius (and lifetime in updates) of new particles.
    pub particle_size: u32,
    /// Jitter magnitude.
    pub scatter: f64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            controllable: false,
            coords: Vector::ZERO,
            gravity: Vector::ZERO,
            max_amount: DEFAULT_MAX_AMOUNT,
            creation_amount: DEFAULT_CREATION_AMOUNT,
            particle_size: DEFAULT_PARTICLE_SIZE,
            scatter: DEFAULT_SCATTER,
        }
    }
}

impl EmitterConfig {
    /// An emitter at `coords` pushing along `gravity`, other fields default.
    pub fn new(coords: Vector, gravity: Vector) -> Self {
        Self {
            coords,
            gravity,
            ..Self::default()
        }
    }

    pub fn controllable(mut self, controllable: bool) -> Self {
        self.controllable = controllable;
        self
    }

    /// Checks the fields that would otherwise produce non-finite positions or
    /// particles that never render.
    pub fn validate(&self) -> Result<(), DriftError> {
        if !self.coords.is_finite() || !self.gravity.is_finite() {
            return Err(DriftError::InvalidConfig(
                "emitter coords and gravity must be finite".into(),
            ));
        }
        if self.particle_size == 0 {
            return Err(DriftError::InvalidConfig(
                "emitter particle_size must be at least 1".into(),
            ));
        }
        if !self.scatter.is_finite() || self.scatter < 0.0 {
            return Err(DriftError::InvalidConfig(format!(
                "emitter scatter must be finite and non-negative, got {}",
                self.scatter
            )));
        }
        Ok(())
    }
}

/// Everything needed to build a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    /// Color behind the particles in exported frames.
    pub background: Srgb,
    pub seed: u64,
    pub emitters: Vec<EmitterConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let (w, h) = (f64::from(DEFAULT_WIDTH), f64::from(DEFAULT_HEIGHT));
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Srgb::BLACK,
            seed: DEFAULT_SEED,
            emitters: vec![
                EmitterConfig::new(Vector::new(w / 2.0, h - 50.0), Vector::new(0.0, -5.0))
                    .controllable(true),
                EmitterConfig::new(Vector::new(w / 2.0, 50.0), Vector::new(0.0, 5.0)),
                EmitterConfig::new(Vector::new(50.0, h / 2.0), Vector::new(5.0, 0.0)),
                EmitterConfig::new(Vector::new(w - 50.0, h / 2.0), Vector::new(-5.0, 0.0)),
            ],
        }
    }
}

impl SceneConfig {
    /// A scene with the default canvas and no emitters.
    pub fn empty() -> Self {
        Self {
            emitters: Vec::new(),
            ..Self::default()
        }
    }

    /// Parses a scene from JSON. Missing keys take their defaults; the
    /// result is validated.
    pub fn from_json_str(json: &str) -> Result<Self, DriftError> {
        let scene: SceneConfig = serde_json::from_str(json)
            .map_err(|e| DriftError::InvalidConfig(format!("scene JSON: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Non-zero dimensions, valid emitters, and at most one controllable
    /// emitter.
    pub fn validate(&self) -> Result<(), DriftError> {
        if self.width == 0 || self.height == 0 {
            return Err(DriftError::InvalidDimensions);
        }
        for (i, emitter) in self.emitters.iter().enumerate() {
            emitter.validate().map_err(|e| match e {
                DriftError::InvalidConfig(msg) => DriftError::InvalidConfig(format!("emitter {i}: {msg}")),
                other => other,
            })?;
        }
        let controllable = self.emitters.iter().filter(|e| e.controllable).count();
        if controllable > 1 {
            return Err(DriftError::InvalidConfig(format!(
                "at most one emitter may be controllable, found {controllable}"
            )));
        }
        Ok(())
    }
}
