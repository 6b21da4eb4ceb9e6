#![deny(unsafe_code)]
//! Particle emitters for drift.
//!
//! A [`World`] owns a list of [`ParticleSystem`]s. Each system spawns
//! [`Particle`]s at its anchor; particles drift along the system's gravity
//! with lateral jitter and fade as they shrink. One system may be
//! controllable: pointer moves relocate its anchor and modified wheel
//! events tune its particle size and scatter.
//!
//! Scenes are described by [`SceneConfig`] and can be loaded from JSON.

pub mod config;
pub mod input;
pub mod particle;
pub mod system;
pub mod vector;
pub mod world;

pub use config::{EmitterConfig, SceneConfig};
pub use input::{InputEvent, Modifiers, WheelInput};
pub use particle::Particle;
pub use system::ParticleSystem;
pub use vector::Vector;
pub use world::World;
