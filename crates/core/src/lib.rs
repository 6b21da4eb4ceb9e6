#![deny(unsafe_code)]
//! Core types and traits for drift, an interactive particle-emitter effect.
//!
//! Provides the `Surface` drawing seam with its `RadialGradient`, the software
//! `Raster` surface, the `Animation` trait and `RunLoop`, color types
//! (`Srgb`, `Rgba`), the `Xorshift64` PRNG, and `DriftError`.

pub mod animation;
pub mod color;
pub mod error;
pub mod prng;
pub mod raster;
pub mod run_loop;
pub mod surface;

pub use animation::Animation;
pub use color::{Rgba, Srgb};
pub use error::DriftError;
pub use prng::{SequenceSource, UniformSource, Xorshift64};
pub use raster::Raster;
pub use run_loop::{FixedRate, FrameScheduler, Immediate, RunLoop, StopSignal};
pub use surface::{ColorStop, RadialGradient, Surface};
