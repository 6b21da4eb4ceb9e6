#![deny(unsafe_code)]
//! Frame export: flattens a [`Raster`](drift_core::Raster) onto an opaque
//! background and writes it out as PNG.
//!
//! [`pixel`] builds without `image`, so RGBA bytes are available with
//! `default-features = false`. [`snapshot`] needs the `png` feature
//! (default on).

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::raster_to_rgba;

#[cfg(feature = "png")]
pub use snapshot::{write_png, FrameSequence};
