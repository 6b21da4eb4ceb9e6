//! The `Animation` trait driven by the run loop.
//!
//! The trait is object-safe so hosts can hold a `Box<dyn Animation>` and so
//! the run loop can be exercised with small test animations.

use crate::error::DriftError;
use crate::surface::Surface;
use serde_json::Value;

/// A frame-stepped simulation that renders onto a [`Surface`].
pub trait Animation {
    /// Advance the simulation by one frame.
    fn update(&mut self);

    /// Render the current state. Must not change simulation state.
    fn draw(&self, surface: &mut dyn Surface) -> Result<(), DriftError>;

    /// Number of frames produced so far.
    fn frame(&self) -> u64;

    /// Snapshot of the current state as a JSON object.
    fn params(&self) -> Value;

    /// One frame: update, then draw.
    fn tick(&mut self, surface: &mut dyn Surface) -> Result<(), DriftError> {
        self.update();
        self.draw(surface)
    }
}
