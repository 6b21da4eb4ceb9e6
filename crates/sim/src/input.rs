//! Pointer input delivered by a host.

use serde::{Deserialize, Serialize};

/// Legacy `wheelDelta` units per wheel notch.
pub const WHEEL_NOTCH: f64 = 120.0;

/// Modifier keys held during a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Adjusts particle size.
    pub shift: bool,
    /// Adjusts scatter.
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
    };

    pub fn any(self) -> bool {
        self.shift || self.alt
    }
}

/// A wheel event.
///
/// `delta` uses the legacy `wheelDelta` sign: positive when scrolling up,
/// [`WHEEL_NOTCH`] per notch. Hosts reporting DOM `deltaY` pass `-deltaY`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelInput {
    pub delta: f64,
    pub modifiers: Modifiers,
}

impl WheelInput {
    pub fn new(delta: f64, modifiers: Modifiers) -> Self {
        Self { delta, modifiers }
    }

    /// Builds a wheel input from a DOM `WheelEvent.deltaY` value.
    pub fn from_delta_y(delta_y: f64, modifiers: Modifiers) -> Self {
        Self::new(-delta_y, modifiers)
    }
}

/// An input event routed to the controllable emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer moved to surface-local `(x, y)`.
    PointerMove { x: f64, y: f64 },
    /// Wheel scrolled.
    Wheel(WheelInput),
}

impl InputEvent {
    /// Whether the host should suppress the event's default action
    /// (page scrolling for wheel events).
    pub fn suppresses_default(&self) -> bool {
        matches!(self, InputEvent::Wheel(_))
    }
}
