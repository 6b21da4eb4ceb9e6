//! The drawing-surface seam.
//!
//! Everything drift draws goes through [`Surface`], a small immediate-mode
//! subset of the Canvas 2D API: clear a rectangle, set a global alpha, and
//! fill a circle with a [`RadialGradient`]. The browser host implements it over
//! `CanvasRenderingContext2d`; [`Raster`](crate::raster::Raster) implements it
//! in software for headless rendering and tests.

use crate::color::Rgba;
use crate::error::DriftError;

/// One color stop of a gradient. `offset` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// A radial gradient from a center point (inner radius 0) out to `radius`.
///
/// Stops are kept sorted by offset. Colors between stops interpolate in
/// premultiplied space, matching how browsers render canvas gradients.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    cx: f64,
    cy: f64,
    radius: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Creates a gradient with no stops centered on `(cx, cy)`.
    pub fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self {
            cx,
            cy,
            radius,
            stops: Vec::new(),
        }
    }

    /// Adds a color stop. The offset is clamped to [0, 1]; a stop with the
    /// same offset as an existing one is placed after it.
    pub fn add_color_stop(&mut self, offset: f64, color: Rgba) {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop::new(offset, color));
    }

    /// Builder form of [`RadialGradient::add_color_stop`].
    pub fn with_stop(mut self, offset: f64, color: Rgba) -> Self {
        self.add_color_stop(offset, color);
        self
    }

    pub fn center(&self) -> (f64, f64) {
        (self.cx, self.cy)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at distance `distance` from the center.
    ///
    /// Distances beyond the radius take the last stop's color. A gradient
    /// without stops, or with a non-positive radius, is transparent.
    pub fn color_at(&self, distance: f64) -> Rgba {
        if self.stops.is_empty() || self.radius <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let t = (distance / self.radius).clamp(0.0, 1.0);
        let first = self.stops[0];
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.offset {
                let span = hi.offset - lo.offset;
                if span <= 0.0 {
                    return hi.color;
                }
                let frac = (t - lo.offset) / span;
                let a = lo.color.premultiplied();
                let b = hi.color.premultiplied();
                let mut mixed = [0.0; 4];
                for i in 0..4 {
                    mixed[i] = a[i] + (b[i] - a[i]) * frac;
                }
                return Rgba::from_premultiplied(mixed);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

/// An immediate-mode 2D drawing target.
///
/// Operations mirror the Canvas 2D calls drift needs. Global alpha is state:
/// it applies to every subsequent fill until changed.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> f64;

    /// Surface height in pixels.
    fn height(&self) -> f64;

    /// Resets the given rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Sets the opacity multiplier for subsequent draws, clamped to [0, 1].
    fn set_global_alpha(&mut self, alpha: f64);

    /// Fills a circle of `radius` centered on `(cx, cy)` with `gradient`.
    fn fill_circle(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        gradient: &RadialGradient,
    ) -> Result<(), DriftError>;
}
