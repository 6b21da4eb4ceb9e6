//! Software implementation of [`Surface`].
//!
//! A [`Raster`] is a `width * height` buffer of straight-alpha [`Rgba`] pixels
//! in row-major order, starting fully transparent. Fills sample each pixel at
//! its center and composite source-over.

use crate::color::Rgba;
use crate::error::DriftError;
use crate::surface::{RadialGradient, Surface};

/// Row-major RGBA pixel buffer that can be drawn into like a canvas.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    global_alpha: f64,
    pixels: Vec<Rgba>,
}

impl Raster {
    /// Creates a transparent raster.
    ///
    /// Returns `DriftError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, DriftError> {
        if width == 0 || height == 0 {
            return Err(DriftError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(DriftError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            global_alpha: 1.0,
            pixels: vec![Rgba::TRANSPARENT; len],
        })
    }

    pub fn pixel_width(&self) -> usize {
        self.width
    }

    pub fn pixel_height(&self) -> usize {
        self.height
    }

    /// Read-only access to the row-major pixels.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Current global alpha.
    pub fn global_alpha(&self) -> f64 {
        self.global_alpha
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a > 0.0).count()
    }

    /// Clamps a span `[start, start + len)` in float pixel space to column or
    /// row indices whose centers fall inside it.
    fn span(start: f64, len: f64, limit: usize) -> std::ops::Range<usize> {
        let lo = (start - 0.5).ceil().max(0.0);
        let hi = (start + len - 0.5).ceil().clamp(0.0, limit as f64);
        if lo >= hi {
            return 0..0;
        }
        lo as usize..hi as usize
    }
}

impl Surface for Raster {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn height(&self) -> f64 {
        self.height as f64
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let cols = Self::span(x, width, self.width);
        for row in Self::span(y, height, self.height) {
            let base = row * self.width;
            self.pixels[base + cols.start..base + cols.end].fill(Rgba::TRANSPARENT);
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        // Canvas ignores non-finite values rather than clamping them.
        if alpha.is_finite() {
            self.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn fill_circle(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        gradient: &RadialGradient,
    ) -> Result<(), DriftError> {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) {
            return Err(DriftError::Surface(format!(
                "non-finite circle ({cx}, {cy}) r={radius}"
            )));
        }
        if radius <= 0.0 || self.global_alpha <= 0.0 {
            return Ok(());
        }
        let (gx, gy) = gradient.center();
        let cols = Self::span(cx - radius, 2.0 * radius, self.width);
        let rows = Self::span(cy - radius, 2.0 * radius, self.height);
        let r2 = radius * radius;
        for py in rows {
            let y = py as f64 + 0.5;
            for px in cols.clone() {
                let x = px as f64 + 0.5;
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let mut src = gradient.color_at((x - gx).hypot(y - gy));
                src.a *= self.global_alpha;
                if src.a <= 0.0 {
                    continue;
                }
                let idx = py * self.width + px;
                self.pixels[idx] = src.over(self.pixels[idx]);
            }
        }
        Ok(())
    }
}
