//! Color types for drift.
//!
//! [`Srgb`] is an opaque color used for backgrounds; it serializes as a
//! `"#rrggbb"` hex string. [`Rgba`] is a straight (non-premultiplied) color
//! with alpha, used for gradient stops and raster pixels. Components are `f64`
//! in [0, 1].

use crate::error::DriftError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `DriftError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, DriftError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(DriftError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| DriftError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(to_byte);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Default for Srgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Straight-alpha RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Fully transparent black, the CSS `transparent` keyword.
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// White at the given alpha.
    pub const fn white(a: f64) -> Self {
        Self::new(1.0, 1.0, 1.0, a)
    }

    /// Formats as a CSS color string accepted by Canvas 2D color stops.
    pub fn to_css(self) -> String {
        if self.a <= 0.0 {
            return "transparent".to_string();
        }
        let [r, g, b] = [self.r, self.g, self.b].map(to_byte);
        format!("rgba({r}, {g}, {b}, {})", self.a.clamp(0.0, 1.0))
    }

    /// Returns the color with each channel multiplied by alpha.
    pub fn premultiplied(self) -> [f64; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }

    /// Inverse of [`Rgba::premultiplied`]. Zero alpha yields [`Rgba::TRANSPARENT`].
    pub fn from_premultiplied([r, g, b, a]: [f64; 4]) -> Self {
        if a <= 0.0 {
            return Self::TRANSPARENT;
        }
        Self::new(r / a, g / a, b / a, a)
    }

    /// Source-over composite of `self` onto `dst`.
    pub fn over(self, dst: Rgba) -> Rgba {
        let src = self.premultiplied();
        let d = dst.premultiplied();
        let k = 1.0 - src[3];
        Rgba::from_premultiplied([
            src[0] + d[0] * k,
            src[1] + d[1] * k,
            src[2] + d[2] * k,
            src[3] + d[3] * k,
        ])
    }
}

impl From<Srgb> for Rgba {
    fn from(c: Srgb) -> Self {
        Rgba::new(c.r, c.g, c.b, 1.0)
    }
}

/// Quantizes a [0, 1] channel to a byte with rounding.
pub fn to_byte(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#ff8000").unwrap();
        let b = Srgb::from_hex("FF8000").unwrap();
        assert_eq!(a, b);
        assert!(approx(a.r, 1.0));
        assert!(approx(a.g, 128.0 / 255.0));
        assert!(approx(a.b, 0.0));
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(matches!(
            Srgb::from_hex("#fff"),
            Err(DriftError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(matches!(
            Srgb::from_hex("#gg0000"),
            Err(DriftError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_multibyte_input() {
        assert!(Srgb::from_hex("é0000").is_err());
    }

    #[test]
    fn hex_round_trip() {
        for hex in ["#000000", "#ffffff", "#020210", "#7f3a9c"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn srgb_serializes_as_hex_string() {
        let c = Srgb::from_hex("#102030").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#102030\"");
        let back: Srgb = serde_json::from_str("\"#102030\"").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn to_css_formats_white_stops_like_canvas_strings() {
        assert_eq!(Rgba::white(0.5).to_css(), "rgba(255, 255, 255, 0.5)");
        assert_eq!(Rgba::white(0.25).to_css(), "rgba(255, 255, 255, 0.25)");
        assert_eq!(Rgba::TRANSPARENT.to_css(), "transparent");
    }

    #[test]
    fn premultiply_round_trip() {
        let c = Rgba::new(0.2, 0.4, 0.6, 0.5);
        let back = Rgba::from_premultiplied(c.premultiplied());
        assert!(approx(back.r, 0.2) && approx(back.g, 0.4) && approx(back.b, 0.6));
        assert!(approx(back.a, 0.5));
    }

    #[test]
    fn over_opaque_source_replaces_destination() {
        let out = Rgba::white(1.0).over(Rgba::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(out, Rgba::white(1.0));
    }

    #[test]
    fn over_transparent_source_keeps_destination() {
        let dst = Rgba::new(0.3, 0.2, 0.1, 0.8);
        let out = Rgba::TRANSPARENT.over(dst);
        assert!(approx(out.r, 0.3) && approx(out.a, 0.8));
    }

    #[test]
    fn over_half_white_on_black_is_mid_gray() {
        let out = Rgba::white(0.5).over(Rgba::new(0.0, 0.0, 0.0, 1.0));
        assert!(approx(out.r, 0.5));
        assert!(approx(out.a, 1.0));
    }
}
