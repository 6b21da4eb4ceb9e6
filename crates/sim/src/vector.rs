//! 2D vector value type and directional jitter sampling.
//!
//! `Vector` is `Copy`: arithmetic always yields a new value, so an emitter's
//! anchor can never be moved by a particle that started from it.

use std::ops::{Add, AddAssign};

use drift_core::prng::UniformSource;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A 2D vector in surface pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum. Neither operand changes.
    #[must_use]
    pub fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    /// A detached copy with identical components.
    #[must_use]
    pub fn copy(&self) -> Vector {
        *self
    }

    pub fn dot(self, other: Vector) -> f64 {
        DVec2::from(self).dot(other.into())
    }

    pub fn length(self) -> f64 {
        DVec2::from(self).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lateral jitter for a particle drifting along `gravity`.
    ///
    /// Draws one uniform sample `u` and computes
    /// `r = round(u * scatter - scatter / 2)`, then returns `gravity` rotated
    /// by +90° and scaled by `r`, i.e. `(-gravity.y * r, gravity.x * r)`. The
    /// result is always perpendicular to `gravity`, whichever way it points.
    pub fn get_random<R: UniformSource + ?Sized>(gravity: Vector, scatter: f64, rng: &mut R) -> Vector {
        let r = round_half_up(rng.next_f64() * scatter - scatter / 2.0);
        (DVec2::from(gravity).perp() * r).into()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        *self = *self + rhs;
    }
}

impl From<DVec2> for Vector {
    fn from(v: DVec2) -> Self {
        Vector::new(v.x, v.y)
    }
}

impl From<Vector> for DVec2 {
    fn from(v: Vector) -> Self {
        DVec2::new(v.x, v.y)
    }
}

/// Rounds to the nearest integer with halves going toward +∞
/// (`-0.5 -> 0`, `0.5 -> 1`, `1.5 -> 2`).
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::prng::{SequenceSource, Xorshift64};

    #[test]
    fn add_returns_sum_and_leaves_operands() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(10.0, -4.0);
        let c = a.add(b);
        assert_eq!(c, Vector::new(11.0, -2.0));
        assert_eq!(a, Vector::new(1.0, 2.0));
        assert_eq!(b, Vector::new(10.0, -4.0));
    }

    #[test]
    fn add_operator_and_add_assign_agree() {
        let mut acc = Vector::new(250.0, 450.0);
        acc += Vector::new(0.0, -5.0);
        assert_eq!(acc, Vector::new(250.0, 450.0) + Vector::new(0.0, -5.0));
    }

    #[test]
    fn copy_equals_original_and_does_not_alias() {
        let original = Vector::new(3.0, 4.0);
        let mut copied = original.copy();
        assert_eq!(copied, original);
        copied += Vector::new(1.0, 1.0);
        assert_eq!(original, Vector::new(3.0, 4.0));
        assert_eq!(copied, Vector::new(4.0, 5.0));
    }

    #[test]
    fn round_half_up_matches_js_math_round() {
        assert_eq!(round_half_up(-0.75), -1.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-0.25), 0.0);
        assert_eq!(round_half_up(0.49), 0.0);
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(1.5), 2.0);
        assert_eq!(round_half_up(-1.5), -1.0);
    }

    #[test]
    fn get_random_rotates_gravity_by_quarter_turn() {
        // scatter 4, u = 1.0 - tiny -> r = round(~2) = 2
        let mut rng = SequenceSource::new(vec![0.999_999]);
        let v = Vector::get_random(Vector::new(0.0, -5.0), 4.0, &mut rng);
        assert_eq!(v, Vector::new(10.0, 0.0));
    }

    #[test]
    fn get_random_for_each_cardinal_gravity() {
        // u = 0 with scatter 2 -> r = round(-1) = -1
        for (gravity, expected) in [
            (Vector::new(0.0, -5.0), Vector::new(-5.0, 0.0)),
            (Vector::new(0.0, 5.0), Vector::new(5.0, 0.0)),
            (Vector::new(5.0, 0.0), Vector::new(0.0, -5.0)),
            (Vector::new(-5.0, 0.0), Vector::new(0.0, 5.0)),
        ] {
            let mut rng = SequenceSource::new(vec![0.0]);
            let v = Vector::get_random(gravity, 2.0, &mut rng);
            assert_eq!(v.x + 0.0, expected.x, "gravity {gravity:?}");
            assert_eq!(v.y + 0.0, expected.y, "gravity {gravity:?}");
        }
    }

    #[test]
    fn default_scatter_yields_only_minus_one_zero_or_one() {
        // scatter 1.5: u*1.5 - 0.75 in [-0.75, 0.75) rounds to -1, 0 or 1.
        let mut rng = Xorshift64::new(7);
        let gravity = Vector::new(0.0, -5.0);
        for _ in 0..1000 {
            let v = Vector::get_random(gravity, 1.5, &mut rng);
            assert!([-5.0, 0.0, 5.0].contains(&(v.x + 0.0)), "x = {}", v.x);
            assert_eq!(v.y + 0.0, 0.0);
        }
    }

    #[test]
    fn zero_scatter_yields_no_jitter() {
        let mut rng = Xorshift64::new(1);
        for _ in 0..100 {
            let v = Vector::get_random(Vector::new(5.0, 0.0), 0.0, &mut rng);
            assert_eq!(v.length(), 0.0);
        }
    }

    #[test]
    fn glam_conversion_round_trip() {
        let v = Vector::new(1.5, -2.5);
        let d: DVec2 = v.into();
        assert_eq!(Vector::from(d), v);
    }

    #[test]
    fn serde_uses_x_y_fields() {
        let v: Vector = serde_json::from_str(r#"{"x": 250, "y": 450}"#).unwrap();
        assert_eq!(v, Vector::new(250.0, 450.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn jitter_is_orthogonal_to_gravity(
                gx in -50.0_f64..50.0,
                gy in -50.0_f64..50.0,
                scatter in 0.0_f64..20.0,
                seed: u64,
            ) {
                let gravity = Vector::new(gx, gy);
                prop_assume!(gravity.length() > 1e-6);
                let mut rng = Xorshift64::new(seed);
                let jitter = Vector::get_random(gravity, scatter, &mut rng);
                let cos = jitter.dot(gravity) / (gravity.length() * jitter.length().max(1e-12));
                prop_assert!(cos.abs() < 1e-9, "dot/|g||j| = {cos}");
            }

            #[test]
            fn jitter_magnitude_is_integer_multiple_of_gravity(
                scatter in 0.0_f64..20.0,
                seed: u64,
            ) {
                let gravity = Vector::new(3.0, 4.0);
                let mut rng = Xorshift64::new(seed);
                let jitter = Vector::get_random(gravity, scatter, &mut rng);
                let k = jitter.length() / gravity.length();
                prop_assert!((k - k.round()).abs() < 1e-9);
                prop_assert!(k <= (scatter / 2.0).ceil() + 1.0);
            }
        }
    }
}
