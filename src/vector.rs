//! 2D vector helpers on top of `glam::Vec2`.
//!
//! `Vec2` already covers add/sub/scale/divide, `length` and `distance`.
//! This module adds the heading math the AI needs and a NaN-free
//! normalization.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Normalize a vector; the zero vector stays zero instead of becoming NaN.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Heading of a vector in radians (atan2, +x is 0, +y is PI/2).
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.to_angle()
}

/// Unit vector pointing along `angle`.
#[inline]
pub fn from_heading(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Wrap an angle into (-PI, PI].
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Absolute angular difference between two headings, in [0, PI].
#[inline]
pub fn angle_between(a: f32, b: f32) -> f32 {
    normalize_angle(b - a).abs()
}

/// Clamp a vector's length to `max`.
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    v.clamp_length_max(max.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_zero_is_zero() {
        let n = normalize(Vec2::ZERO);
        assert_eq!(n, Vec2::ZERO);
        assert!(!n.x.is_nan() && !n.y.is_nan());
    }

    #[test]
    fn test_normalize_unit_length() {
        assert_relative_eq!(normalize(Vec2::new(3.0, 4.0)).length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_heading_axes() {
        assert_relative_eq!(heading(Vec2::X), 0.0);
        assert_relative_eq!(heading(Vec2::Y), PI / 2.0);
        assert_relative_eq!(heading(Vec2::NEG_X), PI);
    }

    #[test]
    fn test_normalize_angle_wraps() {
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-5);
        assert_relative_eq!(normalize_angle(-PI / 2.0 - TAU), -PI / 2.0, epsilon = 1e-5);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_angle_between_takes_short_way() {
        // 170 degrees and -170 degrees are 20 degrees apart
        let a = 170f32.to_radians();
        let b = (-170f32).to_radians();
        assert_relative_eq!(angle_between(a, b), 20f32.to_radians(), epsilon = 1e-5);
    }

    #[test]
    fn test_from_heading_round_trip() {
        let v = from_heading(1.0);
        assert_relative_eq!(heading(v), 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
    }
}
