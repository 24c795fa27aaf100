use std::f64::consts::TAU;

use glam::DVec2;

use crate::api::error::GeometryError;

/// 2D vector value type. Arithmetic, `dot` and `length` come from glam.
pub type Vector2 = DVec2;

/// Vector operations glam does not provide with the semantics the simulation needs.
pub trait VectorExt: Sized {
    /// `(y, -x)`.
    fn perpendicular(self) -> Self;

    /// Euclidean length, `sqrt(dot(v, v))`.
    fn magnitude(self) -> f64;

    /// Unit vector in the same direction. Fails for the zero vector.
    fn normalized(self) -> Result<Self, GeometryError>;

    /// Projection of `self` onto `onto`: `onto * (dot(self, onto) / dot(onto, onto))`.
    /// Fails when `onto` is the zero vector.
    fn project(self, onto: Self) -> Result<Self, GeometryError>;
}

impl VectorExt for DVec2 {
    fn perpendicular(self) -> Self {
        DVec2::new(self.y, -self.x)
    }

    fn magnitude(self) -> f64 {
        self.dot(self).sqrt()
    }

    fn normalized(self) -> Result<Self, GeometryError> {
        let len = self.magnitude();
        if len > 0.0 {
            Ok(self / len)
        } else {
            Err(GeometryError::ZeroVector)
        }
    }

    fn project(self, onto: Self) -> Result<Self, GeometryError> {
        let denom = onto.dot(onto);
        if denom > 0.0 {
            Ok(onto * (self.dot(onto) / denom))
        } else {
            Err(GeometryError::ZeroVector)
        }
    }
}

/// Wrap an angle in radians into `[0, 2π)`.
pub fn normalize_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
