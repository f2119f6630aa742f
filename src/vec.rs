//! Three-component vector used for positions, velocities and forces.

use crate::float::Float;
use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// 3D vector. The engine treats `+z` as up; `x` and `y` are horizontal.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    /// Create a new 3D vector.
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    /// Zero vector.
    pub fn zero() -> Self { Vec3 { x: F::zero(), y: F::zero(), z: F::zero() } }

    /// Vector along the up axis with the given magnitude.
    pub fn up(height: F) -> Self { Vec3 { x: F::zero(), y: F::zero(), z: height } }

    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F { self.dot(self) }

    pub fn length(self) -> F { self.length_sq().sqrt() }

    /// Scale all components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }

    pub fn distance(self, other: Self) -> F { (self - other).length() }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<F: Float> Mul<F> for Vec3<F> {
    type Output = Self;
    fn mul(self, s: F) -> Self { self.scale(s) }
}

impl<F: Float> AddAssign for Vec3<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> SubAssign for Vec3<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<F: Float> From<[F; 3]> for Vec3<F> {
    fn from(v: [F; 3]) -> Self { Vec3 { x: v[0], y: v[1], z: v[2] } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_length() {
        let v = Vec3::new(2.0f64, 3.0, 6.0);
        assert!((v.length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn dot_of_orthogonal_is_zero() {
        let i = Vec3::new(1.0f32, 0.0, 0.0);
        let j = Vec3::new(0.0f32, 1.0, 0.0);
        assert_eq!(i.dot(j), 0.0);
        assert_eq!(Vec3::up(2.0f32).length_sq(), 4.0);
    }

    #[test]
    fn assign_ops() {
        let mut v = Vec3::new(1.0f64, 1.0, 1.0);
        v += Vec3::up(2.0);
        v -= Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(v, Vec3::new(0.0, 1.0, 3.0));
        assert_eq!(v * 2.0, Vec3::new(0.0, 2.0, 6.0));
    }

    #[test]
    fn distance_calculation() {
        let a = Vec3::new(0.0f64, 0.0, 0.0);
        let b = Vec3::new(0.0f64, 3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }
}
