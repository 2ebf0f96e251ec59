//! 3-D Points

use super::Vector3;
use crate::pbrt::*;
use num_traits::Num;
use std::ops::{Add, Mul, Sub};

/// A 3-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D point containing `Float` values.
pub type Point3f = Point3<Float>;

impl<T: Num> Point3<T> {
    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Returns the squared distance between this and another point.
    ///
    /// * `p` - The other point.
    pub fn distance_squared(&self, p: &Self) -> T
    where
        T: Copy,
    {
        (*self - *p).length_squared()
    }

    /// Returns the distance between this and another point.
    ///
    /// * `p` - The other point.
    pub fn distance(&self, p: &Self) -> T
    where
        T: num_traits::Float,
    {
        (*self - *p).length()
    }
}

impl<T: Num> Add<Vector3<T>> for Point3<T> {
    type Output = Point3<T>;

    /// Offsets the point by the given vector.
    ///
    /// * `v` - The vector to add.
    fn add(self, v: Vector3<T>) -> Self::Output {
        Point3::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl<T: Num> Sub<Vector3<T>> for Point3<T> {
    type Output = Point3<T>;

    /// Offsets the point by the negated vector.
    ///
    /// * `v` - The vector to subtract.
    fn sub(self, v: Vector3<T>) -> Self::Output {
        Point3::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl<T: Num> Sub for Point3<T> {
    type Output = Vector3<T>;

    /// Returns the vector from `other` to this point.
    ///
    /// * `other` - The point to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Num + Copy> Mul<T> for Point3<T> {
    type Output = Self;

    /// Scale the point's coordinates.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::new(f * self.x, f * self.y, f * self.z)
    }
}

impl<T> From<Vector3<T>> for Point3<T> {
    /// Convert a 3-D vector to a 3-D point.
    ///
    /// * `v` - 3-D vector.
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn offset_and_difference(
            x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32,
            dx in -10.0..10.0f32, dy in -10.0..10.0f32, dz in -10.0..10.0f32
        ) {
            let p = Point3f::new(x, y, z);
            let v = Vector3::new(dx, dy, dz);
            let q = p + v;
            prop_assert_eq!(q - v, Point3f::new(q.x - dx, q.y - dy, q.z - dz));
            prop_assert_eq!(p.distance_squared(&p), 0.0);
            prop_assert!((q.distance(&p) - v.length()).abs() < 1e-3);
        }
    }
}
