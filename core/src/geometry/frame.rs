//! Orthonormal Frame

use super::*;
use crate::pbrt::*;

/// An orthonormal basis whose third axis is a given unit vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// First tangent.
    pub u: Vector3f,

    /// Second tangent.
    pub v: Vector3f,

    /// The axis the frame was built around.
    pub n: Vector3f,
}

impl Frame {
    /// Builds a frame around a unit vector.
    ///
    /// * `n` - The unit vector.
    pub fn from_normal(n: Vector3f) -> Self {
        let u = if abs(n.x) > abs(n.y) {
            Vector3f::new(-n.z, 0.0, n.x) / (n.x * n.x + n.z * n.z).sqrt()
        } else {
            Vector3f::new(0.0, n.z, -n.y) / (n.y * n.y + n.z * n.z).sqrt()
        };
        let v = n.cross(&u);
        Self { u, v, n }
    }

    /// Transforms a direction given in frame coordinates to world space.
    ///
    /// * `d` - Local direction.
    pub fn to_world(&self, d: &Vector3f) -> Vector3f {
        self.u * d.x + self.v * d.y + self.n * d.z
    }

    /// Transforms a world space direction into frame coordinates.
    ///
    /// * `d` - World direction.
    pub fn to_local(&self, d: &Vector3f) -> Vector3f {
        Vector3f::new(d.dot(&self.u), d.dot(&self.v), d.dot(&self.n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    prop_unit_vector3!(unit_vector3);

    proptest! {
        #[test]
        fn frame_is_orthonormal(n in unit_vector3()) {
            let f = Frame::from_normal(n);
            prop_assert!(approx_eq!(f32, f.u.length(), 1.0, epsilon = 0.0001));
            prop_assert!(approx_eq!(f32, f.v.length(), 1.0, epsilon = 0.0001));
            prop_assert!(f.u.dot(&f.v).abs() < 1e-4);
            prop_assert!(f.u.dot(&f.n).abs() < 1e-4);
            prop_assert!(f.v.dot(&f.n).abs() < 1e-4);
        }

        #[test]
        fn local_world_round_trip(n in unit_vector3(), d in unit_vector3()) {
            let f = Frame::from_normal(n);
            let w = f.to_world(&f.to_local(&d));
            prop_assert!((w - d).length() < 1e-4);
        }
    }
}
