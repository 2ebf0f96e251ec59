//! Shape

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use std::sync::Arc;

/// A ray-shape intersection.
#[derive(Copy, Clone, Debug)]
pub struct ShapeHit {
    /// Ray parameter of the hit.
    pub t: Float,

    /// Geometry at the hit point.
    pub geom: PointGeometry,
}

/// Axis aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum corner.
    pub p_min: Point3f,

    /// Maximum corner.
    pub p_max: Point3f,
}

impl Bounds3f {
    /// Returns the empty box.
    pub fn empty() -> Self {
        Self {
            p_min: Point3f::new(INFINITY, INFINITY, INFINITY),
            p_max: Point3f::new(-INFINITY, -INFINITY, -INFINITY),
        }
    }

    /// Returns the box enclosing this box and a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: Point3f::new(min(self.p_min.x, p.x), min(self.p_min.y, p.y), min(self.p_min.z, p.z)),
            p_max: Point3f::new(max(self.p_max.x, p.x), max(self.p_max.y, p.y), max(self.p_max.z, p.z)),
        }
    }

    /// Returns the box enclosing both boxes.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &Self) -> Self {
        self.union_point(&other.p_min).union_point(&other.p_max)
    }

    /// Returns a sphere conservatively enclosing the box.
    pub fn bounding_sphere(&self) -> SphereBound {
        let center = Point3f::new(
            0.5 * (self.p_min.x + self.p_max.x),
            0.5 * (self.p_min.y + self.p_max.y),
            0.5 * (self.p_min.z + self.p_max.z),
        );
        let radius = if self.p_min.x <= self.p_max.x {
            center.distance(&self.p_max) * 1.01
        } else {
            0.0
        };
        SphereBound { center, radius }
    }
}

/// Bounding sphere of the scene.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SphereBound {
    /// Center.
    pub center: Point3f,

    /// Radius.
    pub radius: Float,
}

/// Geometry that rays can hit and that area lights can sample.
pub trait Shape {
    /// Returns the nearest hit in (t_min, t_max).
    ///
    /// * `ray`   - The ray.
    /// * `t_min` - Minimum ray parameter.
    /// * `t_max` - Maximum ray parameter.
    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<ShapeHit>;

    /// Returns the surface area.
    fn area(&self) -> Float;

    /// Samples a point uniformly with respect to area.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    fn sample_position(&self, u: &Point2f) -> PointGeometry;

    /// Returns the world space bounds.
    fn bounds(&self) -> Bounds3f;
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;
