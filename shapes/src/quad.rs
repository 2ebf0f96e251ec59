//! Quads

use core::geometry::*;
use core::interaction::*;
use core::pbrt::*;
use core::shape::*;

/// Minimum |cos θ| between a ray and the quad plane for an intersection.
const PARALLEL_EPSILON: Float = 1e-8;

/// A parallelogram spanned by two edges from a corner. The normal follows the
/// right hand rule `e1 × e2`.
#[derive(Clone, Debug)]
pub struct Quad {
    /// Corner.
    pub p: Point3f,

    /// First edge.
    pub e1: Vector3f,

    /// Second edge.
    pub e2: Vector3f,

    /// Unit normal.
    n: Vector3f,

    /// `e1 × e2` divided by its squared length; used to recover the
    /// parametric coordinates of a point in the plane.
    w: Vector3f,

    /// Surface area.
    area: Float,
}

impl Quad {
    /// Create a new quad.
    ///
    /// * `p`  - Corner.
    /// * `e1` - First edge.
    /// * `e2` - Second edge.
    pub fn new(p: Point3f, e1: Vector3f, e2: Vector3f) -> Self {
        let cross = e1.cross(&e2);
        let area = cross.length();
        if area == 0.0 {
            warn!("Degenerate quad with zero area at {:?}", p);
        }
        let len2 = cross.length_squared();
        Self {
            p,
            e1,
            e2,
            n: if area > 0.0 { cross / area } else { cross },
            w: if len2 > 0.0 { cross / len2 } else { cross },
            area,
        }
    }

    /// Returns the unit normal.
    pub fn normal(&self) -> Vector3f {
        self.n
    }
}

impl Shape for Quad {
    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<ShapeHit> {
        let denom = self.n.dot(&ray.d);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.p - ray.o).dot(&self.n) / denom;
        if t <= t_min || t >= t_max {
            return None;
        }

        let hit = ray.at(t);
        let q = hit - self.p;
        let u = self.w.dot(&q.cross(&self.e2));
        let v = self.w.dot(&self.e1.cross(&q));
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(ShapeHit {
            t,
            geom: PointGeometry::on_surface(hit, self.n, Point2f::new(u, v)),
        })
    }

    fn area(&self) -> Float {
        self.area
    }

    fn sample_position(&self, u: &Point2f) -> PointGeometry {
        let p = self.p + self.e1 * u.x + self.e2 * u.y;
        PointGeometry::on_surface(p, self.n, *u)
    }

    fn bounds(&self) -> Bounds3f {
        Bounds3f::empty()
            .union_point(&self.p)
            .union_point(&(self.p + self.e1))
            .union_point(&(self.p + self.e2))
            .union_point(&(self.p + self.e1 + self.e2))
    }
}
