//! Point Geometry

use crate::geometry::*;
use crate::pbrt::*;

/// A point in or around the scene. Exactly one of the three cases holds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointGeometry {
    /// A point on a surface with a tangent frame.
    OnSurface {
        /// Position.
        p: Point3f,

        /// Unit normal and tangent basis around it.
        frame: Frame,

        /// Texture coordinates.
        uv: Point2f,
    },

    /// A point without a surface, e.g. a point light or a pinhole. It has no
    /// tangent frame and no area measure.
    Degenerate {
        /// Position.
        p: Point3f,
    },

    /// A point at infinity. The position is undefined and the direction
    /// substitutes for it.
    Infinite {
        /// Direction of propagation away from the point at infinity.
        wo: Vector3f,

        /// A representative position used to spawn rays into the scene.
        p: Point3f,
    },
}

impl PointGeometry {
    /// Returns a point on a surface.
    ///
    /// * `p`  - Position.
    /// * `n`  - Unit normal.
    /// * `uv` - Texture coordinates.
    pub fn on_surface(p: Point3f, n: Vector3f, uv: Point2f) -> Self {
        Self::OnSurface {
            p,
            frame: Frame::from_normal(n),
            uv,
        }
    }

    /// Returns a degenerate point.
    ///
    /// * `p` - Position.
    pub fn degenerate(p: Point3f) -> Self {
        Self::Degenerate { p }
    }

    /// Returns a point at infinity.
    ///
    /// * `wo` - Direction of propagation from the point at infinity.
    /// * `p`  - Representative position.
    pub fn infinite(wo: Vector3f, p: Point3f) -> Self {
        Self::Infinite { wo, p }
    }

    /// Returns true for a point without a surface.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate { .. })
    }

    /// Returns true for a point at infinity.
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite { .. })
    }

    /// Returns the position (representative position for infinite points).
    pub fn p(&self) -> Point3f {
        match self {
            Self::OnSurface { p, .. } | Self::Degenerate { p } | Self::Infinite { p, .. } => *p,
        }
    }

    /// Returns the surface normal, if the point lies on a surface.
    pub fn n(&self) -> Option<Vector3f> {
        match self {
            Self::OnSurface { frame, .. } => Some(frame.n),
            _ => None,
        }
    }

    /// Returns the tangent frame, if the point lies on a surface.
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Self::OnSurface { frame, .. } => Some(frame),
            _ => None,
        }
    }

    /// Returns |cos θ| between the normal and `d`, or 1 when the point has no
    /// surface.
    ///
    /// * `d` - Unit direction.
    pub fn abs_cos(&self, d: &Vector3f) -> Float {
        self.n().map_or(1.0, |n| n.abs_dot(d))
    }
}

/// Returns the unit direction from one point toward another.
///
/// At most one of the points may be at infinity.
///
/// * `from` - Origin point.
/// * `to`   - Target point.
pub fn direction(from: &PointGeometry, to: &PointGeometry) -> Vector3f {
    debug_assert!(!(from.is_infinite() && to.is_infinite()));
    match (from, to) {
        (PointGeometry::Infinite { wo, .. }, _) => *wo,
        (_, PointGeometry::Infinite { wo, .. }) => -*wo,
        _ => (to.p() - from.p()).normalize(),
    }
}

/// Returns the geometry term |cos θ₁||cos θ₂| / r² between two points.
/// Cosines of points without a surface are 1 and the squared distance to a
/// point at infinity is 1.
///
/// * `s1` - First point.
/// * `s2` - Second point.
pub fn geometry_term(s1: &PointGeometry, s2: &PointGeometry) -> Float {
    let d = direction(s1, s2);
    let l2 = if s1.is_infinite() || s2.is_infinite() {
        1.0
    } else {
        s1.p().distance_squared(&s2.p())
    };
    s1.abs_cos(&d) * s2.abs_cos(&-d) / l2
}

/// Converts a density in projected solid angle measure at `from` (or solid
/// angle measure when `from` is degenerate) to area measure at `to`.
///
/// * `pdf`  - The directional density.
/// * `from` - Point the direction was sampled at.
/// * `to`   - Point the direction reached.
pub fn convert_pdf_to_area(pdf: Float, from: &PointGeometry, to: &PointGeometry) -> Float {
    pdf * geometry_term(from, to)
}

/// Converts a density in solid angle measure to projected solid angle
/// measure. Degenerate points keep the solid angle measure.
///
/// * `pdf_sa` - Density in solid angle measure.
/// * `geom`   - Point the direction is sampled at.
/// * `d`      - The direction.
pub fn convert_pdf_sa_to_proj_sa(pdf_sa: Float, geom: &PointGeometry, d: &Vector3f) -> Float {
    if geom.is_degenerate() {
        return pdf_sa;
    }
    let j = geom.abs_cos(d);
    if j == 0.0 {
        0.0
    } else {
        pdf_sa / j
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn floor_point(x: Float, z: Float) -> PointGeometry {
        PointGeometry::on_surface(
            Point3f::new(x, 0.0, z),
            Vector3f::new(0.0, 1.0, 0.0),
            Point2f::default(),
        )
    }

    #[test]
    fn exactly_one_case_holds() {
        let s = floor_point(0.0, 0.0);
        let d = PointGeometry::degenerate(Point3f::new(0.0, 1.0, 0.0));
        let i = PointGeometry::infinite(Vector3f::new(0.0, -1.0, 0.0), Point3f::default());
        assert!(!s.is_degenerate() && !s.is_infinite() && s.n().is_some());
        assert!(d.is_degenerate() && !d.is_infinite() && d.n().is_none());
        assert!(!i.is_degenerate() && i.is_infinite() && i.n().is_none());
    }

    #[test]
    fn geometry_term_facing_surfaces() {
        let a = floor_point(0.0, 0.0);
        let b = PointGeometry::on_surface(
            Point3f::new(0.0, 2.0, 0.0),
            Vector3f::new(0.0, -1.0, 0.0),
            Point2f::default(),
        );
        assert!(approx_eq!(f32, geometry_term(&a, &b), 0.25, epsilon = 1e-6));
    }

    #[test]
    fn geometry_term_degenerate_and_infinite() {
        let a = floor_point(0.0, 0.0);
        let light = PointGeometry::degenerate(Point3f::new(3.0, 4.0, 0.0));
        // cos = 4/5 at the floor, 1 at the degenerate point, r² = 25
        assert!(approx_eq!(f32, geometry_term(&a, &light), 0.8 / 25.0, epsilon = 1e-6));

        let sun = PointGeometry::infinite(Vector3f::new(0.0, -1.0, 0.0), Point3f::default());
        assert!(approx_eq!(f32, geometry_term(&sun, &a), 1.0, epsilon = 1e-6));
        assert_eq!(direction(&sun, &a), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(direction(&a, &sun), Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn grazing_direction_has_zero_projected_density() {
        let a = floor_point(0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 0.0);
        assert_eq!(convert_pdf_sa_to_proj_sa(1.0, &a, &d), 0.0);
        let p = PointGeometry::degenerate(Point3f::default());
        assert_eq!(convert_pdf_sa_to_proj_sa(0.5, &p, &d), 0.5);
    }

    proptest! {
        #[test]
        fn geometry_term_is_symmetric(
            x in -5.0..5.0f32, z in -5.0..5.0f32, h in 0.5..5.0f32
        ) {
            let a = floor_point(x, z);
            let b = PointGeometry::degenerate(Point3f::new(0.0, h, 0.0));
            let g1 = geometry_term(&a, &b);
            let g2 = geometry_term(&b, &a);
            prop_assert!(approx_eq!(f32, g1, g2, epsilon = 1e-6));
            prop_assert!(g1 > 0.0);
        }

        #[test]
        fn area_conversion_matches_solid_angle_jacobian(
            x in -5.0..5.0f32, z in -5.0..5.0f32, h in 0.5..5.0f32
        ) {
            // Solid angle density 1 at a degenerate point becomes cos / r² at
            // the receiving surface.
            let b = PointGeometry::degenerate(Point3f::new(0.0, h, 0.0));
            let a = floor_point(x, z);
            let r2 = x * x + z * z + h * h;
            let expected = (h / r2.sqrt()) / r2;
            let pa = convert_pdf_to_area(1.0, &b, &a);
            prop_assert!(approx_eq!(f32, pa, expected, epsilon = 1e-5));
        }
    }
}
