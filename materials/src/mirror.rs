//! Mirror Material

use core::geometry::*;
use core::interaction::*;
use core::material::*;
use core::pbrt::*;
use core::spectrum::*;

/// Minimum cosine between a direction and the exact reflection direction for
/// the direction to count as reflected.
const REFLECTION_COS_EPSILON: Float = 1.0 - 1e-4;

/// Implements a simple mirror, modeled with perfect specular reflection.
#[derive(Clone, Debug)]
pub struct MirrorMaterial {
    /// Reflectivity of the mirror.
    kr: Spectrum,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr` - Reflectivity of the mirror.
    pub fn new(kr: Spectrum) -> Self {
        Self { kr }
    }

    /// Returns true if `wo` is the mirror direction of `wi`.
    fn is_reflection(&self, geom: &PointGeometry, wi: &Vector3f, wo: &Vector3f) -> bool {
        geom.n()
            .map_or(false, |n| reflect(wi, &n).dot(wo) >= REFLECTION_COS_EPSILON)
    }
}

/// Reflects a direction about a normal.
///
/// * `wi` - Direction pointing away from the surface.
/// * `n`  - Surface normal.
pub fn reflect(wi: &Vector3f, n: &Vector3f) -> Vector3f {
    *n * (2.0 * wi.dot(n)) - *wi
}

impl Material for MirrorMaterial {
    fn is_specular_component(&self, _comp: usize) -> bool {
        true
    }

    fn sample_direction(
        &self,
        _u: &Point2f,
        geom: &PointGeometry,
        wi: &Vector3f,
        _comp: usize,
        _trans_dir: TransDir,
    ) -> Option<DirectionSample> {
        let n = geom.n()?;
        Some(DirectionSample::new(reflect(wi, &n), self.kr))
    }

    fn pdf_direction(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        _comp: usize,
        eval_delta: bool,
    ) -> Float {
        if eval_delta || !self.is_reflection(geom, wi, wo) {
            0.0
        } else {
            1.0
        }
    }

    fn eval(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        _comp: usize,
        _trans_dir: TransDir,
        eval_delta: bool,
    ) -> Spectrum {
        if eval_delta || !self.is_reflection(geom, wi, wo) {
            Spectrum::ZERO
        } else {
            self.kr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn floor() -> PointGeometry {
        PointGeometry::on_surface(
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Point2f::new(0.5, 0.5),
        )
    }

    #[test]
    fn samples_the_reflection() {
        let m = MirrorMaterial::new(Spectrum::new(0.9));
        let wi = Vector3f::new(1.0, 1.0, 0.0).normalize();
        let s = m
            .sample_direction(&Point2f::new(0.3, 0.3), &floor(), &wi, 0, TransDir::EL)
            .unwrap();
        assert!(approx_eq!(Float, s.wo.x, -wi.x, epsilon = 1e-6));
        assert!(approx_eq!(Float, s.wo.y, wi.y, epsilon = 1e-6));
        assert!(approx_eq!(Float, s.weight[0], 0.9, epsilon = 1e-6));
    }

    #[test]
    fn delta_evaluation_is_zero() {
        let m = MirrorMaterial::new(Spectrum::ONE);
        let wi = Vector3f::new(1.0, 1.0, 0.0).normalize();
        let wo = reflect(&wi, &Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(m.pdf_direction(&floor(), &wi, &wo, 0, false), 1.0);
        assert_eq!(m.pdf_direction(&floor(), &wi, &wo, 0, true), 0.0);
        assert!(m.eval(&floor(), &wi, &wo, 0, TransDir::LE, true).is_black());
        assert!(!m.eval(&floor(), &wi, &wo, 0, TransDir::LE, false).is_black());

        let other = Vector3f::new(0.0, 1.0, 0.0);
        assert!(m.eval(&floor(), &wi, &other, 0, TransDir::LE, false).is_black());
    }
}
