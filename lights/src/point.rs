//! Point Light Source

use core::geometry::*;
use core::interaction::*;
use core::light::*;
use core::pbrt::*;
use core::sampling::*;
use core::spectrum::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone)]
pub struct PointLight {
    /// Light source type.
    pub light_type: LightType,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`   - Position.
    /// * `intensity` - Intensity.
    pub fn new(p_light: Point3f, intensity: Spectrum) -> Self {
        Self {
            light_type: LightType::DELTA_POSITION_LIGHT,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    fn sample_ray(&self, _u_pos: &Point2f, u_dir: &Point2f) -> Option<RaySample> {
        let wo = uniform_sample_sphere(u_dir);
        Some(RaySample::new(
            PointGeometry::degenerate(self.p_light),
            wo,
            self.intensity / uniform_sphere_pdf(),
        ))
    }

    fn pdf_ray(&self, geom: &PointGeometry, wo: &Vector3f, _eval_delta: bool) -> Float {
        self.pdf_position(geom) * self.pdf_direction(geom, wo)
    }

    fn pdf_position(&self, _geom: &PointGeometry) -> Float {
        1.0
    }

    fn pdf_direction(&self, _geom: &PointGeometry, _wo: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }

    fn eval(&self, _geom: &PointGeometry, _wo: &Vector3f, _eval_delta: bool) -> Spectrum {
        self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn degenerate_and_connectable() {
        let light = PointLight::new(Point3f::new(0.0, 1.0, 0.0), Spectrum::ONE);
        let s = light
            .sample_ray(&Point2f::new(0.1, 0.2), &Point2f::new(0.7, 0.3))
            .unwrap();
        assert!(s.geom.is_degenerate());
        assert!(light.is_connectable(&s.geom));
        assert!(!light.is_specular());
        assert!(approx_eq!(Float, s.weight[0], FOUR_PI, epsilon = 1e-4));
        assert!(approx_eq!(Float, light.pdf_ray(&s.geom, &s.wo, false), INV_FOUR_PI, epsilon = 1e-6));
    }
}
