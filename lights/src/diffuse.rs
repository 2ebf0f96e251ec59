//! Diffuse Area Light Source

use core::geometry::*;
use core::interaction::*;
use core::light::*;
use core::pbrt::*;
use core::sampling::*;
use core::shape::*;
use core::spectrum::*;
use std::sync::Arc;

/// Implements a basic area light source with uniform spatial and directional
/// radiance distribution. Light is emitted from the front face only.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Shape describing surface of the light source.
    pub shape: ArcShape,

    /// Surface area of the shape.
    pub area: Float,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `l_emit` - Emitted radiance.
    /// * `shape`  - Shape describing surface of the light source.
    pub fn new(l_emit: Spectrum, shape: ArcShape) -> Self {
        let area = shape.area();
        if area <= 0.0 {
            warn!("Area light on a shape with zero area emits nothing");
        }
        Self {
            light_type: LightType::AREA_LIGHT,
            l_emit,
            shape: Arc::clone(&shape),
            area,
        }
    }

    /// Returns true if `wo` leaves the front face at `geom`.
    ///
    /// * `geom` - Point on the light.
    /// * `wo`   - Outgoing direction.
    fn is_front(&self, geom: &PointGeometry, wo: &Vector3f) -> bool {
        geom.n().map_or(false, |n| n.dot(wo) > 0.0)
    }
}

impl Light for DiffuseAreaLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Samples a point uniformly on the shape and a cosine weighted
    /// direction around the front normal.
    ///
    /// * `u_pos` - Sample value for the position.
    /// * `u_dir` - Sample value for the direction.
    fn sample_ray(&self, u_pos: &Point2f, u_dir: &Point2f) -> Option<RaySample> {
        if self.area <= 0.0 {
            return None;
        }
        let geom = self.shape.sample_position(u_pos);
        let frame = geom.frame()?;
        let wo = frame.to_world(&cosine_sample_hemisphere(u_dir));

        // Le cosθ / (p_A p_σ) with p_σ = cosθ / π.
        let weight = self.l_emit * (PI * self.area);
        Some(RaySample::new(geom, wo, weight))
    }

    fn pdf_ray(&self, geom: &PointGeometry, wo: &Vector3f, _eval_delta: bool) -> Float {
        self.pdf_position(geom) * self.pdf_direction(geom, wo)
    }

    fn pdf_position(&self, _geom: &PointGeometry) -> Float {
        if self.area > 0.0 {
            1.0 / self.area
        } else {
            0.0
        }
    }

    fn pdf_direction(&self, geom: &PointGeometry, wo: &Vector3f) -> Float {
        if self.is_front(geom, wo) {
            INV_PI
        } else {
            0.0
        }
    }

    fn eval(&self, geom: &PointGeometry, wo: &Vector3f, _eval_delta: bool) -> Spectrum {
        if self.is_front(geom, wo) {
            self.l_emit
        } else {
            Spectrum::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use shapes::Quad;

    fn ceiling_light() -> DiffuseAreaLight {
        // Faces down.
        let quad = Quad::new(
            Point3f::new(-0.5, 1.0, -0.5),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
        );
        DiffuseAreaLight::new(Spectrum::new(2.0), Arc::new(quad))
    }

    #[test]
    fn emits_from_front_face_only() {
        let light = ceiling_light();
        let s = light
            .sample_ray(&Point2f::new(0.3, 0.6), &Point2f::new(0.2, 0.9))
            .unwrap();
        assert!(s.wo.y < 0.0);
        assert!(!light.eval(&s.geom, &s.wo, false).is_black());
        assert!(light.eval(&s.geom, &-s.wo, false).is_black());
        assert_eq!(light.pdf_direction(&s.geom, &-s.wo), 0.0);
    }

    #[test]
    fn weight_is_emission_over_density() {
        let light = ceiling_light();
        let s = light
            .sample_ray(&Point2f::new(0.5, 0.5), &Point2f::new(0.4, 0.1))
            .unwrap();
        let le = light.eval(&s.geom, &s.wo, false);
        let p = light.pdf_ray(&s.geom, &s.wo, false);
        assert!(approx_eq!(Float, (le / p)[0], s.weight[0], epsilon = 1e-4));
        assert!(approx_eq!(Float, light.pdf_position(&s.geom), 1.0, epsilon = 1e-6));
        assert!(light.is_connectable(&s.geom));
        assert!(!light.is_specular());
        assert!(!light.is_infinite());
    }
}
