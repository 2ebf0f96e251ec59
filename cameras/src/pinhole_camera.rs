//! Pinhole Camera

use core::camera::*;
use core::geometry::*;
use core::interaction::*;
use core::light::RaySample;
use core::pbrt::*;
use core::spectrum::*;

/// Pinhole camera. The camera is a single point, so it can be connected to
/// but never hit by a ray.
#[derive(Clone, Debug)]
pub struct PinholeCamera {
    /// Camera position.
    pub position: Point3f,

    /// Camera right direction.
    u: Vector3f,

    /// Camera up direction.
    v: Vector3f,

    /// Camera backward direction.
    w: Vector3f,

    /// Half of the image plane height at unit distance.
    tf: Float,

    /// Aspect ratio (width / height).
    aspect: Float,

    /// Area covered by the image plane at unit distance.
    a: Float,
}

impl PinholeCamera {
    /// Create a new pinhole camera.
    ///
    /// * `position` - Camera position.
    /// * `center`   - Look-at position.
    /// * `up`       - Up vector.
    /// * `vfov`     - Vertical field of view in degrees.
    /// * `aspect`   - Aspect ratio (width / height).
    pub fn new(position: Point3f, center: Point3f, up: Vector3f, vfov: Float, aspect: Float) -> Self {
        let tf = (vfov.to_radians() * 0.5).tan();
        let w = (position - center).normalize();
        let u = up.cross(&w).normalize();
        let v = w.cross(&u);
        let a = 4.0 * tf * tf * aspect;
        debug!("Pinhole camera at {:?} with image plane area {}", position, a);
        Self {
            position,
            u,
            v,
            w,
            tf,
            aspect,
            a,
        }
    }

    /// Returns cos θ between `wo` and the viewing direction.
    ///
    /// * `wo` - Direction leaving the camera.
    fn cos_theta(&self, wo: &Vector3f) -> Float {
        -wo.dot(&self.w)
    }
}

impl Camera for PinholeCamera {
    fn sample_ray(&self, u: &Point2f) -> Option<RaySample> {
        let x = 2.0 * u.x - 1.0;
        let y = 2.0 * u.y - 1.0;
        let d = (self.u * (x * self.tf * self.aspect) + self.v * (y * self.tf) - self.w).normalize();
        Some(RaySample::new(
            PointGeometry::degenerate(self.position),
            d,
            Spectrum::ONE,
        ))
    }

    fn pdf_position(&self, _geom: &PointGeometry) -> Float {
        1.0
    }

    fn pdf_direction(&self, _geom: &PointGeometry, wo: &Vector3f) -> Float {
        if self.raster_position(wo).is_none() {
            return 0.0;
        }
        let cos_theta = self.cos_theta(wo);
        1.0 / (self.a * cos_theta * cos_theta * cos_theta)
    }

    fn eval(&self, geom: &PointGeometry, wo: &Vector3f, _eval_delta: bool) -> Spectrum {
        Spectrum::new(self.pdf_direction(geom, wo))
    }

    fn raster_position(&self, wo: &Vector3f) -> Option<Point2f> {
        let z = self.cos_theta(wo);
        if z <= 0.0 {
            return None;
        }
        let x = wo.dot(&self.u) / z;
        let y = wo.dot(&self.v) / z;
        let rp = Point2f::new(
            (x / (self.tf * self.aspect) + 1.0) * 0.5,
            (y / self.tf + 1.0) * 0.5,
        );
        rp.in_unit_square().then_some(rp)
    }

    fn aspect(&self) -> Float {
        self.aspect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use core::rng::RNG;

    fn camera() -> PinholeCamera {
        PinholeCamera::new(
            Point3f::new(0.0, 1.0, 5.0),
            Point3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            30.0,
            1.5,
        )
    }

    #[test]
    fn center_ray_looks_at_center() {
        let s = camera().sample_ray(&Point2f::new(0.5, 0.5)).unwrap();
        assert!(s.geom.is_degenerate());
        assert!(approx_eq!(Float, s.wo.z, -1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, s.weight[0], 1.0, epsilon = 1e-6));
    }

    #[test]
    fn directions_outside_the_frustum() {
        let c = camera();
        assert!(c.raster_position(&Vector3f::new(0.0, 0.0, 1.0)).is_none());
        assert!(c.raster_position(&Vector3f::new(1.0, 0.0, -0.1).normalize()).is_none());
        let geom = PointGeometry::degenerate(c.position);
        assert_eq!(c.pdf_direction(&geom, &Vector3f::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn center_importance_is_inverse_area() {
        let c = camera();
        let geom = PointGeometry::degenerate(c.position);
        let tf = (15.0 as Float).to_radians().tan();
        let we = c.eval(&geom, &Vector3f::new(0.0, 0.0, -1.0), false);
        assert!(approx_eq!(Float, we[0], 1.0 / (4.0 * tf * tf * 1.5), epsilon = 1e-4));
        assert!(c.is_connectable(&geom));
        assert!(!c.is_specular());
    }

    #[test]
    fn raster_position_inverts_sample_ray() {
        let c = camera();
        let mut rng = RNG::new(3);
        for _ in 0..256 {
            let u = rng.uniform_point2();
            let (x, y) = (0.001 + 0.998 * u.x, 0.001 + 0.998 * u.y);
            let s = c.sample_ray(&Point2f::new(x, y)).unwrap();
            let rp = c.raster_position(&s.wo).unwrap();
            assert!(approx_eq!(Float, rp.x, x, epsilon = 1e-4));
            assert!(approx_eq!(Float, rp.y, y, epsilon = 1e-4));
        }
    }
}
