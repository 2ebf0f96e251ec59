//! Diffuse Material

use core::geometry::*;
use core::interaction::*;
use core::material::*;
use core::pbrt::*;
use core::sampling::*;
use core::spectrum::*;

/// Implements purely diffuse (Lambertian) two sided surfaces.
#[derive(Clone, Debug)]
pub struct DiffuseMaterial {
    /// Spectral diffuse reflection.
    kd: Spectrum,
}

impl DiffuseMaterial {
    /// Create a new `DiffuseMaterial`.
    ///
    /// * `kd` - Spectral diffuse reflection.
    pub fn new(kd: Spectrum) -> Self {
        Self { kd }
    }
}

/// Returns true if two directions lie on opposite sides of the surface.
///
/// * `geom` - Surface point.
/// * `wi`   - First direction.
/// * `wo`   - Second direction.
fn opposite(geom: &PointGeometry, wi: &Vector3f, wo: &Vector3f) -> bool {
    geom.n().map_or(false, |n| n.dot(wi) * n.dot(wo) <= 0.0)
}

impl Material for DiffuseMaterial {
    fn is_specular_component(&self, _comp: usize) -> bool {
        false
    }

    fn sample_direction(
        &self,
        u: &Point2f,
        geom: &PointGeometry,
        wi: &Vector3f,
        _comp: usize,
        _trans_dir: TransDir,
    ) -> Option<DirectionSample> {
        let frame = geom.frame()?;

        // Sample the hemisphere on the side of `wi`.
        let mut d = cosine_sample_hemisphere(u);
        if frame.n.dot(wi) < 0.0 {
            d.z = -d.z;
        }
        Some(DirectionSample::new(frame.to_world(&d), self.kd))
    }

    fn pdf_direction(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        _comp: usize,
        _eval_delta: bool,
    ) -> Float {
        if opposite(geom, wi, wo) {
            0.0
        } else {
            INV_PI
        }
    }

    fn eval(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        _comp: usize,
        _trans_dir: TransDir,
        _eval_delta: bool,
    ) -> Spectrum {
        if opposite(geom, wi, wo) {
            Spectrum::ZERO
        } else {
            self.kd * INV_PI
        }
    }
}
