//! Distant Source

use core::geometry::*;
use core::interaction::*;
use core::light::*;
use core::pbrt::*;
use core::sampling::*;
use core::shape::*;
use core::spectrum::*;
use std::sync::{PoisonError, RwLock};

/// Implements a directional light source that deposits illumination from the
/// same direction at every point in space. The light lies at infinity and
/// cannot be connected to directly.
pub struct DistantLight {
    /// Light source type.
    pub light_type: LightType,

    /// The emitted radiance `L`.
    pub emitted_radiance: Spectrum,

    /// Direction the light travels in.
    pub w_light: Vector3f,

    /// Bounding sphere of the scene, calculated in preprocess().
    world_bound: RwLock<SphereBound>,
}

impl DistantLight {
    /// Returns a new `DistantLight`.
    ///
    /// * `emitted_radiance` - The emitted radiance.
    /// * `w_light`          - Direction the light travels in.
    pub fn new(emitted_radiance: Spectrum, w_light: Vector3f) -> Self {
        Self {
            light_type: LightType::DELTA_DIRECTION_LIGHT | LightType::INFINITE_LIGHT,
            emitted_radiance,
            w_light: w_light.normalize(),
            world_bound: RwLock::new(SphereBound {
                center: Point3f::new(0.0, 0.0, 0.0),
                radius: 1.0,
            }),
        }
    }

    /// Returns the scene bounding sphere.
    fn world_bound(&self) -> SphereBound {
        *self
            .world_bound
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the density of ray origins on the disk facing the light.
    fn pdf_disk(&self) -> Float {
        let r = self.world_bound().radius;
        1.0 / (PI * r * r)
    }
}

impl Light for DistantLight {
    /// Initialize the light source before rendering begins.
    ///
    /// * `bound` - Bounding sphere of the scene.
    fn preprocess(&self, bound: &SphereBound) {
        *self
            .world_bound
            .write()
            .unwrap_or_else(PoisonError::into_inner) = *bound;
    }

    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Samples a ray origin on a disk outside the scene facing the light.
    ///
    /// * `u_pos` - Sample value for the position on the disk.
    /// * `u_dir` - Unused.
    fn sample_ray(&self, u_pos: &Point2f, _u_dir: &Point2f) -> Option<RaySample> {
        let bound = self.world_bound();
        let frame = Frame::from_normal(self.w_light);
        let cd = concentric_sample_disk(u_pos);
        let p_disk = bound.center - self.w_light * bound.radius
            + (frame.u * cd.x + frame.v * cd.y) * bound.radius;

        let geom = PointGeometry::infinite(self.w_light, p_disk);
        Some(RaySample::new(
            geom,
            self.w_light,
            self.emitted_radiance / self.pdf_disk(),
        ))
    }

    fn pdf_ray(&self, _geom: &PointGeometry, _wo: &Vector3f, eval_delta: bool) -> Float {
        if eval_delta {
            1.0
        } else {
            self.pdf_disk()
        }
    }

    fn pdf_position(&self, _geom: &PointGeometry) -> Float {
        self.pdf_disk()
    }

    fn pdf_direction(&self, _geom: &PointGeometry, _wo: &Vector3f) -> Float {
        0.0
    }

    fn eval(&self, _geom: &PointGeometry, _wo: &Vector3f, eval_delta: bool) -> Spectrum {
        if eval_delta {
            Spectrum::ZERO
        } else {
            self.emitted_radiance
        }
    }
}
