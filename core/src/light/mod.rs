//! Light

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::shape::*;
use crate::spectrum::*;
use std::sync::Arc;

mod light_type;

// Re-export
pub use light_type::*;

/// A sampled endpoint: position, outgoing direction and throughput weight.
#[derive(Copy, Clone, Debug)]
pub struct RaySample {
    /// Sampled point.
    pub geom: PointGeometry,

    /// Sampled outgoing direction.
    pub wo: Vector3f,

    /// Emission (or importance) times cosine divided by the joint density of
    /// position and direction.
    pub weight: Spectrum,
}

impl RaySample {
    /// Returns a new `RaySample`.
    ///
    /// * `geom`   - Sampled point.
    /// * `wo`     - Sampled outgoing direction.
    /// * `weight` - Throughput weight.
    pub fn new(geom: PointGeometry, wo: Vector3f, weight: Spectrum) -> Self {
        Self { geom, wo, weight }
    }
}

/// Light trait provides common behavior. Directional densities are in
/// projected solid angle measure, or solid angle measure at degenerate
/// points.
pub trait Light {
    /// Initialize the light source before rendering begins.
    ///
    /// * `bound` - Bounding sphere of the scene.
    fn preprocess(&self, _bound: &SphereBound) {}

    /// Returns the type of light.
    fn get_type(&self) -> LightType;

    /// Samples an emitted ray.
    ///
    /// * `u_pos` - Sample value for the position.
    /// * `u_dir` - Sample value for the direction.
    fn sample_ray(&self, u_pos: &Point2f, u_dir: &Point2f) -> Option<RaySample>;

    /// Returns the joint density of `sample_ray()` producing `geom` and `wo`.
    ///
    /// * `geom`       - Point on the light.
    /// * `wo`         - Outgoing direction.
    /// * `eval_delta` - Evaluate delta components as distributions.
    fn pdf_ray(&self, geom: &PointGeometry, wo: &Vector3f, eval_delta: bool) -> Float;

    /// Returns the density of sampling `geom` with respect to area (1 for
    /// points that have no area measure).
    ///
    /// * `geom` - Point on the light.
    fn pdf_position(&self, geom: &PointGeometry) -> Float;

    /// Returns the directional density of emission from `geom`.
    ///
    /// * `geom` - Point on the light.
    /// * `wo`   - Outgoing direction.
    fn pdf_direction(&self, geom: &PointGeometry, wo: &Vector3f) -> Float;

    /// Evaluates emitted radiance.
    ///
    /// * `geom`       - Point on the light.
    /// * `wo`         - Outgoing direction.
    /// * `eval_delta` - Evaluate delta components as distributions.
    fn eval(&self, geom: &PointGeometry, wo: &Vector3f, eval_delta: bool) -> Spectrum;

    /// Returns true if emission is concentrated in a single direction.
    fn is_specular(&self) -> bool {
        self.get_type().matches(LightType::DELTA_DIRECTION_LIGHT)
    }

    /// Returns true if the light lies at infinity.
    fn is_infinite(&self) -> bool {
        self.get_type().matches(LightType::INFINITE_LIGHT)
    }

    /// Returns true if a point on the light can be connected to directly.
    ///
    /// * `geom` - Point on the light.
    fn is_connectable(&self, _geom: &PointGeometry) -> bool {
        !self.get_type().matches(LightType::DELTA_DIRECTION_LIGHT)
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light + Send + Sync>;
