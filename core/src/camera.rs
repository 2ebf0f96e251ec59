//! Camera

use crate::geometry::*;
use crate::interaction::*;
use crate::light::RaySample;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Camera trait provides common behavior. A camera is the importance
/// emitting endpoint of eye subpaths.
pub trait Camera {
    /// Samples a primary ray through the image.
    ///
    /// * `u` - Raster position in [0, 1)^2.
    fn sample_ray(&self, u: &Point2f) -> Option<RaySample>;

    /// Returns the joint density of `sample_ray()` producing `geom` and `wo`.
    ///
    /// * `geom` - Point on the camera.
    /// * `wo`   - Outgoing direction.
    fn pdf_ray(&self, geom: &PointGeometry, wo: &Vector3f) -> Float {
        self.pdf_position(geom) * self.pdf_direction(geom, wo)
    }

    /// Returns the positional density (1 for points without area measure).
    ///
    /// * `geom` - Point on the camera.
    fn pdf_position(&self, geom: &PointGeometry) -> Float;

    /// Returns the directional density of importance emission.
    ///
    /// * `geom` - Point on the camera.
    /// * `wo`   - Outgoing direction.
    fn pdf_direction(&self, geom: &PointGeometry, wo: &Vector3f) -> Float;

    /// Evaluates emitted importance.
    ///
    /// * `geom`       - Point on the camera.
    /// * `wo`         - Outgoing direction.
    /// * `eval_delta` - Evaluate delta components as distributions.
    fn eval(&self, geom: &PointGeometry, wo: &Vector3f, eval_delta: bool) -> Spectrum;

    /// Maps an outgoing direction to a raster position in [0, 1)^2, or `None`
    /// if the direction lies outside the image.
    ///
    /// * `wo` - Outgoing direction.
    fn raster_position(&self, wo: &Vector3f) -> Option<Point2f>;

    /// Returns true if a point on the camera can be connected to directly.
    ///
    /// * `geom` - Point on the camera.
    fn is_connectable(&self, _geom: &PointGeometry) -> bool {
        true
    }

    /// Returns true if importance is concentrated in a single direction.
    fn is_specular(&self) -> bool {
        false
    }

    /// Returns the image aspect ratio (width / height) the camera expects.
    fn aspect(&self) -> Float;
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;
