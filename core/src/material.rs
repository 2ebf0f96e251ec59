//! Material

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Result of sampling a direction.
#[derive(Copy, Clone, Debug)]
pub struct DirectionSample {
    /// Sampled outgoing direction.
    pub wo: Vector3f,

    /// Scattering value times cosine divided by the sampling density. For
    /// directional densities in projected solid angle measure this is
    /// simply `f / pdf`.
    pub weight: Spectrum,
}

impl DirectionSample {
    /// Returns a new `DirectionSample`.
    ///
    /// * `wo`     - Sampled outgoing direction.
    /// * `weight` - Throughput weight.
    pub fn new(wo: Vector3f, weight: Spectrum) -> Self {
        Self { wo, weight }
    }
}

/// Result of sampling a scattering component.
#[derive(Copy, Clone, Debug)]
pub struct ComponentSample {
    /// Selected component index.
    pub comp: usize,

    /// Reciprocal of the selection probability.
    pub weight: Float,
}

impl ComponentSample {
    /// The only component of a single-lobe material.
    pub const SINGLE: Self = Self { comp: 0, weight: 1.0 };
}

/// Surface scattering. Directional densities are in projected solid angle
/// measure. `wi` always points away from the surface toward the previous
/// vertex of the subpath being grown.
pub trait Material {
    /// Selects a scattering component.
    ///
    /// * `u`    - Sample value in [0, 1).
    /// * `geom` - Surface point.
    fn sample_component(&self, _u: Float, _geom: &PointGeometry) -> ComponentSample {
        ComponentSample::SINGLE
    }

    /// Returns the number of scattering components.
    fn component_count(&self) -> usize {
        1
    }

    /// Returns the probability of selecting a component.
    ///
    /// * `comp` - Component index.
    /// * `geom` - Surface point.
    fn pdf_component(&self, _comp: usize, _geom: &PointGeometry) -> Float {
        1.0
    }

    /// Returns true if the component scatters into a measure-zero set of
    /// directions.
    ///
    /// * `comp` - Component index.
    fn is_specular_component(&self, comp: usize) -> bool;

    /// Samples an outgoing direction.
    ///
    /// * `u`         - Sample value in [0, 1)^2.
    /// * `geom`      - Surface point.
    /// * `wi`        - Incident direction.
    /// * `comp`      - Component index.
    /// * `trans_dir` - Transport direction.
    fn sample_direction(
        &self,
        u: &Point2f,
        geom: &PointGeometry,
        wi: &Vector3f,
        comp: usize,
        trans_dir: TransDir,
    ) -> Option<DirectionSample>;

    /// Returns the density of sampling `wo` given `wi`. Specular components
    /// return a nominal unit density unless `eval_delta` is set, in which
    /// case they return zero.
    ///
    /// * `geom`       - Surface point.
    /// * `wi`         - Incident direction.
    /// * `wo`         - Outgoing direction.
    /// * `comp`       - Component index.
    /// * `eval_delta` - Evaluate delta components as distributions.
    fn pdf_direction(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        comp: usize,
        eval_delta: bool,
    ) -> Float;

    /// Evaluates the scattering function.
    ///
    /// * `geom`       - Surface point.
    /// * `wi`         - Incident direction.
    /// * `wo`         - Outgoing direction.
    /// * `comp`       - Component index.
    /// * `trans_dir`  - Transport direction.
    /// * `eval_delta` - Evaluate delta components as distributions.
    fn eval(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        comp: usize,
        trans_dir: TransDir,
        eval_delta: bool,
    ) -> Spectrum;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
