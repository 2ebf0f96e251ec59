//! Participating Media

mod henyey_greenstein;

// Re-export
pub use henyey_greenstein::*;

use crate::geometry::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Models scattering directions inside a participating medium.
#[derive(Clone, Debug)]
pub enum PhaseFunction {
    HenyeyGreenstein(HenyeyGreenstein),
}

impl PhaseFunction {
    /// Returns an isotropic phase function.
    pub fn isotropic() -> Self {
        Self::HenyeyGreenstein(HenyeyGreenstein::new(0.0))
    }

    /// Returns the value of the phase function for the given pair of directions.
    ///
    /// * `wi` - Incident direction (pointing away from the scattering point).
    /// * `wo` - Outgoing direction.
    pub fn p(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        match self {
            Self::HenyeyGreenstein(f) => f.p(wi, wo),
        }
    }

    /// Returns a sampled outgoing direction. The phase function is sampled
    /// exactly so its density in solid angle measure equals `p()`.
    ///
    /// * `wi` - Incident direction (pointing away from the scattering point).
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wi: &Vector3f, u: &Point2f) -> Vector3f {
        match self {
            Self::HenyeyGreenstein(f) => f.sample_p(wi, u),
        }
    }
}

/// Atomic reference counted `PhaseFunction`.
pub type ArcPhaseFunction = Arc<PhaseFunction>;
