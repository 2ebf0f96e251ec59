//! Henyey-Greenstein

use crate::geometry::*;
use crate::pbrt::*;

/// Henyey-Greenstein phase function.
#[derive(Clone, Debug)]
pub struct HenyeyGreenstein {
    /// The asymmetry parameter. Isotropic phase functions use g = 0.
    pub g: Float,
}

impl HenyeyGreenstein {
    /// Returns a new `HenyeyGreenstein`.
    ///
    /// * `g` - The asymmetry parameter.
    pub fn new(g: Float) -> Self {
        Self { g }
    }

    /// Returns the value of the phase function for the given pair of directions.
    ///
    /// * `wi` - Incident direction (pointing away from the scattering point).
    /// * `wo` - Outgoing direction.
    pub fn p(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        phase_hg(-wi.dot(wo), self.g)
    }

    /// Returns a sampled outgoing direction.
    ///
    /// * `wi` - Incident direction (pointing away from the scattering point).
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wi: &Vector3f, u: &Point2f) -> Vector3f {
        // Cosine between the outgoing direction and the propagation direction.
        let cos_theta = if abs(self.g) < 1e-3 {
            1.0 - 2.0 * u.x
        } else {
            let sqr_term = (1.0 - self.g * self.g) / (1.0 - self.g + 2.0 * self.g * u.x);
            (1.0 + self.g * self.g - sqr_term * sqr_term) / (2.0 * self.g)
        };

        let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
        let phi = TWO_PI * u.y;
        let frame = Frame::from_normal(-*wi);
        frame.to_world(&Vector3f::new(
            sin_theta * phi.cos(),
            sin_theta * phi.sin(),
            cos_theta,
        ))
    }
}

/// Computes the Henyey-Greenstein phase function for the cosine between the
/// propagation direction and the scattered direction.
///
/// * `cos_theta` - Cosine of the scattering angle.
/// * `g`         - Asymmetry parameter.
#[inline]
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g - 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * denom.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn isotropic_is_constant() {
        let hg = HenyeyGreenstein::new(0.0);
        let a = Vector3f::new(0.0, 0.0, 1.0);
        let b = Vector3f::new(1.0, 0.0, 0.0);
        assert!(approx_eq!(f32, hg.p(&a, &b), INV_FOUR_PI, epsilon = 1e-6));
        assert!(approx_eq!(f32, hg.p(&a, &a), INV_FOUR_PI, epsilon = 1e-6));
    }

    #[test]
    fn forward_scattering_prefers_propagation_direction() {
        let hg = HenyeyGreenstein::new(0.7);
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        assert!(hg.p(&wi, &-wi) > hg.p(&wi, &wi));
    }

    proptest! {
        #[test]
        fn sampled_directions_are_unit(g in -0.9..0.9f32, x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let hg = HenyeyGreenstein::new(g);
            let wo = hg.sample_p(&Vector3f::new(0.0, 1.0, 0.0), &Point2f::new(x, y));
            prop_assert!(approx_eq!(f32, wo.length(), 1.0, epsilon = 1e-4));
        }
    }
}
