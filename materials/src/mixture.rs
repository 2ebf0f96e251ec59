//! Mixture Material

use core::geometry::*;
use core::interaction::*;
use core::material::*;
use core::pbrt::*;
use core::sampling::*;
use core::spectrum::*;

/// Combines materials with constant weights. A constituent is selected in
/// proportion to its weight and then selects one of its own components, so
/// the mixture's component indices run over every constituent's components
/// in order. Mixtures nest.
pub struct MixtureMaterial {
    /// Constituent materials and their weights.
    materials: Vec<(ArcMaterial, Float)>,

    /// First component index of each constituent, followed by the total.
    offsets: Vec<usize>,

    /// Constituent selection distribution.
    distrib: DiscreteDistribution,
}

impl MixtureMaterial {
    /// Create a new `MixtureMaterial`.
    ///
    /// * `materials` - Constituent materials and their non-negative weights.
    pub fn new(materials: Vec<(ArcMaterial, Float)>) -> Self {
        if materials.is_empty() {
            warn!("Mixture material without constituents scatters nothing");
        }
        let weights: Vec<Float> = materials.iter().map(|(_, w)| *w).collect();
        let offsets = std::iter::once(0)
            .chain(materials.iter().scan(0, |acc, (m, _)| {
                *acc += m.component_count();
                Some(*acc)
            }))
            .collect();
        Self {
            distrib: DiscreteDistribution::new(&weights),
            materials,
            offsets,
        }
    }

    /// Returns the constituent owning a component, its index and weight, and
    /// the component index within the constituent.
    ///
    /// * `comp` - Component index of the mixture.
    fn constituent(&self, comp: usize) -> Option<(usize, &ArcMaterial, Float, usize)> {
        let i = self.offsets.partition_point(|&o| o <= comp).checked_sub(1)?;
        let (m, w) = self.materials.get(i)?;
        Some((i, m, *w, comp - self.offsets[i]))
    }
}

impl Material for MixtureMaterial {
    fn sample_component(&self, u: Float, geom: &PointGeometry) -> ComponentSample {
        let (i, u_inner) = self.distrib.sample_remapped(u);
        let p = self.distrib.pmf(i);
        match self.materials.get(i) {
            Some((m, _)) if p > 0.0 => {
                let inner = m.sample_component(u_inner, geom);
                ComponentSample {
                    comp: self.offsets[i] + inner.comp,
                    weight: inner.weight / p,
                }
            }
            _ => ComponentSample { comp: 0, weight: 0.0 },
        }
    }

    fn component_count(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    fn pdf_component(&self, comp: usize, geom: &PointGeometry) -> Float {
        self.constituent(comp)
            .map_or(0.0, |(i, m, _, c)| self.distrib.pmf(i) * m.pdf_component(c, geom))
    }

    fn is_specular_component(&self, comp: usize) -> bool {
        self.constituent(comp)
            .map_or(false, |(_, m, _, c)| m.is_specular_component(c))
    }

    fn sample_direction(
        &self,
        u: &Point2f,
        geom: &PointGeometry,
        wi: &Vector3f,
        comp: usize,
        trans_dir: TransDir,
    ) -> Option<DirectionSample> {
        let (_, m, w, c) = self.constituent(comp)?;
        let s = m.sample_direction(u, geom, wi, c, trans_dir)?;
        Some(DirectionSample::new(s.wo, s.weight * w))
    }

    fn pdf_direction(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        comp: usize,
        eval_delta: bool,
    ) -> Float {
        self.constituent(comp)
            .map_or(0.0, |(_, m, _, c)| m.pdf_direction(geom, wi, wo, c, eval_delta))
    }

    fn eval(
        &self,
        geom: &PointGeometry,
        wi: &Vector3f,
        wo: &Vector3f,
        comp: usize,
        trans_dir: TransDir,
        eval_delta: bool,
    ) -> Spectrum {
        self.constituent(comp).map_or(Spectrum::ZERO, |(_, m, w, c)| {
            m.eval(geom, wi, wo, c, trans_dir, eval_delta) * w
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseMaterial, MirrorMaterial};
    use float_cmp::approx_eq;
    use std::sync::Arc;

    fn mixture() -> MixtureMaterial {
        let diffuse: ArcMaterial = Arc::new(DiffuseMaterial::new(Spectrum::new(0.8)));
        let mirror: ArcMaterial = Arc::new(MirrorMaterial::new(Spectrum::ONE));
        MixtureMaterial::new(vec![(diffuse, 0.25), (mirror, 0.75)])
    }

    #[test]
    fn components_follow_weights() {
        let m = mixture();
        let geom = PointGeometry::degenerate(Point3f::new(0.0, 0.0, 0.0));
        let c = m.sample_component(0.1, &geom);
        assert_eq!(c.comp, 0);
        assert!(approx_eq!(Float, c.weight, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, m.pdf_component(1, &geom), 0.75, epsilon = 1e-6));
        assert!(!m.is_specular_component(0));
        assert!(m.is_specular_component(1));
    }

    #[test]
    fn constituent_is_scaled_by_weight() {
        let m = mixture();
        let geom = PointGeometry::on_surface(
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Point2f::new(0.0, 0.0),
        );
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        let f = m.eval(&geom, &wi, &wi, 0, TransDir::EL, false);
        assert!(approx_eq!(Float, f[0], 0.8 * INV_PI * 0.25, epsilon = 1e-6));
        assert!(approx_eq!(Float, m.pdf_direction(&geom, &wi, &wi, 0, false), INV_PI, epsilon = 1e-6));
    }

    #[test]
    fn nested_mixture_keeps_inner_components() {
        let diffuse: ArcMaterial = Arc::new(DiffuseMaterial::new(Spectrum::new(0.5)));
        let inner: ArcMaterial = Arc::new(mixture());
        let m = MixtureMaterial::new(vec![(diffuse, 0.5), (inner, 0.5)]);
        let geom = PointGeometry::degenerate(Point3f::new(0.0, 0.0, 0.0));

        assert_eq!(m.component_count(), 3);
        assert!(!m.is_specular_component(0));
        assert!(!m.is_specular_component(1));
        assert!(m.is_specular_component(2));
        assert!(!m.is_specular_component(3));

        // Outer selection 0.5 times the inner mirror's 0.75.
        let c = m.sample_component(0.9, &geom);
        assert_eq!(c.comp, 2);
        assert!(approx_eq!(Float, c.weight, 1.0 / 0.375, epsilon = 1e-4));
        assert!(approx_eq!(Float, m.pdf_component(2, &geom), 0.375, epsilon = 1e-6));
        assert!(approx_eq!(Float, m.pdf_component(1, &geom), 0.125, epsilon = 1e-6));

        let total: Float = (0..m.component_count()).map(|c| m.pdf_component(c, &geom)).sum();
        assert!(approx_eq!(Float, total, 1.0, epsilon = 1e-6));
    }
}
