//! Subpaths

use core::geometry::*;
use core::interaction::*;
use core::pbrt::*;
use core::rng::RNG;
use core::scene::*;
use core::spectrum::*;
use std::cell::OnceCell;

/// The state of a vertex fixed when the vertex is appended to its subpath.
#[derive(Copy, Clone, Debug)]
pub struct Generated {
    /// The interaction with its selected component.
    pub sp: SceneInteraction,

    /// Throughput up to and including this vertex, already divided by all
    /// sampling densities.
    pub alpha: Spectrum,

    /// Unit direction toward the previous vertex of the subpath. Zero at the
    /// endpoint.
    pub w_rev: Vector3f,

    /// Area measure density of generating this vertex from its predecessor.
    pub pdf_fwd: Float,
}

/// A subpath vertex. Everything except the reverse density is immutable.
#[derive(Clone, Debug)]
pub struct Vertex {
    /// Immutable part.
    generated: Generated,

    /// Area measure density of generating this vertex from its successor.
    /// Set once the successor's outgoing direction is sampled.
    pdf_rev: OnceCell<Float>,
}

impl Vertex {
    /// Create a new `Vertex`.
    ///
    /// * `generated` - State fixed at creation.
    pub fn new(generated: Generated) -> Self {
        Self {
            generated,
            pdf_rev: OnceCell::new(),
        }
    }

    /// Returns the interaction.
    pub fn sp(&self) -> &SceneInteraction {
        &self.generated.sp
    }

    /// Returns the point geometry.
    pub fn geom(&self) -> &PointGeometry {
        &self.generated.sp.geom
    }

    /// Returns the accumulated throughput.
    pub fn alpha(&self) -> Spectrum {
        self.generated.alpha
    }

    /// Returns the direction toward the previous vertex.
    pub fn w_rev(&self) -> Vector3f {
        self.generated.w_rev
    }

    /// Returns the generation density from the predecessor.
    pub fn pdf_fwd(&self) -> Float {
        self.generated.pdf_fwd
    }

    /// Returns the generation density from the successor, if known.
    pub fn pdf_rev(&self) -> Option<Float> {
        self.pdf_rev.get().copied()
    }

    /// Records the generation density from the successor.
    ///
    /// * `pdf` - Area measure density.
    fn set_pdf_rev(&self, pdf: Float) {
        let result = self.pdf_rev.set(pdf);
        debug_assert!(result.is_ok(), "reverse density recorded twice");
    }
}

/// An insertion ordered sequence of vertices grown from one endpoint.
#[derive(Clone, Debug)]
pub struct Subpath {
    /// Transport direction the subpath was sampled with.
    trans_dir: TransDir,

    /// Vertices starting at the endpoint.
    vertices: Vec<Vertex>,
}

impl Subpath {
    /// Create an empty `Subpath`.
    ///
    /// * `trans_dir` - `LE` for a light subpath, `EL` for an eye subpath.
    pub fn new(trans_dir: TransDir) -> Self {
        Self {
            trans_dir,
            vertices: vec![],
        }
    }

    /// Returns the transport direction.
    pub fn trans_dir(&self) -> TransDir {
        self.trans_dir
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the subpath has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the vertex `i` steps away from the end that `dir` starts at.
    /// For a light subpath `LE` counts from the light and `EL` from the far
    /// end; an eye subpath is the other way round.
    ///
    /// * `i`   - Number of steps.
    /// * `dir` - Reading direction.
    pub fn vertex_at(&self, i: usize, dir: TransDir) -> Option<&Vertex> {
        let n = self.vertices.len();
        if i >= n {
            return None;
        }
        let index = if dir == self.trans_dir { i } else { n - 1 - i };
        self.vertices.get(index)
    }

    /// Returns the unit direction from vertex `i` toward vertex `i + 1` in
    /// insertion order.
    ///
    /// * `i` - Vertex index from the endpoint.
    pub fn w_fwd(&self, i: usize) -> Option<Vector3f> {
        let v = self.vertices.get(i)?;
        let v_next = self.vertices.get(i + 1)?;
        Some(direction(v.geom(), v_next.geom()))
    }

    /// Replaces the contents with a random walk from the endpoint of the
    /// subpath's transport direction. The walk stops early when endpoint or
    /// direction sampling fails, a ray escapes the scene or a vertex at
    /// infinity is reached.
    ///
    /// * `rng`          - Random number generator.
    /// * `scene`        - The scene.
    /// * `max_vertices` - Maximum number of vertices.
    pub fn sample(&mut self, rng: &mut RNG, scene: &Scene, max_vertices: usize) {
        self.vertices.clear();
        if max_vertices == 0 {
            return;
        }

        let Some(primary) = scene.sample_primary_ray(rng, self.trans_dir) else {
            return;
        };

        // Endpoints that cannot be connected to are only ever passed through,
        // so their positional density is nominal.
        let connectable = scene.is_connectable_endpoint(&primary.sp);
        let pdf_position = if connectable {
            scene.pdf_position(&primary.sp)
        } else {
            1.0
        };
        if pdf_position == 0.0 {
            return;
        }

        let endpoint = Vertex::new(Generated {
            sp: primary.sp,
            alpha: Spectrum::new(1.0 / pdf_position),
            w_rev: Vector3f::default(),
            pdf_fwd: pdf_position,
        });

        let mut wo = primary.wo;
        let mut throughput = primary.weight;
        let mut pdf_next = if connectable {
            scene.pdf_direction(endpoint.sp(), &endpoint.w_rev(), &wo, false)
        } else {
            scene.pdf_primary_ray(endpoint.sp(), &wo, false)
        };
        self.vertices.push(endpoint);

        while self.vertices.len() < max_vertices {
            let last = self.vertices.len() - 1;

            if last > 0 {
                let v = &self.vertices[last];
                let Some(s) = scene.sample_direction(rng, v.sp(), &v.w_rev(), self.trans_dir)
                else {
                    break;
                };
                wo = s.wo;

                let v_prev = &self.vertices[last - 1];
                v_prev.set_pdf_rev(reverse_pdf(scene, v.sp(), &v.w_rev(), &wo, v_prev.sp()));

                throughput *= s.weight;
                pdf_next = scene.pdf_direction(v.sp(), &v.w_rev(), &wo, false);
            }

            let v = &self.vertices[last];
            let Some(hit) = scene.intersect(&Ray::new(v.geom().p(), wo)) else {
                break;
            };

            let comp = scene.sample_component(rng, &hit);
            throughput *= comp.weight;

            let sp = hit.with_component(comp.comp);
            let pdf_fwd = convert_pdf_to_area(pdf_next, v.geom(), &sp.geom);
            let at_infinity = sp.geom.is_infinite();
            self.vertices.push(Vertex::new(Generated {
                sp,
                alpha: throughput,
                w_rev: -wo,
                pdf_fwd,
            }));

            if at_infinity {
                break;
            }
        }
    }
}

/// Returns the density, in area measure at `prev`, of sampling the direction
/// toward `prev` at `sp` when the walk arrives along `wo`. Degenerate
/// endpoints are never reached by a sampled direction, so theirs is 1.
/// Degenerate scattering points such as medium vertices get a real density.
///
/// * `scene` - The scene.
/// * `sp`    - Interaction the direction is sampled at.
/// * `w_rev` - Direction from `sp` toward `prev`.
/// * `wo`    - Outgoing direction of the forward walk at `sp`.
/// * `prev`  - The preceding vertex.
fn reverse_pdf(
    scene: &Scene,
    sp: &SceneInteraction,
    w_rev: &Vector3f,
    wo: &Vector3f,
    prev: &SceneInteraction,
) -> Float {
    if prev.is_endpoint() && prev.geom.is_degenerate() {
        1.0
    } else {
        convert_pdf_to_area(scene.pdf_direction(sp, wo, w_rev, false), &sp.geom, &prev.geom)
    }
}

/// Samples a subpath by random walk from a transport endpoint.
///
/// * `rng`          - Random number generator.
/// * `scene`        - The scene.
/// * `max_vertices` - Maximum number of vertices.
/// * `trans_dir`    - `LE` to start at a light, `EL` to start at the camera.
pub fn sample_subpath(rng: &mut RNG, scene: &Scene, max_vertices: usize, trans_dir: TransDir) -> Subpath {
    let mut subpath = Subpath::new(trans_dir);
    subpath.sample(rng, scene, max_vertices);
    subpath
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::medium::PhaseFunction;
    use float_cmp::approx_eq;
    use std::sync::Arc;

    fn medium_scene() -> Scene {
        Scene::new(vec![Primitive {
            phase: Some(Arc::new(PhaseFunction::isotropic())),
            ..Primitive::default()
        }])
    }

    #[test]
    fn degenerate_endpoint_has_nominal_reverse_pdf() {
        let scene = medium_scene();
        let sp = SceneInteraction::medium(0, Point3f::new(0.0, 0.0, 0.0));
        let prev = SceneInteraction::light_endpoint(0, PointGeometry::degenerate(Point3f::new(0.0, 0.0, 2.0)));
        let w_rev = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(1.0, 0.0, 0.0);
        assert_eq!(reverse_pdf(&scene, &sp, &w_rev, &wo, &prev), 1.0);
    }

    #[test]
    fn medium_predecessor_gets_area_density() {
        let scene = medium_scene();
        let sp = SceneInteraction::medium(0, Point3f::new(0.0, 0.0, 0.0));
        let prev = SceneInteraction::medium(0, Point3f::new(0.0, 0.0, 2.0));
        let w_rev = Vector3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(1.0, 0.0, 0.0);

        // Isotropic density over a squared distance of 4.
        let pdf = reverse_pdf(&scene, &sp, &w_rev, &wo, &prev);
        assert!(approx_eq!(Float, pdf, INV_FOUR_PI / 4.0, epsilon = 1e-6));
    }
}
