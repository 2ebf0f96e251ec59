//! Balance heuristic weights

use super::path::*;
use core::geometry::*;
use core::interaction::*;
use core::pbrt::*;
use core::scene::*;

/// Full path formed by strategy (s, t), read from the light end. Vertices
/// `0..s` come from the light subpath and `s..s+t` from the eye subpath in
/// reverse. The vertices next to the connection carry recomputed reverse
/// densities; all others reuse the densities cached while sampling.
struct ConnectedPath<'a> {
    /// The scene.
    scene: &'a Scene,

    /// Eye subpath.
    eye: &'a Subpath,

    /// Light subpath.
    light: &'a Subpath,

    /// Number of light subpath vertices.
    s: usize,

    /// Number of eye subpath vertices.
    t: usize,

    /// Density of generating vertex s-1 from the eye side.
    pdf_rev_l: Float,

    /// Density of generating vertex s-2 from the eye side.
    pdf_rev_l_prev: Float,

    /// Density of generating vertex s from the light side.
    pdf_fwd_e: Float,

    /// Density of generating vertex s+1 from the light side.
    pdf_fwd_e_prev: Float,
}

impl<'a> ConnectedPath<'a> {
    /// Returns the path with the densities next to the connection
    /// recomputed, or `None` if a subpath is too short.
    ///
    /// * `scene` - The scene.
    /// * `eye`   - Eye subpath.
    /// * `light` - Light subpath.
    /// * `s`     - Number of light subpath vertices.
    /// * `t`     - Number of eye subpath vertices.
    fn new(scene: &'a Scene, eye: &'a Subpath, light: &'a Subpath, s: usize, t: usize) -> Option<Self> {
        if s > light.len() || t > eye.len() || s + t < 2 {
            return None;
        }

        let mut path = Self {
            scene,
            eye,
            light,
            s,
            t,
            pdf_rev_l: 0.0,
            pdf_rev_l_prev: 0.0,
            pdf_fwd_e: 0.0,
            pdf_fwd_e_prev: 0.0,
        };

        let n = s + t;
        let v_l = s.checked_sub(1).and_then(|i| path.sp(i));
        let v_e = if t > 0 { path.sp(s) } else { None };

        match (v_l, v_e) {
            (Some(v_l), Some(v_e)) => {
                let d_le = direction(&v_l.geom, &v_e.geom);

                // Directions toward the subpath-internal neighbours. Endpoints
                // ignore the incident direction.
                let w_l_prev = light.vertex_at(s - 1, TransDir::LE)?.w_rev();
                let w_e_prev = eye.vertex_at(t - 1, TransDir::EL)?.w_rev();

                path.pdf_rev_l = convert_pdf_to_area(
                    scene.pdf_direction(&v_e, &w_e_prev, &-d_le, false),
                    &v_e.geom,
                    &v_l.geom,
                );
                path.pdf_fwd_e = convert_pdf_to_area(
                    scene.pdf_direction(&v_l, &w_l_prev, &d_le, false),
                    &v_l.geom,
                    &v_e.geom,
                );
                if s >= 2 {
                    let v_l_prev = path.sp(s - 2)?;
                    path.pdf_rev_l_prev = convert_pdf_to_area(
                        scene.pdf_direction(&v_l, &d_le, &w_l_prev, false),
                        &v_l.geom,
                        &v_l_prev.geom,
                    );
                }
                if t >= 2 {
                    let v_e_prev = path.sp(s + 1)?;
                    path.pdf_fwd_e_prev = convert_pdf_to_area(
                        scene.pdf_direction(&v_e, &-d_le, &w_e_prev, false),
                        &v_e.geom,
                        &v_e_prev.geom,
                    );
                }
            }
            (Some(v_l), None) => {
                // t = 0: the last light vertex acts as the camera endpoint.
                let connectable = scene.is_connectable_endpoint(&v_l);
                path.pdf_rev_l = if connectable {
                    scene.pdf_position(&v_l)
                } else {
                    1.0
                };
                let v_l_prev = path.sp(n - 2)?;
                let w_l_prev = light.vertex_at(s - 1, TransDir::LE)?.w_rev();
                let pdf = if connectable {
                    scene.pdf_direction(&v_l, &Vector3f::default(), &w_l_prev, false)
                } else {
                    scene.pdf_primary_ray(&v_l, &w_l_prev, false)
                };
                path.pdf_rev_l_prev = convert_pdf_to_area(pdf, &v_l.geom, &v_l_prev.geom);
            }
            (None, Some(v_e)) => {
                // s = 0: the last eye vertex acts as the light endpoint.
                let connectable = scene.is_connectable_endpoint(&v_e);
                path.pdf_fwd_e = if connectable {
                    scene.pdf_position(&v_e)
                } else {
                    1.0
                };
                let v_e_prev = path.sp(1)?;
                let w_e_prev = eye.vertex_at(t - 1, TransDir::EL)?.w_rev();
                let pdf = if connectable {
                    scene.pdf_direction(&v_e, &Vector3f::default(), &w_e_prev, false)
                } else {
                    scene.pdf_primary_ray(&v_e, &w_e_prev, false)
                };
                path.pdf_fwd_e_prev = convert_pdf_to_area(pdf, &v_e.geom, &v_e_prev.geom);
            }
            (None, None) => return None,
        }

        Some(path)
    }

    /// Returns the number of vertices.
    fn len(&self) -> usize {
        self.s + self.t
    }

    /// Returns the interaction at index `i` from the light end. The two ends
    /// take the endpoint roles of the full path.
    ///
    /// * `i` - Vertex index in `0..len()`.
    fn sp(&self, i: usize) -> Option<SceneInteraction> {
        let n = self.len();
        let v = if i < self.s {
            self.light.vertex_at(i, TransDir::LE)?
        } else {
            self.eye.vertex_at(n.checked_sub(i + 1)?, TransDir::EL)?
        };

        let sp = *v.sp();
        Some(if i == 0 {
            sp.as_kind(InteractionKind::LightEndpoint)
        } else if i == n - 1 {
            sp.as_kind(InteractionKind::CameraEndpoint)
        } else {
            sp
        })
    }

    /// Returns the density of generating vertex `i` from the light side.
    ///
    /// * `i` - Vertex index in `0..len()`.
    fn pdf_fwd(&self, i: usize) -> Float {
        let (s, t) = (self.s, self.t);
        if i < s {
            return self.light.vertex_at(i, TransDir::LE).map_or(0.0, |v| v.pdf_fwd());
        }
        let j = s + t - 1 - i;
        if j + 1 == t {
            self.pdf_fwd_e
        } else if j + 2 == t {
            self.pdf_fwd_e_prev
        } else {
            self.eye
                .vertex_at(j, TransDir::EL)
                .and_then(|v| v.pdf_rev())
                .unwrap_or(0.0)
        }
    }

    /// Returns the density of generating vertex `i` from the eye side.
    ///
    /// * `i` - Vertex index in `0..len()`.
    fn pdf_rev(&self, i: usize) -> Float {
        let s = self.s;
        if i + 1 == s {
            self.pdf_rev_l
        } else if i + 2 == s {
            self.pdf_rev_l_prev
        } else if i < s {
            self.light
                .vertex_at(i, TransDir::LE)
                .and_then(|v| v.pdf_rev())
                .unwrap_or(0.0)
        } else {
            let j = self.len() - 1 - i;
            self.eye.vertex_at(j, TransDir::EL).map_or(0.0, |v| v.pdf_fwd())
        }
    }

    /// Returns true if strategy (s', n - s') can sample this path.
    ///
    /// * `s` - Number of vertices taken from the light end.
    fn is_samplable(&self, s: usize) -> bool {
        is_samplable(self.scene, self.len(), s, |i| self.sp(i))
    }
}

/// Returns true if the full path of `n` vertices can be sampled by the
/// strategy taking `s` vertices from the light end. An endpoint-terminated
/// strategy needs a non-degenerate, non-specular far end; a connection needs
/// connectable endpoints and non-specular connecting vertices.
///
/// * `scene`  - The scene.
/// * `n`      - Number of vertices of the full path.
/// * `s`      - Number of vertices taken from the light end.
/// * `vertex` - Returns the interaction at an index from the light end.
pub(crate) fn is_samplable<F>(scene: &Scene, n: usize, s: usize, vertex: F) -> bool
where
    F: Fn(usize) -> Option<SceneInteraction>,
{
    if s > n || n < 2 {
        return false;
    }
    let t = n - s;
    let far_end_samplable = |sp: Option<SceneInteraction>| {
        sp.map_or(false, |sp| !sp.geom.is_degenerate() && !scene.is_specular_component(&sp))
    };

    if s == 0 {
        far_end_samplable(vertex(0))
    } else if t == 0 {
        far_end_samplable(vertex(n - 1))
    } else {
        let (Some(v_l), Some(v_e)) = (vertex(s - 1), vertex(s)) else {
            return false;
        };
        if (s == 1 && !scene.is_connectable_endpoint(&v_l))
            || (t == 1 && !scene.is_connectable_endpoint(&v_e))
        {
            return false;
        }
        if v_l.geom.is_infinite() || v_e.geom.is_infinite() {
            return false;
        }
        !scene.is_specular_component(&v_l) && !scene.is_specular_component(&v_e)
    }
}

/// Returns the balance heuristic weight of strategy (s, t). Call only for a
/// strategy that `connect()` accepted. Walks from the connection toward both
/// ends accumulating density ratios of the neighbouring strategies and
/// counting those that can sample the path.
///
/// * `scene` - The scene.
/// * `eye`   - Eye subpath.
/// * `light` - Light subpath.
/// * `s`     - Number of light subpath vertices.
/// * `t`     - Number of eye subpath vertices.
pub fn mis_weight(scene: &Scene, eye: &Subpath, light: &Subpath, s: usize, t: usize) -> Float {
    let Some(path) = ConnectedPath::new(scene, eye, light, s, t) else {
        return 0.0;
    };
    let n = path.len();

    let mut sum = 0.0;

    // Toward the eye end: strategies with more light vertices.
    let mut r = 1.0;
    for i in s..n {
        r *= safe_ratio(path.pdf_fwd(i), path.pdf_rev(i));
        if path.is_samplable(i + 1) {
            sum += r;
        }
    }

    // Toward the light end: strategies with more eye vertices.
    let mut r = 1.0;
    for i in (0..s).rev() {
        r *= safe_ratio(path.pdf_rev(i), path.pdf_fwd(i));
        if path.is_samplable(i) {
            sum += r;
        }
    }

    1.0 / (1.0 + sum)
}
