//! Full paths

use super::mis::is_samplable;
use super::path::*;
use core::geometry::*;
use core::interaction::*;
use core::pbrt::*;
use core::scene::*;
use core::spectrum::*;

/// A complete light transport path stored from the light end. Densities and
/// contributions are evaluated from scratch for any strategy, which makes it
/// slow but independent of the values cached in subpaths.
#[derive(Clone, Debug)]
pub struct FullPath {
    /// Vertices from the light end to the camera end.
    vertices: Vec<SceneInteraction>,
}

impl FullPath {
    /// Create the full path formed by strategy (s, t). The first vertex takes
    /// the light endpoint role and the last the camera endpoint role.
    ///
    /// * `eye`   - Eye subpath.
    /// * `light` - Light subpath.
    /// * `s`     - Number of light subpath vertices.
    /// * `t`     - Number of eye subpath vertices.
    pub fn from_subpaths(eye: &Subpath, light: &Subpath, s: usize, t: usize) -> Option<Self> {
        if s > light.len() || t > eye.len() || s + t < 2 {
            return None;
        }

        let mut vertices: Vec<SceneInteraction> = (0..s)
            .filter_map(|i| light.vertex_at(i, TransDir::LE))
            .chain((0..t).rev().filter_map(|i| eye.vertex_at(i, TransDir::EL)))
            .map(|v| *v.sp())
            .collect();

        let n = vertices.len();
        if n < 2 {
            return None;
        }
        vertices[0] = vertices[0].as_kind(InteractionKind::LightEndpoint);
        vertices[n - 1] = vertices[n - 1].as_kind(InteractionKind::CameraEndpoint);
        Some(Self { vertices })
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the path has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the vertex `i` steps from the light end (`LE`) or the camera
    /// end (`EL`).
    ///
    /// * `i`   - Number of steps.
    /// * `dir` - Reading direction.
    pub fn vertex_at(&self, i: usize, dir: TransDir) -> Option<&SceneInteraction> {
        let n = self.vertices.len();
        if i >= n {
            return None;
        }
        match dir {
            TransDir::LE => self.vertices.get(i),
            TransDir::EL => self.vertices.get(n - 1 - i),
        }
    }

    /// Returns the direction between two vertices read in `dir`, or zero if
    /// either does not exist.
    fn direction(&self, from: Option<usize>, to: Option<usize>, dir: TransDir) -> Vector3f {
        match (
            from.and_then(|i| self.vertex_at(i, dir)),
            to.and_then(|i| self.vertex_at(i, dir)),
        ) {
            (Some(a), Some(b)) => direction(&a.geom, &b.geom),
            _ => Vector3f::default(),
        }
    }

    /// Returns the raster position from the primary ray of the camera.
    ///
    /// * `scene` - The scene.
    pub fn raster_position(&self, scene: &Scene) -> Option<Point2f> {
        let wo = self.direction(Some(0), Some(1), TransDir::EL);
        scene.raster_position(&wo)
    }

    /// Returns true if strategy (s, n - s) can sample the path.
    ///
    /// * `scene` - The scene.
    /// * `s`     - Number of vertices taken from the light end.
    pub fn is_samplable(&self, scene: &Scene, s: usize) -> bool {
        is_samplable(scene, self.len(), s, |i| self.vertices.get(i).copied())
    }

    /// Returns the product of scattering values and geometry terms along
    /// the first `l` vertices read in `trans_dir`, excluding the connection.
    fn eval_subpath(&self, scene: &Scene, l: usize, trans_dir: TransDir) -> Spectrum {
        let mut f = Spectrum::ONE;
        for i in 0..l.saturating_sub(1) {
            let (Some(v), Some(v_next)) = (self.vertex_at(i, trans_dir), self.vertex_at(i + 1, trans_dir))
            else {
                return Spectrum::ZERO;
            };
            let wi = self.direction(Some(i), i.checked_sub(1), trans_dir);
            let wo = direction(&v.geom, &v_next.geom);
            f *= scene.eval_contrb_direction(v, &wi, &wo, trans_dir, false);
            f *= geometry_term(&v.geom, &v_next.geom);
        }
        f
    }

    /// Returns the connection term of strategy (s, n - s).
    fn eval_connection(&self, scene: &Scene, s: usize) -> Spectrum {
        let n = self.len();
        let t = n - s;
        if s == 0 {
            let v = &self.vertices[0];
            let wo = self.direction(Some(0), Some(1), TransDir::LE);
            scene.eval_contrb_direction(v, &Vector3f::default(), &wo, TransDir::LE, true)
        } else if t == 0 {
            let v = &self.vertices[n - 1];
            let wo = self.direction(Some(0), Some(1), TransDir::EL);
            scene.eval_contrb_direction(v, &Vector3f::default(), &wo, TransDir::EL, true)
        } else {
            let (v_l, v_e) = (&self.vertices[s - 1], &self.vertices[s]);
            let d_le = direction(&v_l.geom, &v_e.geom);
            let w_l_prev = self.direction(Some(s - 1), s.checked_sub(2), TransDir::LE);
            let w_e_prev = self.direction(Some(t - 1), t.checked_sub(2), TransDir::EL);
            let fs_l = scene.eval_contrb_direction(v_l, &w_l_prev, &d_le, TransDir::LE, true);
            let fs_e = scene.eval_contrb_direction(v_e, &w_e_prev, &-d_le, TransDir::EL, true);
            fs_l * geometry_term(&v_l.geom, &v_e.geom) * fs_e
        }
    }

    /// Evaluates the measurement contribution function as seen by strategy
    /// (s, n - s). Only the connection decides whether delta components are
    /// evaluated as distributions.
    ///
    /// * `scene` - The scene.
    /// * `s`     - Number of vertices taken from the light end.
    pub fn measurement_contribution(&self, scene: &Scene, s: usize) -> Spectrum {
        let n = self.len();
        if s > n || n < 2 {
            return Spectrum::ZERO;
        }
        self.eval_subpath(scene, s, TransDir::LE)
            * self.eval_connection(scene, s)
            * self.eval_subpath(scene, n - s, TransDir::EL)
    }

    /// Returns the area measure density of the first `l` vertices read in
    /// `trans_dir` being generated by a random walk.
    fn pdf_subpath(&self, scene: &Scene, l: usize, trans_dir: TransDir) -> Float {
        if l == 0 {
            return 1.0;
        }
        let Some(v0) = self.vertex_at(0, trans_dir) else {
            return 0.0;
        };

        let (mut p, first) = if scene.is_connectable_endpoint(v0) {
            (scene.pdf_position(v0) * scene.pdf_component(v0), 0)
        } else {
            let Some(v1) = self.vertex_at(1, trans_dir) else {
                return 0.0;
            };
            let d01 = direction(&v0.geom, &v1.geom);
            let p_ray = scene.pdf_primary_ray(v0, &d01, false);
            let p = convert_pdf_to_area(p_ray, &v0.geom, &v1.geom)
                * scene.pdf_component(v0)
                * scene.pdf_component(v1);
            (p, 1)
        };

        for i in first..l - 1 {
            let (Some(v), Some(v_next)) = (self.vertex_at(i, trans_dir), self.vertex_at(i + 1, trans_dir))
            else {
                return 0.0;
            };
            let wi = self.direction(Some(i), i.checked_sub(1), trans_dir);
            let wo = direction(&v.geom, &v_next.geom);
            let p_dir = scene.pdf_direction(v, &wi, &wo, false);
            p *= scene.pdf_component(v_next) * convert_pdf_to_area(p_dir, &v.geom, &v_next.geom);
        }
        p
    }

    /// Returns the density of sampling the path with strategy (s, n - s), or
    /// zero if the strategy cannot sample it.
    ///
    /// * `scene` - The scene.
    /// * `s`     - Number of vertices taken from the light end.
    pub fn pdf(&self, scene: &Scene, s: usize) -> Float {
        if !self.is_samplable(scene, s) {
            return 0.0;
        }
        let n = self.len();
        self.pdf_subpath(scene, s, TransDir::LE) * self.pdf_subpath(scene, n - s, TransDir::EL)
    }

    /// Returns the balance heuristic weight of strategy (s, n - s) computed
    /// from the densities of every strategy.
    ///
    /// * `scene` - The scene.
    /// * `s`     - Number of vertices taken from the light end.
    pub fn mis_weight(&self, scene: &Scene, s: usize) -> Float {
        let ps = self.pdf(scene, s);
        if ps == 0.0 {
            return 0.0;
        }
        let sum: Float = (0..=self.len()).map(|s2| self.pdf(scene, s2) / ps).sum();
        1.0 / sum
    }
}
