//! Subpath connection

use super::path::*;
use core::geometry::*;
use core::interaction::*;
use core::scene::*;
use core::spectrum::*;

/// Contribution of one strategy deposited on the image plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Splat {
    /// Unweighted contribution.
    pub c: Spectrum,

    /// Raster position in [0, 1]^2.
    pub rp: Point2f,
}

/// Connects the first `s` vertices of the light subpath with the first `t`
/// vertices of the eye subpath and evaluates the unweighted contribution.
/// Returns `None` when the strategy cannot form the path or the contribution
/// is zero.
///
/// * `scene` - The scene.
/// * `eye`   - Eye subpath.
/// * `light` - Light subpath.
/// * `s`     - Number of light subpath vertices.
/// * `t`     - Number of eye subpath vertices.
pub fn connect(scene: &Scene, eye: &Subpath, light: &Subpath, s: usize, t: usize) -> Option<Splat> {
    if s + t < 2 {
        return None;
    }

    let c = if s == 0 {
        // The eye subpath hits a light.
        let v = eye.vertex_at(t - 1, TransDir::EL)?;
        if v.geom().is_degenerate() {
            return None;
        }
        let sp = v.sp().as_kind(InteractionKind::LightEndpoint);
        let le = scene.eval_contrb_direction(&sp, &Vector3f::default(), &v.w_rev(), TransDir::LE, true);
        le * v.alpha()
    } else if t == 0 {
        // The light subpath hits the camera.
        let v = light.vertex_at(s - 1, TransDir::LE)?;
        if v.geom().is_degenerate() {
            return None;
        }
        let sp = v.sp().as_kind(InteractionKind::CameraEndpoint);
        let we = scene.eval_contrb_direction(&sp, &Vector3f::default(), &v.w_rev(), TransDir::EL, true);
        we * v.alpha()
    } else {
        let v_l = light.vertex_at(s - 1, TransDir::LE)?;
        let v_e = eye.vertex_at(t - 1, TransDir::EL)?;
        if (s == 1 && !scene.is_connectable_endpoint(v_l.sp()))
            || (t == 1 && !scene.is_connectable_endpoint(v_e.sp()))
        {
            return None;
        }
        if v_l.geom().is_infinite() || v_e.geom().is_infinite() {
            return None;
        }
        if scene.is_specular_component(v_l.sp()) || scene.is_specular_component(v_e.sp()) {
            return None;
        }
        if !scene.visible(v_l.sp(), v_e.sp()) {
            return None;
        }

        let d_le = direction(v_l.geom(), v_e.geom());
        let fs_l = scene.eval_contrb_direction(v_l.sp(), &v_l.w_rev(), &d_le, TransDir::LE, true);
        let fs_e = scene.eval_contrb_direction(v_e.sp(), &v_e.w_rev(), &-d_le, TransDir::EL, true);
        let g = geometry_term(v_l.geom(), v_e.geom());
        v_l.alpha() * fs_l * g * fs_e * v_e.alpha()
    };

    if c.is_black() {
        return None;
    }

    let rp = raster_position(scene, eye, light, s, t)?;
    Some(Splat { c, rp })
}

/// Returns the raster position of a connected path from the segment nearest
/// the camera.
///
/// * `scene` - The scene.
/// * `eye`   - Eye subpath.
/// * `light` - Light subpath.
/// * `s`     - Number of light subpath vertices.
/// * `t`     - Number of eye subpath vertices.
fn raster_position(scene: &Scene, eye: &Subpath, light: &Subpath, s: usize, t: usize) -> Option<Point2f> {
    let wo = match t {
        // The last light vertex lies on the camera; the ray leaves the camera
        // toward its predecessor.
        0 => light.vertex_at(s - 1, TransDir::LE)?.w_rev(),
        1 => {
            let v_e = eye.vertex_at(0, TransDir::EL)?;
            let v_l = light.vertex_at(s - 1, TransDir::LE)?;
            direction(v_e.geom(), v_l.geom())
        }
        _ => eye.w_fwd(0)?,
    };
    scene.raster_position(&wo)
}
