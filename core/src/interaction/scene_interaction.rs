//! Scene Interaction

use super::*;
use crate::geometry::*;

/// Role of an interaction. Every query that depends on the role matches on
/// this variant explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Scattering on a surface.
    Surface,

    /// Scattering inside a participating medium.
    Medium,

    /// The camera endpoint of a path.
    CameraEndpoint,

    /// The light endpoint of a path.
    LightEndpoint,
}

/// A point produced by a scene query together with the primitive it belongs
/// to, the selected scattering component and its role.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneInteraction {
    /// Role of the interaction.
    pub kind: InteractionKind,

    /// Index of the primitive in the scene.
    pub primitive: usize,

    /// Selected scattering component (BSDF lobe or medium constituent).
    pub comp: usize,

    /// Geometry of the point.
    pub geom: PointGeometry,
}

impl SceneInteraction {
    /// Returns a surface interaction.
    ///
    /// * `primitive` - Primitive index.
    /// * `geom`      - Geometry of the point.
    pub fn surface(primitive: usize, geom: PointGeometry) -> Self {
        Self {
            kind: InteractionKind::Surface,
            primitive,
            comp: 0,
            geom,
        }
    }

    /// Returns a medium interaction. Scene intersection only returns surface
    /// interactions, so medium vertices come from callers that sample
    /// distances inside a primitive's `phase` themselves.
    ///
    /// * `primitive` - Primitive index owning the medium.
    /// * `p`         - Position inside the medium.
    pub fn medium(primitive: usize, p: Point3f) -> Self {
        Self {
            kind: InteractionKind::Medium,
            primitive,
            comp: 0,
            geom: PointGeometry::degenerate(p),
        }
    }

    /// Returns a camera endpoint.
    ///
    /// * `primitive` - Primitive index of the camera.
    /// * `geom`      - Geometry of the point.
    pub fn camera_endpoint(primitive: usize, geom: PointGeometry) -> Self {
        Self {
            kind: InteractionKind::CameraEndpoint,
            primitive,
            comp: 0,
            geom,
        }
    }

    /// Returns a light endpoint.
    ///
    /// * `primitive` - Primitive index of the light.
    /// * `geom`      - Geometry of the point.
    pub fn light_endpoint(primitive: usize, geom: PointGeometry) -> Self {
        Self {
            kind: InteractionKind::LightEndpoint,
            primitive,
            comp: 0,
            geom,
        }
    }

    /// Returns a copy reinterpreted with another role.
    ///
    /// * `kind` - The new role.
    pub fn as_kind(&self, kind: InteractionKind) -> Self {
        Self { kind, ..*self }
    }

    /// Returns a copy with the given scattering component selected.
    ///
    /// * `comp` - Component index.
    pub fn with_component(&self, comp: usize) -> Self {
        Self { comp, ..*self }
    }

    /// Returns true if the interaction is a path endpoint.
    pub fn is_endpoint(&self) -> bool {
        matches!(
            self.kind,
            InteractionKind::CameraEndpoint | InteractionKind::LightEndpoint
        )
    }
}
