//! Graphics State

use core::material::*;
use core::spectrum::*;

/// Attributes applied to the shapes that follow. Saved and restored as a
/// stack by `attribute_begin()` and `attribute_end()`.
#[derive(Clone, Default)]
pub struct GraphicsState {
    /// Current material.
    pub current_material: Option<ArcMaterial>,

    /// Emitted radiance of the current area light. Shapes emit when set.
    pub area_light: Option<Spectrum>,
}
