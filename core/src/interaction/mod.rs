//! Interactions

mod point_geometry;
mod scene_interaction;

// Re-export
pub use point_geometry::*;
pub use scene_interaction::*;

/// Transport direction of a subpath.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransDir {
    /// Light to eye: importance is evaluated, radiance is transported.
    LE,

    /// Eye to light: radiance is evaluated, importance is transported.
    EL,
}
