//! Errors

use thiserror::Error;

/// Configuration errors detected before sampling begins. Routine Monte Carlo
/// outcomes (missed intersections, zero contributions, unconnectable
/// strategies) are never reported through this type.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The scene has no camera.
    #[error("scene has no camera")]
    NoCamera,

    /// The scene has no intersectable primitives.
    #[error("scene has no primitives")]
    NoPrimitives,

    /// The scene has no light sources.
    #[error("scene has no lights")]
    NoLights,

    /// Path length bounds are out of range.
    #[error("invalid path length bounds: min {min}, max {max} (need 2 <= min <= max)")]
    InvalidPathLength { min: usize, max: usize },

    /// The film has no pixels.
    #[error("invalid film size {width}x{height}")]
    InvalidFilmSize { width: usize, height: usize },

    /// The sample budget is empty.
    #[error("sample budget must be positive")]
    InvalidBudget,

    /// The requested scene preset does not exist.
    #[error("unknown scene preset {0:?}")]
    UnknownScene(String),

    /// A worker panicked or a lock was poisoned.
    #[error("worker failure: {0}")]
    Worker(String),

    /// Writing the output image failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used across the renderer.
pub type Result<T> = std::result::Result<T, RenderError>;
