//! Sampling

mod common;
mod discrete;

// Re-export
pub use common::*;
pub use discrete::*;
