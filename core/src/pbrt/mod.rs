//! Numeric basics shared by every crate

mod common;

// Re-export
pub use common::*;
