//! Lights

#[macro_use]
extern crate log;

mod diffuse;
mod distant;
mod point;

// Re-export.
pub use diffuse::*;
pub use distant::*;
pub use point::*;
