//! Materials

#[macro_use]
extern crate log;

mod diffuse;
mod mirror;
mod mixture;

// Re-export
pub use diffuse::*;
pub use mirror::*;
pub use mixture::*;
