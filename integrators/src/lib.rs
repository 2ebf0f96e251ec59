//! Integrators

#[macro_use]
extern crate log;

mod bdpt;

// Re-export.
pub use bdpt::*;
