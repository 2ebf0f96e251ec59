//! Parallel

mod scheduler;

// Re-export.
pub use scheduler::*;
