//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod film;
pub mod geometry;
pub mod interaction;
pub mod light;
pub mod material;
pub mod medium;
pub mod parallel;
pub mod pbrt;
pub mod rng;
pub mod sampling;
pub mod scene;
pub mod shape;
pub mod spectrum;
