//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Radiance, importance and throughput values are carried as RGB triples.
pub type Spectrum = RGBSpectrum;
