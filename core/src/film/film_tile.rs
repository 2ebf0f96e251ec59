//! Film Tile

use super::raster_to_pixel;
use crate::geometry::*;
use crate::spectrum::*;

/// A private full-raster accumulation buffer owned by a single worker.
#[derive(Clone)]
pub struct FilmTile {
    /// Image width.
    width: usize,

    /// Image height.
    height: usize,

    /// Accumulated pixel contributions.
    pixels: Vec<Spectrum>,

    /// Number of splats accepted.
    splats: u64,
}

impl FilmTile {
    /// Create a new `FilmTile`.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Spectrum::ZERO; width * height],
            splats: 0,
        }
    }

    /// Add a splat contribution. Invalid values are dropped with a warning.
    ///
    /// * `rp` - Raster position in [0, 1]^2.
    /// * `v`  - The contribution.
    pub fn add_splat(&mut self, rp: &Point2f, v: &Spectrum) {
        if !v.is_valid_radiance() {
            warn!("Ignoring splat with invalid value {:?} at ({}, {})", v.to_rgb(), rp.x, rp.y);
            return;
        }

        if let Some(index) = raster_to_pixel(rp, self.width, self.height) {
            self.pixels[index] += *v;
            self.splats += 1;
        }
    }

    /// Returns the accumulated pixels.
    pub fn pixels(&self) -> &[Spectrum] {
        &self.pixels
    }

    /// Returns the number of splats accepted.
    pub fn splat_count(&self) -> u64 {
        self.splats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbrt::*;

    #[test]
    fn invalid_splats_are_dropped() {
        let mut tile = FilmTile::new(1, 1);
        tile.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(Float::NAN));
        tile.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(-1.0));
        tile.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(INFINITY));
        assert_eq!(tile.splat_count(), 0);
        assert!(tile.pixels()[0].is_black());

        tile.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(1.0));
        assert_eq!(tile.splat_count(), 1);
    }
}
