//! Film

use crate::error::*;
use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use image::{ImageBuffer, Rgb};
use std::sync::Arc;

mod film_tile;
mod pixel;

// Re-export.
pub use film_tile::*;

use pixel::Pixel;

/// Image accumulator that receives splats from all workers.
pub trait Film: Send + Sync {
    /// Returns the image size in pixels as (width, height).
    fn size(&self) -> (usize, usize);

    /// Adds a contribution to a pixel.
    ///
    /// * `index` - Pixel index in row-major order, row 0 at the top.
    /// * `v`     - The contribution.
    fn add_pixel(&self, index: usize, v: &Spectrum);

    /// Multiplies all pixels by a scale factor.
    ///
    /// * `s` - Scale factor.
    fn rescale(&self, s: Float);

    /// Resets all pixels to zero.
    fn clear(&self);

    /// Returns a copy of the pixel values in row-major order.
    fn pixels(&self) -> Vec<Spectrum>;

    /// Adds a contribution at a raster position in [0, 1]^2.
    ///
    /// * `rp` - Raster position.
    /// * `v`  - The contribution.
    fn splat(&self, rp: &Point2f, v: &Spectrum) {
        let (width, height) = self.size();
        if let Some(index) = raster_to_pixel(rp, width, height) {
            self.add_pixel(index, v);
        }
    }

    /// Merges a `FilmTile` into the image.
    ///
    /// * `tile` - The tile.
    fn merge_tile(&self, tile: &FilmTile) {
        for (index, v) in tile.pixels().iter().enumerate() {
            if !v.is_black() {
                self.add_pixel(index, v);
            }
        }
    }
}

/// Atomic reference counted `Film`.
pub type ArcFilm = Arc<dyn Film>;

/// Maps a raster position to a pixel index. The raster y axis points up while
/// pixel row 0 is the top row.
///
/// * `rp`     - Raster position.
/// * `width`  - Image width.
/// * `height` - Image height.
pub fn raster_to_pixel(rp: &Point2f, width: usize, height: usize) -> Option<usize> {
    if !(0.0..=1.0).contains(&rp.x) || !(0.0..=1.0).contains(&rp.y) || width == 0 || height == 0 {
        return None;
    }
    let x = ((rp.x * width as Float) as usize).min(width - 1);
    let y = (((1.0 - rp.y) * height as Float) as usize).min(height - 1);
    Some(y * width + x)
}

/// A film storing RGB pixels that allows lock free concurrent splats.
pub struct BitmapFilm {
    /// Image width.
    width: usize,

    /// Image height.
    height: usize,

    /// Stores the image pixels.
    pixels: Vec<Pixel>,
}

impl BitmapFilm {
    /// Create a new `BitmapFilm`.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidFilmSize { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: (0..width * height).map(|_| Pixel::default()).collect(),
        })
    }

    /// Write the image to an 8-bit output file. The format is chosen from the
    /// file extension.
    ///
    /// * `path` - Output file path.
    pub fn save(&self, path: &str) -> Result<()> {
        write_image(self, path)
    }
}

impl Film for BitmapFilm {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn add_pixel(&self, index: usize, v: &Spectrum) {
        if let Some(pixel) = self.pixels.get(index) {
            pixel.add(v);
        }
    }

    fn rescale(&self, s: Float) {
        self.pixels.iter().for_each(|p| p.scale(s));
    }

    fn clear(&self) {
        self.pixels.iter().for_each(Pixel::reset);
    }

    fn pixels(&self) -> Vec<Spectrum> {
        self.pixels.iter().map(Pixel::value).collect()
    }
}

/// Writes the film to an 8-bit image file.
///
/// * `film` - The film.
/// * `path` - Output file path.
pub fn write_image(film: &dyn Film, path: &str) -> Result<()> {
    let (width, height) = film.size();
    info!("Writing image {path} with resolution {width}x{height}");

    let pixels = film.pixels();
    let imgbuf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let rgb = pixels[y as usize * width + x as usize].to_rgb();
        Rgb([clamp_byte(rgb[0]), clamp_byte(rgb[1]), clamp_byte(rgb[2])])
    });
    imgbuf.save(path)?;
    Ok(())
}

/// Clamp floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn raster_corners_map_to_image_corners() {
        assert_eq!(raster_to_pixel(&Point2f::new(0.0, 0.999), 4, 2), Some(0));
        assert_eq!(raster_to_pixel(&Point2f::new(0.999, 0.0), 4, 2), Some(7));
        assert_eq!(raster_to_pixel(&Point2f::new(0.0, 0.0), 4, 2), Some(4));
        assert_eq!(raster_to_pixel(&Point2f::new(1.5, 0.5), 4, 2), None);
        assert_eq!(raster_to_pixel(&Point2f::new(0.5, -0.1), 4, 2), None);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            BitmapFilm::new(0, 4),
            Err(RenderError::InvalidFilmSize { width: 0, height: 4 })
        ));
    }

    #[test]
    fn splat_rescale_clear() {
        let film = BitmapFilm::new(2, 2).unwrap();
        film.splat(&Point2f::new(0.25, 0.75), &Spectrum::new(2.0));
        film.splat(&Point2f::new(0.25, 0.75), &Spectrum::new(1.0));
        film.rescale(0.5);

        let pixels = film.pixels();
        assert!(approx_eq!(Float, pixels[0][0], 1.5, epsilon = 1e-6));
        assert!(pixels[1].is_black() && pixels[2].is_black() && pixels[3].is_black());

        film.clear();
        assert!(film.pixels().iter().all(|p| p.is_black()));
    }

    #[test]
    fn concurrent_splats_are_not_lost() {
        let film = BitmapFilm::new(1, 1).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        film.splat(&Point2f::new(0.5, 0.5), &Spectrum::new(1.0));
                    }
                });
            }
        });
        assert!(approx_eq!(Float, film.pixels()[0][1], 4000.0, epsilon = 1e-3));
    }

    #[test]
    fn merge_tile_adds_pixels() {
        let film = BitmapFilm::new(2, 1).unwrap();
        let mut tile = FilmTile::new(2, 1);
        tile.add_splat(&Point2f::new(0.75, 0.5), &Spectrum::new(3.0));
        film.merge_tile(&tile);
        film.merge_tile(&tile);
        let pixels = film.pixels();
        assert!(pixels[0].is_black());
        assert!(approx_eq!(Float, pixels[1][2], 6.0, epsilon = 1e-6));
    }
}
