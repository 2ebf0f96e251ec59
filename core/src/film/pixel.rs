//! Film Pixel

use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// RGB pixel shared by all workers. Each channel holds the bits of a `Float`
/// and is updated with a compare and swap loop, so concurrent splats never
/// lose a contribution.
#[derive(Default)]
pub(super) struct Pixel {
    /// Bit patterns of the red, green and blue channels.
    rgb: [AtomicU32; RGB_SAMPLES],
}

impl Pixel {
    /// Adds a contribution to every channel.
    ///
    /// * `v` - The contribution.
    pub fn add(&self, v: &Spectrum) {
        for (bits, value) in self.rgb.iter().zip(v.to_rgb()) {
            if value == 0.0 {
                continue;
            }
            let mut old = bits.load(Ordering::Relaxed);
            while let Err(current) = bits.compare_exchange_weak(
                old,
                float_to_bits(bits_to_float(old) + value),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                old = current;
            }
        }
    }

    /// Multiplies every channel by a scale factor. Only called while no
    /// worker is splatting.
    ///
    /// * `s` - Scale factor.
    pub fn scale(&self, s: Float) {
        for bits in self.rgb.iter() {
            let v = bits_to_float(bits.load(Ordering::Acquire)) * s;
            bits.store(float_to_bits(v), Ordering::Release);
        }
    }

    /// Sets every channel to zero.
    pub fn reset(&self) {
        for bits in self.rgb.iter() {
            bits.store(float_to_bits(0.0), Ordering::Release);
        }
    }

    /// Returns the accumulated value.
    pub fn value(&self) -> Spectrum {
        let c = |i: usize| bits_to_float(self.rgb[i].load(Ordering::Acquire));
        Spectrum::from_rgb(c(0), c(1), c(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn new_pixel_is_black() {
        assert!(Pixel::default().value().is_black());
    }

    #[test]
    fn channels_accumulate_independently() {
        let pixel = Pixel::default();
        pixel.add(&Spectrum::from_rgb(1.0, 2.0, 0.0));
        pixel.add(&Spectrum::from_rgb(0.5, 0.0, 4.0));
        let v = pixel.value();
        assert!(approx_eq!(Float, v[0], 1.5, epsilon = 1e-6));
        assert!(approx_eq!(Float, v[1], 2.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, v[2], 4.0, epsilon = 1e-6));

        pixel.scale(0.5);
        assert!(approx_eq!(Float, pixel.value()[2], 2.0, epsilon = 1e-6));

        pixel.reset();
        assert!(pixel.value().is_black());
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let pixel = Pixel::default();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..500 {
                        pixel.add(&Spectrum::new(0.5));
                    }
                });
            }
        });
        assert!(approx_eq!(Float, pixel.value()[0], 2000.0, epsilon = 1e-3));
    }
}
