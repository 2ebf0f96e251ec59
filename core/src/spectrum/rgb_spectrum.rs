//! RGB Spectrum

use crate::pbrt::*;
use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign};

/// Number of RGB samples.
pub const RGB_SAMPLES: usize = 3;

/// Stores a spectrum as linear RGB coefficients.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// The RGB coefficients.
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// The black spectrum.
    pub const ZERO: Self = Self { c: [0.0; RGB_SAMPLES] };

    /// The unit spectrum.
    pub const ONE: Self = Self { c: [1.0; RGB_SAMPLES] };

    /// Returns a spectrum with every coefficient set to the same value.
    ///
    /// * `v` - Value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Returns a spectrum from RGB values.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the RGB coefficients.
    pub fn to_rgb(&self) -> [Float; RGB_SAMPLES] {
        self.c
    }

    /// Returns true if every coefficient is exactly zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    /// Returns true if any coefficient is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if every coefficient is finite and not negative.
    pub fn is_valid_radiance(&self) -> bool {
        self.c.iter().all(|&v| v.is_finite() && v >= 0.0)
    }

    /// Returns the largest coefficient.
    pub fn max_component_value(&self) -> Float {
        self.c.iter().fold(-INFINITY, |m, &v| max(m, v))
    }

    /// Returns the luminance.
    pub fn y(&self) -> Float {
        0.212671 * self.c[0] + 0.715160 * self.c[1] + 0.072169 * self.c[2]
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    /// Adds two spectra.
    ///
    /// * `other` - The spectrum to add.
    fn add(self, other: Self) -> Self::Output {
        Self::from_rgb(self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2])
    }
}

impl AddAssign for RGBSpectrum {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The spectrum to add.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    /// Multiplies two spectra component wise.
    ///
    /// * `other` - The other spectrum.
    fn mul(self, other: Self) -> Self::Output {
        Self::from_rgb(self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2])
    }
}

impl MulAssign for RGBSpectrum {
    /// Performs the component wise `*=` operation.
    ///
    /// * `other` - The other spectrum.
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the spectrum.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self::Output {
        Self::from_rgb(self.c[0] * f, self.c[1] * f, self.c[2] * f)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scales the spectrum.
    ///
    /// * `s` - The spectrum.
    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    /// Scales the spectrum in place.
    ///
    /// * `f` - The scaling factor.
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the spectrum by 1/f.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        self * (1.0 / f)
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    /// Returns the coefficient at the given index.
    ///
    /// * `i` - Index.
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::Spectrum;
    use proptest::prelude::*;

    #[test]
    fn black_and_valid() {
        assert!(Spectrum::ZERO.is_black());
        assert!(!Spectrum::ONE.is_black());
        assert!(Spectrum::ONE.is_valid_radiance());
        assert!(!Spectrum::new(-1.0).is_valid_radiance());
        assert!(!Spectrum::new(INFINITY).is_valid_radiance());
        assert!(Spectrum::new(Float::NAN).has_nans());
    }

    proptest! {
        #[test]
        fn component_wise_ops(
            r in 0.0..10.0f32, g in 0.0..10.0f32, b in 0.0..10.0f32, f in 0.1..10.0f32
        ) {
            let s = Spectrum::from_rgb(r, g, b);
            prop_assert_eq!((s * f).to_rgb(), [r * f, g * f, b * f]);
            prop_assert_eq!((s * s).to_rgb(), [r * r, g * g, b * b]);
            prop_assert_eq!((s + s).to_rgb(), [r + r, g + g, b + b]);
            prop_assert_eq!(s.max_component_value(), r.max(g).max(b));
        }
    }
}
