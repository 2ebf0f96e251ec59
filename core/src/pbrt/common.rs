//! Common

use num_traits::Num;
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// Offset applied to ray origins and shadow ray extents to avoid
/// self-intersection.
pub const SHADOW_EPSILON: Float = 0.0001;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Clamps a value to the closed interval [low, high].
///
/// * `val`  - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t`  - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Returns the sRGB gamma corrected value of a linear value.
///
/// * `value` - The value.
#[inline(always)]
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Returns `num / den`, or zero when `den` is zero.
///
/// * `num` - Numerator.
/// * `den` - Denominator.
#[inline(always)]
pub fn safe_ratio(num: Float, den: Float) -> Float {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Convert a 32-bit floating point value to its constituent bits and return
/// the representation as 32-bit unsigned integer.
///
/// * `f` - The 32-bit floating point number.
#[inline(always)]
pub fn float_to_bits(f: f32) -> u32 {
    f.to_bits()
}

/// Convert the bits of a 32-bit unsigned interger value and return the
/// representation as a 32-bit floating point value.
///
/// * `i` - The 32-bit unsigned interger.
#[inline(always)]
pub fn bits_to_float(i: u32) -> f32 {
    f32::from_bits(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(1.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
    }

    #[test]
    fn gamma_correct_endpoints() {
        assert_eq!(gamma_correct(0.0), 0.0);
        assert!(approx_eq!(f32, gamma_correct(1.0), 1.0, epsilon = 0.00001));
    }

    proptest! {
        #[test]
        fn float_bits_round_trip(f in -1000.0..1000.0f32) {
            prop_assert_eq!(bits_to_float(float_to_bits(f)), f);
        }

        #[test]
        fn lerp_endpoints(a in -100.0..100.0f32, b in -100.0..100.0f32) {
            prop_assert_eq!(lerp(0.0, a, b), a);
            prop_assert!(approx_eq!(f32, lerp(1.0, a, b), b, epsilon = 0.0001));
        }

        #[test]
        fn min_max_abs(a in -100..100i32, b in -100..100i32) {
            prop_assert_eq!(min(a, b), a.min(b));
            prop_assert_eq!(max(a, b), a.max(b));
            prop_assert_eq!(abs(a), a.abs());
        }
    }
}
