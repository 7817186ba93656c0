//! Common

use num_traits::Num;
use std::ops::{Add, Mul};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/π
pub const INV_PI: Float = 1.0 / PI;

/// π/2
pub const PI_OVER_TWO: Float = PI * 0.5;

/// π/4
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2π
pub const TWO_PI: Float = PI * 2.0;

/// 1/(4π)
pub const INV_FOUR_PI: Float = 1.0 / (4.0 * PI);

/// Largest representable value strictly less than 1.
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");

/// Machine epsilon for bounding floating point error.
pub const MACHINE_EPSILON: Float = std::f32::EPSILON * 0.5;

/// Used to keep shadow rays from hitting the light they are aimed at.
pub const SHADOW_EPSILON: Float = 0.0001;

/// √2
pub const SQRT2: Float = std::f32::consts::SQRT_2;

/// Clamp the given value `val` to lie between the values `low` and `high`.
///
/// * `val`  - The value to clamp.
/// * `low`  - Low value.
/// * `high` - High value.
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

/// Returns the smaller of two values; for floats returns `b` if either is NaN.
#[inline(always)]
pub fn min<T: Num + PartialOrd + Copy>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the larger of two values; for floats returns `b` if either is NaN.
#[inline(always)]
pub fn max<T: Num + PartialOrd + Copy>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

/// Returns the error bound for adding n terms.
///
/// * `n` - Number of terms
#[inline(always)]
pub fn gamma(n: Int) -> Float {
    (n as Float * MACHINE_EPSILON) / (1.0 - n as Float * MACHINE_EPSILON)
}

/// Returns gamma corrected values for use in 8-bit images.
///
/// * `value` - Value to correct.
#[inline(always)]
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
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

/// Bump a floating point value up to the next greater representable floating
/// point value.
///
/// * `v` - Floating point value.
pub fn next_float_up(v: Float) -> Float {
    if v.is_infinite() && v > 0.0 {
        return v;
    }

    // Treat -0 as +0 so the bit pattern advances in the right direction.
    let nv = if v == -0.0 { 0.0 } else { v };
    let bits = nv.to_bits();
    let bits = if nv >= 0.0 { bits + 1 } else { bits - 1 };
    Float::from_bits(bits)
}

/// Bump a floating point value down to the next lower representable floating
/// point value.
///
/// * `v` - Floating point value.
pub fn next_float_down(v: Float) -> Float {
    if v.is_infinite() && v < 0.0 {
        return v;
    }

    let nv = if v == 0.0 { -0.0 } else { v };
    let bits = nv.to_bits();
    let bits = if nv > 0.0 { bits - 1 } else { bits + 1 };
    Float::from_bits(bits)
}

/// Bisects a procedurally defined monotonic array and returns the index `i`
/// such that `pred(i)` is true and `pred(i + 1)` is false, clamped to
/// `[0, size - 2]`.
///
/// * `size` - Size of array.
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first as isize - 1, 0, size as isize - 2) as usize
}

/// Returns the inverse of the error function for a given floating point value.
///
/// * `x` - The floating point value.
#[inline(always)]
pub fn erf_inv(x: Float) -> Float {
    let x = clamp(x, -0.99999, 0.99999);
    let mut w = -((1.0 - x) * (1.0 + x)).ln();
    if w < 5.0 {
        w -= 2.5;

        let mut p = 2.81022636e-08;
        p = 3.43273939e-07 + p * w;
        p = -3.5233877e-06 + p * w;
        p = -4.39150654e-06 + p * w;
        p = 0.00021858087 + p * w;
        p = -0.00125372503 + p * w;
        p = -0.00417768164 + p * w;
        p = 0.246640727 + p * w;
        p = 1.50140941 + p * w;
        p * x
    } else {
        w = w.sqrt() - 3.0;

        let mut p = -0.000200214257;
        p = 0.000100950558 + p * w;
        p = 0.00134934322 + p * w;
        p = -0.00367342844 + p * w;
        p = 0.00573950773 + p * w;
        p = -0.0076224613 + p * w;
        p = 0.00943887047 + p * w;
        p = 1.00167406 + p * w;
        p = 2.83297682 + p * w;
        p * x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn one_minus_epsilon_is_below_one() {
        assert!(ONE_MINUS_EPSILON < 1.0);
        assert_eq!(next_float_up(ONE_MINUS_EPSILON), 1.0);
    }

    #[test]
    fn find_interval_clamps_to_valid_range() {
        let values = [0.0, 0.25, 0.5, 1.0];
        assert_eq!(find_interval(values.len(), |i| values[i] <= -1.0), 0);
        assert_eq!(find_interval(values.len(), |i| values[i] <= 0.3), 1);
        assert_eq!(find_interval(values.len(), |i| values[i] <= 2.0), 2);
    }

    #[test]
    fn erf_inv_is_odd() {
        assert!(approx_eq!(Float, erf_inv(0.0), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, erf_inv(0.5), -erf_inv(-0.5), epsilon = 1e-6));
        assert!(approx_eq!(Float, erf_inv(0.5), 0.4769363, epsilon = 1e-4));
    }

    proptest! {
        #[test]
        fn next_float_brackets_value(v in -1e6f32..1e6f32) {
            prop_assert!(next_float_up(v) > v);
            prop_assert!(next_float_down(v) < v);
        }

        #[test]
        fn clamp_stays_in_range(v in -10.0f32..10.0f32) {
            let c = clamp(v, -1.0, 1.0);
            prop_assert!((-1.0..=1.0).contains(&c));
        }
    }
}
