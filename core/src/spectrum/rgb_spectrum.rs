//! RGB Spectrum

use crate::pbrt::{clamp, Float};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Sub};

/// Luminance weights for linear RGB.
const Y_WEIGHT: [Float; 3] = [0.212671, 0.715160, 0.072169];

/// Spectral power distribution stored as linear RGB coefficients.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// Red, green and blue coefficients.
    c: [Float; 3],
}

impl RGBSpectrum {
    /// Creates a spectrum with all coefficients set to `v`.
    ///
    /// * `v` - Constant value.
    pub const fn new(v: Float) -> Self {
        Self { c: [v, v, v] }
    }

    /// Creates a spectrum from RGB coefficients.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub const fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns a black spectrum.
    pub const fn zero() -> Self {
        Self::new(0.0)
    }

    /// Returns a unit spectrum.
    pub const fn one() -> Self {
        Self::new(1.0)
    }

    /// Returns the RGB coefficients.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    /// Returns the luminance (y coefficient of CIE XYZ).
    pub fn y(&self) -> Float {
        Y_WEIGHT[0] * self.c[0] + Y_WEIGHT[1] * self.c[1] + Y_WEIGHT[2] * self.c[2]
    }

    /// Returns true if every coefficient is zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    /// Returns true if any coefficient is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }

    /// Returns the largest coefficient.
    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }

    /// Returns the spectrum with coefficients clamped to `[low, high]`.
    ///
    /// * `low`  - Low value.
    /// * `high` - High value.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        Self::from_rgb(
            clamp(self.c[0], low, high),
            clamp(self.c[1], low, high),
            clamp(self.c[2], low, high),
        )
    }

    /// Returns e^(-x) for each coefficient.
    pub fn exp_neg(&self) -> Self {
        Self::from_rgb((-self.c[0]).exp(), (-self.c[1]).exp(), (-self.c[2]).exp())
    }
}

impl From<Float> for RGBSpectrum {
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::from_rgb(self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2])
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::from_rgb(self.c[0] - other.c[0], self.c[1] - other.c[1], self.c[2] - other.c[2])
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::from_rgb(self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2])
    }
}

impl MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    fn mul(self, f: Float) -> Self {
        Self::from_rgb(self.c[0] * f, self.c[1] * f, self.c[2] * f)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    fn div(self, f: Float) -> Self {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        &self.c[i]
    }
}

impl fmt::Display for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn luminance_of_white_is_one() {
        assert!(approx_eq!(Float, RGBSpectrum::one().y(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn black_and_finite_checks() {
        assert!(RGBSpectrum::zero().is_black());
        assert!(!RGBSpectrum::from_rgb(0.0, 0.1, 0.0).is_black());
        assert!(RGBSpectrum::from_rgb(Float::NAN, 0.0, 0.0).has_nans());
        assert!(!RGBSpectrum::from_rgb(Float::INFINITY, 0.0, 0.0).is_finite());
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = RGBSpectrum::from_rgb(1.0, 2.0, 3.0);
        let b = RGBSpectrum::from_rgb(2.0, 2.0, 2.0);
        assert_eq!(a * b, RGBSpectrum::from_rgb(2.0, 4.0, 6.0));
        assert_eq!(a + b, RGBSpectrum::from_rgb(3.0, 4.0, 5.0));
        assert_eq!(a / 2.0, RGBSpectrum::from_rgb(0.5, 1.0, 1.5));
        assert_eq!(a.max_component_value(), 3.0);
    }
}
