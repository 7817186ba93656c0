//! 3-D Normals

use super::{Dot, Vector3};
use crate::pbrt::Float;
use num_traits::{Num, Signed};
use std::ops::{Add, Mul, Neg};

/// A 3-D normal containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D normal containing `Float` values.
pub type Normal3f = Normal3<Float>;

impl<T: Num + Copy> Normal3<T> {
    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Returns a new normal containing absolute values of the components.
    pub fn abs(&self) -> Self
    where
        T: Signed,
    {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns the square of the normal's length.
    pub fn length_squared(&self) -> T {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

impl Normal3f {
    /// Returns the unit normal.
    pub fn normalize(&self) -> Self {
        let inv = 1.0 / self.length_squared().sqrt();
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl<T: Num + Copy> Dot<Vector3<T>> for Normal3<T> {
    type Output = T;

    fn dot(&self, v: &Vector3<T>) -> T {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}

impl<T: Num + Copy> Dot<Normal3<T>> for Normal3<T> {
    type Output = T;

    fn dot(&self, n: &Normal3<T>) -> T {
        self.x * n.x + self.y * n.y + self.z * n.z
    }
}

impl<T: Num> Add for Normal3<T> {
    type Output = Self;

    fn add(self, n: Self) -> Self {
        Self {
            x: self.x + n.x,
            y: self.y + n.y,
            z: self.z + n.z,
        }
    }
}

impl<T: Num + Copy> Mul<T> for Normal3<T> {
    type Output = Self;

    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl<T: Num + Neg<Output = T>> Neg for Normal3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T> From<Vector3<T>> for Normal3<T> {
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}
