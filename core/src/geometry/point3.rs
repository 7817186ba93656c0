//! 3-D Points

use super::{Vector3, Vector3f};
use crate::pbrt::{Float, Int};
use num_traits::{Num, Signed};
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub};

/// A 3-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D point containing `Float` values.
pub type Point3f = Point3<Float>;

/// 3-D point containing `Int` values.
pub type Point3i = Point3<Int>;

impl<T: Num + Copy> Point3<T> {
    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Returns a point at the origin.
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Returns a new point containing absolute values of the components.
    pub fn abs(&self) -> Self
    where
        T: Signed,
    {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns the squared distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance_squared(&self, p: &Self) -> T {
        (*self - *p).length_squared()
    }

    /// Returns the component-wise minimum with another point.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: &Self) -> Self
    where
        T: PartialOrd,
    {
        let m = |a: T, b: T| if a < b { a } else { b };
        Self::new(m(self.x, other.x), m(self.y, other.y), m(self.z, other.z))
    }

    /// Returns the component-wise maximum with another point.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: &Self) -> Self
    where
        T: PartialOrd,
    {
        let m = |a: T, b: T| if a > b { a } else { b };
        Self::new(m(self.x, other.x), m(self.y, other.y), m(self.z, other.z))
    }
}

impl Point3f {
    /// Returns the distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance(&self, p: &Self) -> Float {
        (*self - *p).length()
    }
}

impl<T: Num> Add<Vector3<T>> for Point3<T> {
    type Output = Self;

    fn add(self, v: Vector3<T>) -> Self {
        Self {
            x: self.x + v.x,
            y: self.y + v.y,
            z: self.z + v.z,
        }
    }
}

impl<T: Num> Add for Point3<T> {
    type Output = Self;

    /// Adds two points; only meaningful for weighted sums.
    fn add(self, p: Self) -> Self {
        Self {
            x: self.x + p.x,
            y: self.y + p.y,
            z: self.z + p.z,
        }
    }
}

impl<T: Num + Copy> AddAssign<Vector3<T>> for Point3<T> {
    fn add_assign(&mut self, v: Vector3<T>) {
        *self = *self + v;
    }
}

impl<T: Num> Sub for Point3<T> {
    type Output = Vector3<T>;

    fn sub(self, p: Self) -> Vector3<T> {
        Vector3 {
            x: self.x - p.x,
            y: self.y - p.y,
            z: self.z - p.z,
        }
    }
}

impl<T: Num> Sub<Vector3<T>> for Point3<T> {
    type Output = Self;

    fn sub(self, v: Vector3<T>) -> Self {
        Self {
            x: self.x - v.x,
            y: self.y - v.y,
            z: self.z - v.z,
        }
    }
}

impl<T: Num + Copy> Mul<T> for Point3<T> {
    type Output = Self;

    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Mul<Point3f> for Float {
    type Output = Point3f;

    fn mul(self, p: Point3f) -> Point3f {
        p * self
    }
}

impl<T> Index<usize> for Point3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Invalid index {i} for Point3"),
        }
    }
}

impl<T> IndexMut<usize> for Point3<T> {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Invalid index {i} for Point3"),
        }
    }
}

impl<T> From<Vector3<T>> for Point3<T> {
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Point3f> for [Float; 3] {
    fn from(p: Point3f) -> Self {
        [p.x, p.y, p.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_difference_is_vector() {
        let p1 = Point3f::new(1.0, 2.0, 3.0);
        let p2 = Point3f::new(0.0, 2.0, 7.0);
        assert_eq!(p1 - p2, Vector3f::new(1.0, 0.0, -4.0));
        assert_eq!(p2 + (p1 - p2), p1);
        assert_eq!(p1.distance_squared(&p2), 17.0);
    }
}
