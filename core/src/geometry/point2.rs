//! 2-D Points

use super::Vector2;
use crate::pbrt::{Float, Int};
use num_traits::Num;
use std::ops::{Add, Index, Mul, Sub};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

/// 2-D point containing `Int` values.
pub type Point2i = Point2<Int>;

impl<T: Num + Copy> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D point at the origin.
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    /// Returns the component-wise minimum with another point.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: &Self) -> Self
    where
        T: PartialOrd,
    {
        let m = |a: T, b: T| if a < b { a } else { b };
        Self::new(m(self.x, other.x), m(self.y, other.y))
    }

    /// Returns the component-wise maximum with another point.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: &Self) -> Self
    where
        T: PartialOrd,
    {
        let m = |a: T, b: T| if a > b { a } else { b };
        Self::new(m(self.x, other.x), m(self.y, other.y))
    }
}

impl Point2f {
    /// Returns the point with each coordinate rounded down.
    pub fn floor(&self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Returns the point with each coordinate rounded up.
    pub fn ceil(&self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }
}

impl<T: Num> Add<Vector2<T>> for Point2<T> {
    type Output = Self;

    fn add(self, v: Vector2<T>) -> Self {
        Self {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }
}

impl<T: Num> Add for Point2<T> {
    type Output = Self;

    fn add(self, p: Self) -> Self {
        Self {
            x: self.x + p.x,
            y: self.y + p.y,
        }
    }
}

impl<T: Num> Sub for Point2<T> {
    type Output = Vector2<T>;

    fn sub(self, p: Self) -> Vector2<T> {
        Vector2 {
            x: self.x - p.x,
            y: self.y - p.y,
        }
    }
}

impl<T: Num> Sub<Vector2<T>> for Point2<T> {
    type Output = Self;

    fn sub(self, v: Vector2<T>) -> Self {
        Self {
            x: self.x - v.x,
            y: self.y - v.y,
        }
    }
}

impl<T: Num + Copy> Mul<T> for Point2<T> {
    type Output = Self;

    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f)
    }
}

impl Mul<Point2f> for Float {
    type Output = Point2f;

    fn mul(self, p: Point2f) -> Point2f {
        p * self
    }
}

impl<T> Index<usize> for Point2<T> {
    type Output = T;

    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Invalid index {i} for Point2"),
        }
    }
}

impl From<Point2i> for Point2f {
    fn from(p: Point2i) -> Self {
        Self::new(p.x as Float, p.y as Float)
    }
}

impl From<Point2f> for Point2i {
    fn from(p: Point2f) -> Self {
        Self::new(p.x as Int, p.y as Int)
    }
}
