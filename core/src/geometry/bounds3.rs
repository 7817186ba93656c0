//! 3-D Axis Aligned Bounding Boxes

use super::{Point3, Point3f};
use crate::pbrt::Float;
use num_traits::Num;

/// 3-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T> {
    /// Minimum bounds.
    pub p_min: Point3<T>,

    /// Maximum bounds.
    pub p_max: Point3<T>,
}

/// 3-D bounding box containing `Float` points.
pub type Bounds3f = Bounds3<Float>;

impl<T: Num + PartialOrd + Copy> Bounds3<T> {
    /// Creates a new 3-D bounding box from 2 points.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3<T>, p2: Point3<T>) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns the union of two boxes.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }
}

impl Bounds3f {
    /// Returns an empty box that any union will replace.
    pub fn empty() -> Self {
        Self {
            p_min: Point3f::new(Float::MAX, Float::MAX, Float::MAX),
            p_max: Point3f::new(Float::MIN, Float::MIN, Float::MIN),
        }
    }

    /// Returns true if the box is degenerate.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Returns the center and radius of a sphere that bounds the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        if self.is_empty() {
            return (Point3f::zero(), 0.0);
        }
        let center = (self.p_min + self.p_max) * 0.5;
        (center, center.distance(&self.p_max))
    }
}

impl Default for Bounds3f {
    fn default() -> Self {
        Self::empty()
    }
}
