//! 2-D Axis Aligned Bounding Boxes

use super::{Point2, Point2f, Point2i, Vector2};
use crate::pbrt::{lerp, Float, Int};
use num_traits::Num;

/// 2-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds2<T> {
    /// Minimum bounds.
    pub p_min: Point2<T>,

    /// Maximum bounds.
    pub p_max: Point2<T>,
}

/// 2-D bounding box containing `Float` points.
pub type Bounds2f = Bounds2<Float>;

/// 2-D bounding box containing `Int` points.
pub type Bounds2i = Bounds2<Int>;

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns the vector from `p_min` to `p_max`.
    pub fn diagonal(&self) -> Vector2<T> {
        self.p_max - self.p_min
    }

    /// Returns the area of the box.
    pub fn area(&self) -> T {
        let d = self.diagonal();
        d.x * d.y
    }

    /// Returns true if the point lies inside the box, excluding the upper
    /// boundary.
    ///
    /// * `p` - The point.
    pub fn contains_exclusive(&self, p: &Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }

    /// Returns the intersection of two boxes.
    ///
    /// * `other` - The other box.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.max(&other.p_min),
            p_max: self.p_max.min(&other.p_max),
        }
    }
}

impl Bounds2f {
    /// Linearly interpolates between the corners of the box by the given
    /// amount in each dimension.
    ///
    /// * `t` - Interpolation parameter in each dimension.
    pub fn lerp(&self, t: &Point2f) -> Point2f {
        Point2f::new(
            lerp(t.x, self.p_min.x, self.p_max.x),
            lerp(t.y, self.p_min.y, self.p_max.y),
        )
    }
}

impl Bounds2i {
    /// Returns an iterator over the integer points inside the box in
    /// scanline order.
    pub fn iter(&self) -> Bounds2iIterator {
        Bounds2iIterator {
            bounds: *self,
            p: self.p_min,
        }
    }
}

/// Iterates over the pixels of a `Bounds2i`.
pub struct Bounds2iIterator {
    /// The bounds being traversed.
    bounds: Bounds2i,

    /// The next point.
    p: Point2i,
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    fn next(&mut self) -> Option<Point2i> {
        if self.bounds.p_min.x >= self.bounds.p_max.x || self.p.y >= self.bounds.p_max.y {
            return None;
        }

        let p = self.p;
        self.p.x += 1;
        if self.p.x == self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        Some(p)
    }
}

impl From<Bounds2i> for Bounds2f {
    fn from(b: Bounds2i) -> Self {
        Self {
            p_min: Point2f::from(b.p_min),
            p_max: Point2f::from(b.p_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_all_pixels_in_scanline_order() {
        let b = Bounds2i::new(Point2i::new(1, 2), Point2i::new(3, 4));
        let pixels: Vec<Point2i> = b.iter().collect();
        assert_eq!(
            pixels,
            vec![
                Point2i::new(1, 2),
                Point2i::new(2, 2),
                Point2i::new(1, 3),
                Point2i::new(2, 3)
            ]
        );
        assert_eq!(b.area(), 4);
    }

    #[test]
    fn empty_bounds_yield_nothing() {
        let b = Bounds2i::new(Point2i::new(1, 2), Point2i::new(1, 4));
        assert_eq!(b.iter().count(), 0);
    }

    #[test]
    fn lerp_maps_unit_square() {
        let b = Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(4.0, 2.0));
        assert_eq!(b.lerp(&Point2f::new(0.5, 0.5)), Point2f::new(2.0, 1.0));
    }
}
