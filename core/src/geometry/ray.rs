//! Rays

use super::{Point3f, Vector3f};
use crate::pbrt::{Float, INFINITY};

/// A semi-infinite line.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,
}

impl Ray {
    /// Returns a new ray.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_max` - Maximum extent of the ray.
    /// * `time`  - Time value.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float) -> Self {
        Self { o, d, t_max, time }
    }

    /// Returns an unbounded ray at time 0.
    ///
    /// * `o` - Origin.
    /// * `d` - Direction.
    pub fn unbounded(o: Point3f, d: Vector3f) -> Self {
        Self::new(o, d, INFINITY, 0.0)
    }

    /// Returns the point at a given parameter along the ray.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns true if origin or direction has NaN components.
    pub fn has_nans(&self) -> bool {
        self.o.x.is_nan() || self.o.y.is_nan() || self.o.z.is_nan() || self.d.has_nans() || self.t_max.is_nan()
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::unbounded(Point3f::default(), Vector3f::default())
    }
}
