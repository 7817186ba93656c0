//! Common geometry functions

use super::{Normal3f, Point3f, Vector3f};
use crate::pbrt::{clamp, gamma, next_float_down, next_float_up, Float};
use num_traits::{Num, Signed};

/// Dot product.
pub trait Dot<V> {
    /// Output type of the product.
    type Output;

    /// Returns the dot product with another vector or normal.
    ///
    /// * `other` - The other vector or normal.
    fn dot(&self, other: &V) -> Self::Output;
}

/// Returns the absolute value of the dot product.
///
/// * `v1` - The first vector.
/// * `v2` - The second vector.
#[inline(always)]
pub fn abs_dot<V1, V2, T>(v1: &V1, v2: &V2) -> T
where
    V1: Dot<V2, Output = T>,
    T: Num + Signed,
{
    v1.dot(v2).abs()
}

/// Returns the dot product of two vectors.
///
/// * `v1` - The first vector.
/// * `v2` - The second vector.
#[inline(always)]
pub fn dot<V1, V2, T>(v1: &V1, v2: &V2) -> T
where
    V1: Dot<V2, Output = T>,
{
    v1.dot(v2)
}

/// Flips `n` so it lies in the same hemisphere as `v`.
///
/// * `n` - The normal.
/// * `v` - The reference direction.
#[inline(always)]
pub fn face_forward(n: &Normal3f, v: &Vector3f) -> Normal3f {
    if n.dot(v) < 0.0 {
        -*n
    } else {
        *n
    }
}

/// Construct a local coordinate system given only a single 3D vector. The
/// input vector must be normalized.
///
/// * `v1` - The first axis.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Returns a direction from spherical coordinates in the standard frame.
///
/// * `sin_theta` - sin(θ).
/// * `cos_theta` - cos(θ).
/// * `phi`       - φ.
#[inline(always)]
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(
        clamp(sin_theta, -1.0, 1.0) * phi.cos(),
        clamp(sin_theta, -1.0, 1.0) * phi.sin(),
        clamp(cos_theta, -1.0, 1.0),
    )
}

/// Conservative floating point error bound for a point computed from values
/// of magnitude `p`.
///
/// * `p` - The computed point.
/// * `n` - Number of rounding operations involved.
pub fn error_bound(p: &Point3f, n: i32) -> Vector3f {
    Vector3f::from(p.abs()) * gamma(n)
}

/// Offsets a ray origin along the normal past its floating point error box so
/// the spawned ray does not re-intersect the surface it leaves.
///
/// * `p`       - The origin.
/// * `p_error` - Error bound of `p`.
/// * `n`       - Surface normal at `p`.
/// * `w`       - Direction of the spawned ray.
pub fn offset_ray_origin(p: &Point3f, p_error: &Vector3f, n: &Normal3f, w: &Vector3f) -> Point3f {
    let d = n.abs().dot(p_error);
    let mut offset = Vector3f::from(*n) * d;
    if w.dot(n) < 0.0 {
        offset = -offset;
    }

    let mut po = *p + offset;
    for i in 0..3 {
        if offset[i] > 0.0 {
            po[i] = next_float_up(po[i]);
        } else if offset[i] < 0.0 {
            po[i] = next_float_down(po[i]);
        }
    }
    po
}
