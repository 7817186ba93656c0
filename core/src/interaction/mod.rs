//! Interactions

use crate::geometry::*;
use crate::pbrt::*;

mod surface_interaction;

pub use surface_interaction::*;

/// Hit provides the data shared by surface interactions and points sampled on
/// light sources.
#[derive(Copy, Clone, Debug, Default)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Time when interaction occurred.
    pub time: Float,

    /// Floating point error for ray intersection points.
    pub p_error: Vector3f,

    /// The negative ray direction. Zero for sampled points.
    pub wo: Vector3f,

    /// Surface normal at the point `p`.
    pub n: Normal3f,
}

impl Hit {
    /// Create a new hit.
    ///
    /// * `p`       - Point of interaction.
    /// * `time`    - Time when interaction occurred.
    /// * `p_error` - Floating point error for ray intersection points.
    /// * `wo`      - The negative ray direction; must be normalized or zero.
    /// * `n`       - Surface normal at the point `p`.
    pub fn new(p: Point3f, time: Float, p_error: Vector3f, wo: Vector3f, n: Normal3f) -> Self {
        Self {
            p,
            time,
            p_error,
            wo,
            n,
        }
    }

    /// Create a hit from a point and time only.
    ///
    /// * `p`    - Point of interaction.
    /// * `time` - Time when interaction occurred.
    pub fn new_minimal(p: Point3f, time: Float) -> Self {
        Self {
            p,
            time,
            ..Self::default()
        }
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let origin = offset_ray_origin(&self.p, &self.p_error, &self.n, d);
        Ray::new(origin, *d, INFINITY, self.time)
    }

    /// Spawn's a new ray towards another point. The ray stops just short of
    /// the target.
    ///
    /// * `p` - The target point.
    pub fn spawn_ray_to_point(&self, p: &Point3f) -> Ray {
        let d = *p - self.p;
        let origin = offset_ray_origin(&self.p, &self.p_error, &self.n, &d);
        Ray::new(origin, *p - origin, 1.0 - SHADOW_EPSILON, self.time)
    }

    /// Spawn's a new ray towards another interaction, offsetting both ends.
    ///
    /// * `hit` - The interaction.
    pub fn spawn_ray_to_hit(&self, hit: &Hit) -> Ray {
        let origin = offset_ray_origin(&self.p, &self.p_error, &self.n, &(hit.p - self.p));
        let target = offset_ray_origin(&hit.p, &hit.p_error, &hit.n, &(origin - hit.p));
        Ray::new(origin, target - origin, 1.0 - SHADOW_EPSILON, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_ray_leaves_surface_on_normal_side() {
        let hit = Hit::new(
            Point3f::new(0.0, 0.0, 1.0),
            0.5,
            Vector3f::new(1e-4, 1e-4, 1e-4),
            Vector3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, 1.0),
        );
        let up = hit.spawn_ray(&Vector3f::new(0.0, 0.0, 1.0));
        assert!(up.o.z > 1.0);
        assert_eq!(up.time, 0.5);

        let down = hit.spawn_ray(&Vector3f::new(0.0, 0.0, -1.0));
        assert!(down.o.z < 1.0);
    }

    #[test]
    fn ray_to_point_stops_short() {
        let hit = Hit::new_minimal(Point3f::zero(), 0.0);
        let ray = hit.spawn_ray_to_point(&Point3f::new(0.0, 2.0, 0.0));
        let end = ray.at(ray.t_max);
        assert!(end.y < 2.0 && end.y > 1.99);
    }
}
