//! Spheres

use core::geometry::*;
use core::interaction::*;
use core::paramset::*;
use core::pbrt::*;
use core::sampling::*;

/// A full sphere in world space.
#[derive(Clone, Debug)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3f,

    /// Radius of sphere.
    pub radius: Float,

    /// Indicates whether surface normals point inwards.
    pub reverse_orientation: bool,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center`              - Center of the sphere.
    /// * `radius`              - Radius of sphere.
    /// * `reverse_orientation` - Indicates whether surface normals point
    ///                           inwards.
    pub fn new(center: Point3f, radius: Float, reverse_orientation: bool) -> Self {
        let radius = if radius > 0.0 {
            radius
        } else {
            warn!("Sphere radius {} is not positive. Using 1.", radius);
            1.0
        };
        Self {
            center,
            radius,
            reverse_orientation,
        }
    }

    /// Returns the nearest ray parameter in `(0, t_max]` where the ray meets the
    /// sphere.
    ///
    /// * `r` - The ray.
    fn hit_t(&self, r: &Ray) -> Option<Float> {
        // Solve the quadratic in double precision about the sphere center.
        let o = r.o - self.center;
        let (ox, oy, oz) = (o.x as f64, o.y as f64, o.z as f64);
        let (dx, dy, dz) = (r.d.x as f64, r.d.y as f64, r.d.z as f64);
        let radius = self.radius as f64;

        let a = dx * dx + dy * dy + dz * dz;
        let b = 2.0 * (dx * ox + dy * oy + dz * oz);
        let c = ox * ox + oy * oy + oz * oz - radius * radius;

        let discrim = b * b - 4.0 * a * c;
        if a == 0.0 || discrim < 0.0 {
            return None;
        }
        let root = discrim.sqrt();
        let q = if b < 0.0 { -0.5 * (b - root) } else { -0.5 * (b + root) };
        let (mut t0, mut t1) = (q / a, c / q);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        // Reject hits too close to the origin to be distinguished from it.
        let eps = 1e-4 * radius.max(1.0);
        let t_max = r.t_max as f64;
        if t0 > t_max || t1 <= eps {
            return None;
        }
        let t = if t0 > eps { t0 } else { t1 };
        if t > t_max {
            None
        } else {
            Some(t as Float)
        }
    }
}

impl Shape for Sphere {
    fn get_type(&self) -> &'static str {
        "sphere"
    }

    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        let t = self.hit_t(r)?;

        // Refine the hit point by reprojecting it onto the surface.
        let mut p_local = r.at(t) - self.center;
        p_local *= self.radius / p_local.length();
        if p_local.x == 0.0 && p_local.y == 0.0 {
            p_local.x = 1e-5 * self.radius;
        }
        let p_hit = self.center + p_local;

        // Find parametric representation of sphere hit.
        let mut phi = p_local.y.atan2(p_local.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let theta = clamp(p_local.z / self.radius, -1.0, 1.0).acos();
        let uv = Point2f::new(phi / TWO_PI, theta / PI);
        let dpdu = Vector3f::new(-TWO_PI * p_local.y, TWO_PI * p_local.x, 0.0);

        let mut n = Normal3f::from(p_local / self.radius);
        if self.reverse_orientation {
            n = -n;
        }

        let p_error = error_bound(&Point3f::from(p_local), 5) + error_bound(&p_hit, 1);
        let hit = Hit::new(p_hit, r.time, p_error, -r.d.normalize(), n);
        Some(Intersection::new(t, SurfaceInteraction::new(hit, uv, dpdu, None)))
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.hit_t(r).is_some()
    }

    fn area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }

    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let p_local = self.radius * uniform_sample_sphere(u);
        let p = self.center + p_local;

        let mut n = Normal3f::from(p_local / self.radius);
        if self.reverse_orientation {
            n = -n;
        }

        let p_error = error_bound(&Point3f::from(p_local), 5) + error_bound(&p, 1);
        let hit = Hit::new(p, 0.0, p_error, Vector3f::zero(), n);
        (hit, 1.0 / self.area())
    }
}

impl From<&ParamSet> for Sphere {
    /// Create a `Sphere` from given parameter set.
    ///
    /// * `params` - Parameter set with `radius`, `center` (3 floats) and
    ///              `reverseorientation`.
    fn from(params: &ParamSet) -> Self {
        let radius = params.find_one_float("radius", 1.0);
        let c = params.find_float("center");
        let center = if c.len() == 3 {
            Point3f::new(c[0], c[1], c[2])
        } else {
            Point3f::zero()
        };
        let reverse_orientation = params.find_one_bool("reverseorientation", false);
        Self::new(center, radius, reverse_orientation)
    }
}
