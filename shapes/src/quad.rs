//! Quads

use core::geometry::*;
use core::interaction::*;
use core::paramset::*;
use core::pbrt::*;

/// A planar parallelogram spanned by two edges from a corner.
#[derive(Clone, Debug)]
pub struct Quad {
    /// Corner of the quad.
    pub p0: Point3f,

    /// First edge.
    pub e1: Vector3f,

    /// Second edge.
    pub e2: Vector3f,

    /// Unit surface normal, `e1 x e2` unless orientation is reversed.
    pub n: Normal3f,

    /// Unnormalized `e1 x e2`.
    cross: Vector3f,
}

impl Quad {
    /// Create a new quad.
    ///
    /// * `p0`                  - Corner of the quad.
    /// * `e1`                  - First edge.
    /// * `e2`                  - Second edge.
    /// * `reverse_orientation` - Flip the normal to `e2 x e1`.
    pub fn new(p0: Point3f, e1: Vector3f, e2: Vector3f, reverse_orientation: bool) -> Self {
        let cross = e1.cross(&e2);
        if cross.length_squared() == 0.0 {
            warn!("Quad edges {:?} and {:?} are degenerate.", e1, e2);
        }
        let n = Normal3f::from(cross.normalize());
        Self {
            p0,
            e1,
            e2,
            n: if reverse_orientation { -n } else { n },
            cross,
        }
    }

    /// Returns the ray parameter and the `(u, v)` edge coordinates of the hit.
    ///
    /// * `r` - The ray.
    fn hit(&self, r: &Ray) -> Option<(Float, Float, Float)> {
        let denom = dot(&self.cross, &r.d);
        if denom == 0.0 {
            return None;
        }
        let t = dot(&self.cross, &(self.p0 - r.o)) / denom;
        if !(t > 0.0 && t <= r.t_max) {
            return None;
        }

        let rel = r.at(t) - self.p0;
        let len2 = self.cross.length_squared();
        let u = dot(&rel.cross(&self.e2), &self.cross) / len2;
        let v = dot(&self.e1.cross(&rel), &self.cross) / len2;
        if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
            Some((t, u, v))
        } else {
            None
        }
    }

    /// Returns the point at edge coordinates `(u, v)`.
    fn point_at(&self, u: Float, v: Float) -> Point3f {
        self.p0 + self.e1 * u + self.e2 * v
    }
}

impl Shape for Quad {
    fn get_type(&self) -> &'static str {
        "quad"
    }

    fn world_bound(&self) -> Bounds3f {
        let p1 = self.point_at(1.0, 0.0);
        let p2 = self.point_at(0.0, 1.0);
        let p3 = self.point_at(1.0, 1.0);
        Bounds3f::new(self.p0, p1).union(&Bounds3f::new(p2, p3))
    }

    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        let (t, u, v) = self.hit(r)?;

        // Recompute the point from the surface parameterization.
        let p = self.point_at(u, v);
        let p_error = error_bound(&p, 3);
        let hit = Hit::new(p, r.time, p_error, -r.d.normalize(), self.n);
        let isect = SurfaceInteraction::new(hit, Point2f::new(u, v), self.e1, None);
        Some(Intersection::new(t, isect))
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.hit(r).is_some()
    }

    fn area(&self) -> Float {
        self.cross.length()
    }

    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let p = self.point_at(u[0], u[1]);
        let hit = Hit::new(p, 0.0, error_bound(&p, 3), Vector3f::zero(), self.n);
        (hit, 1.0 / self.area())
    }
}

impl From<&ParamSet> for Quad {
    /// Create a `Quad` from given parameter set.
    ///
    /// * `params` - Parameter set with `p0`, `e1`, `e2` (3 floats each) and
    ///              `reverseorientation`.
    fn from(params: &ParamSet) -> Self {
        let triple = |name: &str, default: [Float; 3]| {
            let v = params.find_float(name);
            if v.len() == 3 {
                [v[0], v[1], v[2]]
            } else {
                default
            }
        };
        let p0 = triple("p0", [0.0, 0.0, 0.0]);
        let e1 = triple("e1", [1.0, 0.0, 0.0]);
        let e2 = triple("e2", [0.0, 1.0, 0.0]);
        Self::new(
            Point3f::new(p0[0], p0[1], p0[2]),
            Vector3f::new(e1[0], e1[1], e1[2]),
            Vector3f::new(e2[0], e2[1], e2[2]),
            params.find_one_bool("reverseorientation", false),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    /// 2x2 quad on the plane z = 1 facing +z.
    fn ceiling() -> Quad {
        Quad::new(
            Point3f::new(-1.0, -1.0, 1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
            false,
        )
    }

    #[test]
    fn ray_hits_inside() {
        let quad = ceiling();
        let ray = Ray::unbounded(Point3f::new(0.5, 0.5, 0.0), Vector3f::new(0.0, 0.0, 2.0));
        let it = quad.intersect(&ray).expect("ray should hit");
        assert!(approx_eq!(f32, it.t, 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, it.isect.hit.p.z, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, it.isect.uv.x, 0.75, epsilon = 1e-6));
        assert!(approx_eq!(f32, it.isect.uv.y, 0.75, epsilon = 1e-6));
        assert!(approx_eq!(f32, it.isect.hit.n.z, 1.0, epsilon = 1e-6));
    }

    #[test]
    fn ray_misses_outside_and_parallel() {
        let quad = ceiling();
        let outside = Ray::unbounded(Point3f::new(1.5, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(!quad.intersect_p(&outside));

        let parallel = Ray::unbounded(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0));
        assert!(quad.intersect(&parallel).is_none());

        let behind = Ray::unbounded(Point3f::zero(), Vector3f::new(0.0, 0.0, -1.0));
        assert!(quad.intersect(&behind).is_none());
    }

    #[test]
    fn reversed_orientation_flips_normal() {
        let quad = Quad::new(
            Point3f::zero(),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            true,
        );
        assert!(approx_eq!(f32, quad.n.z, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn area_and_bounds() {
        let quad = ceiling();
        assert!(approx_eq!(f32, quad.area(), 4.0, epsilon = 1e-6));
        let b = quad.world_bound();
        assert_eq!(b.p_min, Point3f::new(-1.0, -1.0, 1.0));
        assert_eq!(b.p_max, Point3f::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn solid_angle_pdf_matches_sampling() {
        let quad = ceiling();
        let reference = Hit::new_minimal(Point3f::zero(), 0.0);
        let (p, pdf) = quad.sample_solid_angle(&reference, &Point2f::new(0.3, 0.6));
        assert!(pdf > 0.0);

        let wi = (p.p - reference.p).normalize();
        let pdf_query = quad.pdf_solid_angle(&reference, &wi);
        assert!(approx_eq!(f32, pdf, pdf_query, epsilon = 1e-3 * pdf));
    }
}
