//! Shapes

use super::*;
use crate::interaction::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Shape common functions
pub trait Shape {
    /// Returns the shape type. Usually these are behind ArcShape and harder to
    /// debug. So this will be helpful.
    fn get_type(&self) -> &'static str;

    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns geometric details if a ray intersects the shape. The returned
    /// interaction has no primitive; the caller attaches it.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>>;

    /// Returns `true` if a ray-shape intersection succeeds; otherwise `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.intersect(r).is_some()
    }

    /// Returns the surface area of the shape.
    fn area(&self) -> Float;

    /// Sample a point on the surface and return the PDF with respect to area on
    /// the surface.
    ///
    /// NOTE: The returned `Hit` value will have `wo` = zero.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float);

    /// Sample a point on the shape given a reference point and return the PDF
    /// with respect to the solid angle from ref.
    ///
    /// * `hit` - Reference point.
    /// * `u`   - Sample value to use.
    fn sample_solid_angle(&self, hit: &Hit, u: &Point2f) -> (Hit, Float) {
        let (intr, mut pdf) = self.sample_area(u);
        let wi = intr.p - hit.p;

        if wi.length_squared() == 0.0 {
            pdf = 0.0;
        } else {
            let wi = wi.normalize();
            // Convert from area measure to solid angle measure.
            pdf *= hit.p.distance_squared(&intr.p) / abs_dot(&intr.n, &(-wi));
            if pdf.is_infinite() {
                pdf = 0.0;
            }
        }

        (intr, pdf)
    }

    /// Returns the PDF with respect to solid angle of sampling direction `wi`
    /// from the reference point.
    ///
    /// * `hit` - The reference point.
    /// * `wi`  - The incident direction.
    fn pdf_solid_angle(&self, hit: &Hit, wi: &Vector3f) -> Float {
        let ray = hit.spawn_ray(wi);
        match self.intersect(&ray) {
            Some(Intersection { isect, .. }) => {
                let pdf = hit.p.distance_squared(&isect.hit.p)
                    / (abs_dot(&isect.hit.n, &(-*wi)) * self.area());
                if pdf.is_infinite() {
                    0.0
                } else {
                    pdf
                }
            }
            None => 0.0,
        }
    }
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;

/// Stores geometric information about a single ray-shape intersection.
pub struct Intersection<'scene> {
    /// The parameter along the ray where intersection occurred.
    pub t: Float,

    /// The surface interaction details.
    pub isect: SurfaceInteraction<'scene>,
}

impl<'scene> Intersection<'scene> {
    /// Create a new intersection.
    ///
    /// * `t`     - The parameter along the ray where intersection occurred.
    /// * `isect` - The surface interaction details.
    pub fn new(t: Float, isect: SurfaceInteraction<'scene>) -> Self {
        Self { t, isect }
    }
}
