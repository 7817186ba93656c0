//! BSDF

use super::*;
use crate::geometry::{Dot, Normal3f, Point2f, Vector3f};
use crate::interaction::SurfaceInteraction;
use crate::pbrt::{min, Float, ONE_MINUS_EPSILON};
use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;

/// BSDF represents a collection of BRDFs and BTDFs allocated in a memory
/// arena.
pub struct BSDF<'arena> {
    /// The shading normal. It is the first axis in the orthonormal coordinate
    /// system and also defines the hemispheres for incident illumination.
    pub ns: Normal3f,

    /// The geometric normal defined by surface geometry.
    pub ng: Normal3f,

    /// Second axis for the orthonormal coordinate system.
    pub ss: Vector3f,

    /// Third axis for the orthonormal coordinate system.
    pub ts: Vector3f,

    /// The `BxDFs`.
    bxdfs: BumpVec<'arena, BxDF<'arena>>,

    /// Relative index of refraction over the surface boundary.
    pub eta: Float,
}

impl<'arena> BSDF<'arena> {
    /// Creates a new `BSDF` with no components.
    ///
    /// * `arena` - The memory arena used for allocations.
    /// * `si`    - The differential geometry at the point on a surface.
    /// * `eta`   - Optional relative index of refraction; defaults to 1.
    pub fn new(arena: &'arena Bump, si: &SurfaceInteraction, eta: Option<Float>) -> Self {
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();
        Self {
            ns,
            ng: si.hit.n,
            ss,
            ts: Vector3f::from(ns).cross(&ss),
            bxdfs: BumpVec::with_capacity_in(2, arena),
            eta: eta.unwrap_or(1.0),
        }
    }

    /// Add a `BxDF`.
    ///
    /// * `bxdf` - The `BxDF`.
    pub fn add(&mut self, bxdf: BxDF<'arena>) {
        self.bxdfs.push(bxdf);
    }

    /// Returns the number of `BxDF`s matching the given flags.
    ///
    /// * `bxdf_type` - The flags to match.
    pub fn num_components(&self, bxdf_type: BxDFType) -> usize {
        self.bxdfs.iter().filter(|b| b.matches_flags(bxdf_type)).count()
    }

    /// Transforms a vector from world space to the local shading frame.
    ///
    /// * `v` - The vector to transform.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot(&self.ns))
    }

    /// Transforms a vector from the local shading frame to world space.
    ///
    /// * `v` - The vector to transform.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        )
    }

    /// Returns true when the lobe contributes for the given geometric side.
    fn lobe_applies(bxdf: &BxDF, bxdf_type: BxDFType, reflect: bool) -> bool {
        bxdf.matches_flags(bxdf_type)
            && ((reflect && bxdf.get_type().contains(BxDFType::BSDF_REFLECTION))
                || (!reflect && bxdf.get_type().contains(BxDFType::BSDF_TRANSMISSION)))
    }

    /// Returns the BSDF evaluated for a pair of world-space directions.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `wi_w`      - Incident direction.
    /// * `bxdf_type` - The lobes to evaluate.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Spectrum {
        let wi = self.world_to_local(wi_w);
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::zero();
        }

        let reflect = wi_w.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0;
        self.bxdfs
            .iter()
            .filter(|b| Self::lobe_applies(b, bxdf_type, reflect))
            .fold(Spectrum::zero(), |l, b| l + b.f(&wo, &wi))
    }

    /// Samples an incident direction for the world-space outgoing direction.
    /// One matching lobe is chosen with `u[0]` and that coordinate is
    /// remapped to `[0, 1)` before sampling the lobe.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `u`         - The 2D uniform random values.
    /// * `bxdf_type` - The lobes that may be sampled.
    pub fn sample_f(&self, wo_w: &Vector3f, u: &Point2f, bxdf_type: BxDFType) -> BxDFSample {
        let matching_comps = self.num_components(bxdf_type);
        if matching_comps == 0 {
            return BxDFSample::default();
        }
        let comp = min(
            (u[0] * matching_comps as Float).floor() as usize,
            matching_comps - 1,
        );

        let bxdf = match self
            .bxdfs
            .iter()
            .filter(|b| b.matches_flags(bxdf_type))
            .nth(comp)
        {
            Some(b) => b,
            None => return BxDFSample::default(),
        };

        let u_remapped = Point2f::new(
            min(
                u[0] * matching_comps as Float - comp as Float,
                ONE_MINUS_EPSILON,
            ),
            u[1],
        );

        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return BxDFSample::default();
        }

        let sampled_type = bxdf.get_type();
        let sample = bxdf.sample_f(&wo, &u_remapped);
        if sample.pdf == 0.0 {
            return BxDFSample {
                sampled_type,
                ..BxDFSample::default()
            };
        }
        let wi_world = self.local_to_world(&sample.wi);

        if sampled_type.contains(BxDFType::BSDF_SPECULAR) {
            let pdf = if matching_comps > 1 {
                sample.pdf / matching_comps as Float
            } else {
                sample.pdf
            };
            return BxDFSample::new(sample.f, pdf, wi_world, sampled_type);
        }

        // Average the PDFs of all matching non-specular lobes.
        let mut pdf = sample.pdf;
        if matching_comps > 1 {
            for (i, b) in self
                .bxdfs
                .iter()
                .filter(|b| b.matches_flags(bxdf_type))
                .enumerate()
            {
                if i != comp {
                    pdf += b.pdf(&wo, &sample.wi);
                }
            }
            pdf /= matching_comps as Float;
        }

        let reflect = wi_world.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0;
        let f = self
            .bxdfs
            .iter()
            .filter(|b| Self::lobe_applies(b, bxdf_type, reflect))
            .fold(Spectrum::zero(), |l, b| l + b.f(&wo, &sample.wi));

        BxDFSample::new(f, pdf, wi_world, sampled_type)
    }

    /// Returns the PDF of sampling `wi_w` given `wo_w`, averaged over the
    /// matching lobes.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `wi_w`      - Incident direction.
    /// * `bxdf_type` - The lobes to consider.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Float {
        if self.bxdfs.is_empty() {
            return 0.0;
        }

        let wo = self.world_to_local(wo_w);
        let wi = self.world_to_local(wi_w);
        if wo.z == 0.0 {
            return 0.0;
        }

        let (pdf, matching_comps) = self
            .bxdfs
            .iter()
            .filter(|b| b.matches_flags(bxdf_type))
            .fold((0.0, 0), |(pdf, n), b| (pdf + b.pdf(&wo, &wi), n + 1));

        if matching_comps > 0 {
            pdf / matching_comps as Float
        } else {
            0.0
        }
    }
}
