//! Specular Reflection

use super::{abs_cos_theta, BxDF, BxDFSample, BxDFType};
use crate::geometry::{Point2f, Vector3f};
use crate::spectrum::Spectrum;
use bumpalo::Bump;

/// Perfect mirror reflection with a constant reflectance.
pub struct SpecularReflection {
    /// Reflectance used to scale the reflected color.
    r: Spectrum,
}

impl SpecularReflection {
    /// Allocate a new `SpecularReflection` in the arena.
    ///
    /// * `arena` - The memory arena used for allocations.
    /// * `r`     - Reflectance.
    pub fn alloc(arena: &Bump, r: Spectrum) -> BxDF<'_> {
        BxDF::SpecularReflection(arena.alloc(Self { r }))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR
    }

    /// Returns the mirrored direction with a delta distribution. The PDF is 1
    /// by convention and the value is divided by |cos(θ)| so the cosine term
    /// applied by the estimator cancels.
    ///
    /// * `wo` - Outgoing direction.
    /// * `_u` - Unused.
    pub fn sample_f(&self, wo: &Vector3f, _u: &Point2f) -> BxDFSample {
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let cos = abs_cos_theta(&wi);
        let f = if cos == 0.0 { Spectrum::zero() } else { self.r / cos };
        BxDFSample::new(f, 1.0, wi, self.get_type())
    }
}
