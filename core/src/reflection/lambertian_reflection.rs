//! Lambertian Reflection

use super::{BxDF, BxDFType};
use crate::geometry::Vector3f;
use crate::pbrt::INV_PI;
use crate::spectrum::Spectrum;
use bumpalo::Bump;

/// Perfectly diffuse reflection.
pub struct LambertianReflection {
    /// Reflectance spectrum which gives the fraction of incident light that
    /// is scattered.
    r: Spectrum,
}

impl LambertianReflection {
    /// Allocate a new `LambertianReflection` in the arena.
    ///
    /// * `arena` - The memory arena used for allocations.
    /// * `r`     - Reflectance spectrum.
    pub fn alloc(arena: &Bump, r: Spectrum) -> BxDF<'_> {
        BxDF::LambertianReflection(arena.alloc(Self { r }))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::BSDF_REFLECTION | BxDFType::BSDF_DIFFUSE
    }

    /// Returns the value of the distribution function; constant over the
    /// reflection hemisphere.
    ///
    /// * `_wo` - Outgoing direction.
    /// * `_wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        self.r * INV_PI
    }
}
