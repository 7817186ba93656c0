//! Lambertian Transmission

use super::{abs_cos_theta, same_hemisphere, BxDF, BxDFSample, BxDFType};
use crate::geometry::{Point2f, Vector3f};
use crate::pbrt::{Float, INV_PI};
use crate::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};
use crate::spectrum::Spectrum;
use bumpalo::Bump;

/// Perfectly diffuse transmission through the surface.
pub struct LambertianTransmission {
    /// Transmittance spectrum.
    t: Spectrum,
}

impl LambertianTransmission {
    /// Allocate a new `LambertianTransmission` in the arena.
    ///
    /// * `arena` - The memory arena used for allocations.
    /// * `t`     - Transmittance spectrum.
    pub fn alloc(arena: &Bump, t: Spectrum) -> BxDF<'_> {
        BxDF::LambertianTransmission(arena.alloc(Self { t }))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_DIFFUSE
    }

    /// Returns the value of the distribution function.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if same_hemisphere(wo, wi) {
            Spectrum::zero()
        } else {
            self.t * INV_PI
        }
    }

    /// Samples a direction on the opposite side of the surface.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z > 0.0 {
            wi.z = -wi.z;
        }
        BxDFSample::new(self.f(wo, &wi), self.pdf(wo, &wi), wi, self.get_type())
    }

    /// Returns the PDF of sampling `wi` given `wo`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if same_hemisphere(wo, wi) {
            0.0
        } else {
            cosine_hemisphere_pdf(abs_cos_theta(wi))
        }
    }
}
