//! Reflection and surface scattering models

use crate::geometry::{Point2f, Vector3f};
use crate::pbrt::Float;
use crate::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};
use crate::spectrum::Spectrum;

mod bsdf;
mod bxdf_sample;
mod bxdf_type;
mod lambertian_reflection;
mod lambertian_transmission;
mod specular_reflection;

// Re-export
pub use bsdf::*;
pub use bxdf_sample::*;
pub use bxdf_type::*;
pub use lambertian_reflection::*;
pub use lambertian_transmission::*;
pub use specular_reflection::*;

/// BxDF for BRDFs and BTDFs. Each variant references a value allocated in the
/// per-thread memory arena so a whole BSDF is released in bulk when the arena
/// is reset.
#[derive(Copy, Clone)]
pub enum BxDF<'arena> {
    LambertianReflection(&'arena LambertianReflection),
    LambertianTransmission(&'arena LambertianTransmission),
    SpecularReflection(&'arena SpecularReflection),
}

impl<'arena> BxDF<'arena> {
    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.get_type(),
            BxDF::LambertianTransmission(bxdf) => bxdf.get_type(),
            BxDF::SpecularReflection(bxdf) => bxdf.get_type(),
        }
    }

    /// Returns true if all of this model's flags are among `t`.
    ///
    /// * `t` - The reflection model to compare.
    pub fn matches_flags(&self, t: BxDFType) -> bool {
        t.contains(self.get_type())
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions in the local shading frame.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            BxDF::LambertianReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::LambertianTransmission(bxdf) => bxdf.f(wo, wi),
            BxDF::SpecularReflection(_) => Spectrum::zero(),
        }
    }

    /// Samples an incident direction for the outgoing direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        match self {
            BxDF::LambertianTransmission(bxdf) => bxdf.sample_f(wo, u),
            BxDF::SpecularReflection(bxdf) => bxdf.sample_f(wo, u),
            BxDF::LambertianReflection(_) => {
                // Cosine-sample the hemisphere, flipping the direction if necessary.
                let mut wi = cosine_sample_hemisphere(u);
                if wo.z < 0.0 {
                    wi.z = -wi.z;
                }
                BxDFSample::new(self.f(wo, &wi), self.pdf(wo, &wi), wi, self.get_type())
            }
        }
    }

    /// Returns the PDF of sampling `wi` given `wo`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            BxDF::LambertianTransmission(bxdf) => bxdf.pdf(wo, wi),
            BxDF::SpecularReflection(_) => 0.0,
            BxDF::LambertianReflection(_) => {
                if same_hemisphere(wo, wi) {
                    cosine_hemisphere_pdf(abs_cos_theta(wi))
                } else {
                    0.0
                }
            }
        }
    }
}

/// Returns cos(θ) of a direction in the shading frame.
///
/// * `w` - The direction.
#[inline(always)]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns |cos(θ)| of a direction in the shading frame.
///
/// * `w` - The direction.
#[inline(always)]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

/// Returns true if two directions lie in the same hemisphere of the shading
/// frame.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline(always)]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}
