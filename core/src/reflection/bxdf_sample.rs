//! BxDF Sample

use super::BxDFType;
use crate::geometry::Vector3f;
use crate::pbrt::Float;
use crate::spectrum::Spectrum;

/// Stores evaluation of BxDF samples.
#[derive(Copy, Clone, Default, Debug)]
pub struct BxDFSample {
    /// The sample value.
    pub f: Spectrum,

    /// The value of the PDF.
    pub pdf: Float,

    /// The sampled inbound direction.
    pub wi: Vector3f,

    /// The type of BxDF that was sampled.
    pub sampled_type: BxDFType,
}

impl BxDFSample {
    /// Create a new `BxDFSample`.
    ///
    /// * `f`            - The sample value.
    /// * `pdf`          - The value of the PDF.
    /// * `wi`           - The sampled inbound direction.
    /// * `sampled_type` - The type of BxDF.
    pub fn new(f: Spectrum, pdf: Float, wi: Vector3f, sampled_type: BxDFType) -> Self {
        Self {
            f,
            pdf,
            wi,
            sampled_type,
        }
    }

    /// Returns true if the sample came from a specular lobe.
    pub fn is_specular(&self) -> bool {
        self.sampled_type.contains(BxDFType::BSDF_SPECULAR)
    }
}
