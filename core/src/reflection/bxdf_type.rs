//! BxDF Type

use bitflags::bitflags;

bitflags! {
    /// Types of reflection models.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BxDFType: u8 {
        const BSDF_REFLECTION = 1 << 0;
        const BSDF_TRANSMISSION = 1 << 1;
        const BSDF_DIFFUSE = 1 << 2;
        const BSDF_GLOSSY = 1 << 3;
        const BSDF_SPECULAR = 1 << 4;
        const BSDF_ALL = Self::BSDF_REFLECTION.bits()
            | Self::BSDF_TRANSMISSION.bits()
            | Self::BSDF_DIFFUSE.bits()
            | Self::BSDF_GLOSSY.bits()
            | Self::BSDF_SPECULAR.bits();
    }
}

impl Default for BxDFType {
    fn default() -> Self {
        Self::empty()
    }
}
