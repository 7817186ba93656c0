//! Mirror Material

use bumpalo::Bump;
use core::interaction::*;
use core::material::*;
use core::paramset::*;
use core::pbrt::*;
use core::reflection::*;
use core::spectrum::*;

/// Implements a simple mirror, modeled with perfect specular reflection.
pub struct MirrorMaterial {
    /// Reflectivity of the mirror.
    kr: Spectrum,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr` - Reflectivity of the mirror.
    pub fn new(kr: Spectrum) -> Self {
        Self {
            kr: kr.clamp(0.0, INFINITY),
        }
    }
}

impl Material for MirrorMaterial {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `si`    - The surface interaction at the intersection.
    /// * `_mode` - Transport mode (ignored).
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(arena, si, None);
        if !self.kr.is_black() {
            bsdf.add(SpecularReflection::alloc(arena, self.kr));
        }
        ScatteringFunctions {
            bsdf: Some(bsdf),
            bssrdf: None,
        }
    }
}

impl From<&ParamSet> for MirrorMaterial {
    /// Create a mirror material from given parameter set.
    ///
    /// * `params` - Parameter set with `Kr`.
    fn from(params: &ParamSet) -> Self {
        Self::new(params.find_one_spectrum("Kr", Spectrum::new(0.9)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::geometry::*;
    use float_cmp::approx_eq;

    #[test]
    fn reflects_about_normal() {
        let arena = Bump::new();
        let hit = Hit::new(
            Point3f::zero(),
            0.0,
            Vector3f::zero(),
            Vector3f::new(0.0, 0.6, 0.8),
            Normal3f::new(0.0, 0.0, 1.0),
        );
        let si = SurfaceInteraction::new(hit, Point2f::zero(), Vector3f::new(1.0, 0.0, 0.0), None);
        let sf = MirrorMaterial::new(Spectrum::new(0.9)).compute_scattering_functions(
            &arena,
            &si,
            TransportMode::Radiance,
        );
        let bsdf = sf.bsdf.expect("mirror always has a bsdf");

        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let sample = bsdf.sample_f(&wo, &Point2f::new(0.5, 0.5), BxDFType::BSDF_ALL);
        assert!(sample.is_specular());
        assert!(approx_eq!(f32, sample.pdf, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, sample.wi.y, -0.6, epsilon = 1e-5));
        assert!(approx_eq!(f32, sample.wi.z, 0.8, epsilon = 1e-5));
        // f * |cos| recovers the reflectance.
        assert!(approx_eq!(f32, sample.f[0] * 0.8, 0.9, epsilon = 1e-5));

        // Delta lobes never match a fixed pair of directions.
        assert!(bsdf.f(&wo, &sample.wi, BxDFType::BSDF_ALL).is_black());
    }
}
