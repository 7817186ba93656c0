//! Matte Material

use bumpalo::Bump;
use core::interaction::*;
use core::material::*;
use core::paramset::*;
use core::pbrt::*;
use core::reflection::*;
use core::spectrum::*;

/// Implements purely diffuse surfaces, optionally letting part of the light
/// diffuse through to the other side.
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: Spectrum,

    /// Spectral diffuse transmission.
    kt: Spectrum,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd` - Spectral diffuse reflection.
    /// * `kt` - Spectral diffuse transmission; black for opaque surfaces.
    pub fn new(kd: Spectrum, kt: Spectrum) -> Self {
        let kd = kd.clamp(0.0, INFINITY);
        let kt = kt.clamp(0.0, INFINITY);
        if (kd + kt).max_component_value() > 1.0 {
            warn!("Matte material with Kd {} and Kt {} does not conserve energy.", kd, kt);
        }
        Self { kd, kt }
    }
}

impl Material for MatteMaterial {
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
        if !self.kd.is_black() {
            bsdf.add(LambertianReflection::alloc(arena, self.kd));
        }
        if !self.kt.is_black() {
            bsdf.add(LambertianTransmission::alloc(arena, self.kt));
        }
        ScatteringFunctions {
            bsdf: Some(bsdf),
            bssrdf: None,
        }
    }
}

impl From<&ParamSet> for MatteMaterial {
    /// Create a matte material from given parameter set.
    ///
    /// * `params` - Parameter set with `Kd` and `Kt`.
    fn from(params: &ParamSet) -> Self {
        let kd = params.find_one_spectrum("Kd", Spectrum::new(0.5));
        let kt = params.find_one_spectrum("Kt", Spectrum::zero());
        Self::new(kd, kt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::geometry::*;
    use float_cmp::approx_eq;

    fn floor_hit() -> SurfaceInteraction<'static> {
        let hit = Hit::new(
            Point3f::zero(),
            0.0,
            Vector3f::zero(),
            Vector3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, 1.0),
        );
        SurfaceInteraction::new(hit, Point2f::zero(), Vector3f::new(1.0, 0.0, 0.0), None)
    }

    #[test]
    fn reflects_kd_over_pi() {
        let arena = Bump::new();
        let material = MatteMaterial::new(Spectrum::new(0.8), Spectrum::zero());
        let sf = material.compute_scattering_functions(&arena, &floor_hit(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("matte always has a bsdf");
        assert!(sf.bssrdf.is_none());
        assert_eq!(bsdf.num_components(BxDFType::BSDF_ALL), 1);

        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let f = bsdf.f(&wo, &wi, BxDFType::BSDF_ALL);
        assert!(approx_eq!(f32, f[0], 0.8 * INV_PI, epsilon = 1e-6));
        assert!(bsdf.f(&wo, &(-wi), BxDFType::BSDF_ALL).is_black());
    }

    #[test]
    fn translucent_matte_transmits() {
        let arena = Bump::new();
        let material = MatteMaterial::new(Spectrum::new(0.4), Spectrum::new(0.4));
        let sf = material.compute_scattering_functions(&arena, &floor_hit(), TransportMode::Radiance);
        let bsdf = sf.bsdf.expect("matte always has a bsdf");
        assert_eq!(bsdf.num_components(BxDFType::BSDF_ALL), 2);
        assert_eq!(bsdf.num_components(BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_DIFFUSE), 1);

        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let below = Vector3f::new(0.0, 0.6, -0.8);
        let f = bsdf.f(&wo, &below, BxDFType::BSDF_ALL);
        assert!(approx_eq!(f32, f[1], 0.4 * INV_PI, epsilon = 1e-6));
    }

    #[test]
    fn from_params() {
        let mut params = ParamSet::new();
        params.add_rgb_spectrum("Kd", &[0.1, 0.2, 0.3]);
        let material = MatteMaterial::from(&params);
        assert_eq!(material.kd, Spectrum::from_rgb(0.1, 0.2, 0.3));
        assert!(material.kt.is_black());
    }
}
