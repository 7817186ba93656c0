//! Point Light Source

use core::geometry::*;
use core::interaction::*;
use core::light::*;
use core::paramset::*;
use core::pbrt::*;
use core::spectrum::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone)]
pub struct PointLight {
    /// Light source type.
    pub light_type: LightType,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`   - Position.
    /// * `intensity` - Intensity.
    pub fn new(p_light: Point3f, intensity: Spectrum) -> Self {
        Self {
            light_type: LightType::DELTA_POSITION_LIGHT,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `_u`  - Unused; the light is a single point.
    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Option<Li> {
        let d2 = self.p_light.distance_squared(&hit.p);
        if d2 == 0.0 {
            return None;
        }
        let wi = (self.p_light - hit.p).normalize();
        let vis = VisibilityTester::new(*hit, Hit::new_minimal(self.p_light, hit.time));
        Some(Li::new(wi, 1.0, vis, self.intensity / d2))
    }

    /// Delta lights cannot be hit by sampled directions.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        4.0 * PI * self.intensity
    }
}

impl From<&ParamSet> for PointLight {
    /// Create a `PointLight` from given parameter set.
    ///
    /// * `params` - Parameter set with `I`, `scale` and `from`.
    fn from(params: &ParamSet) -> Self {
        let intensity = params.find_one_spectrum("I", Spectrum::one());
        let sc = params.find_one_spectrum("scale", Spectrum::one());
        let from = params.find_float("from");
        let p = if from.len() == 3 {
            Point3f::new(from[0], from[1], from[2])
        } else {
            Point3f::zero()
        };
        Self::new(p, intensity * sc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn inverse_square_falloff() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 2.0), Spectrum::new(8.0));
        let hit = Hit::new_minimal(Point3f::zero(), 0.0);
        let li = light.sample_li(&hit, &Point2f::zero()).expect("light is visible");
        assert!(approx_eq!(f32, li.value[0], 2.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, li.pdf, 1.0));
        assert!(approx_eq!(f32, li.wi.z, 1.0, epsilon = 1e-6));
        assert!(light.is_delta_light());
        assert_eq!(light.pdf_li(&hit, &li.wi), 0.0);
    }

    #[test]
    fn coincident_point_has_no_sample() {
        let light = PointLight::new(Point3f::zero(), Spectrum::one());
        let hit = Hit::new_minimal(Point3f::zero(), 0.0);
        assert!(light.sample_li(&hit, &Point2f::zero()).is_none());
    }

    #[test]
    fn power_is_four_pi_intensity() {
        let light = PointLight::new(Point3f::zero(), Spectrum::new(2.0));
        assert!(approx_eq!(f32, light.power()[1], 8.0 * PI, epsilon = 1e-5));
    }
}
