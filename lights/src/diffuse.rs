//! Diffuse Area Light Source

use core::geometry::*;
use core::interaction::*;
use core::light::*;
use core::paramset::*;
use core::pbrt::*;
use core::spectrum::*;
use std::sync::Arc;

/// Implements a basic area light source with uniform spatial and directional
/// radiance distribution.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Shape describing surface of the light source.
    pub shape: ArcShape,

    /// Surface area of the shape.
    pub area: Float,

    /// Indicates whether light source 2-sided.
    pub two_sided: bool,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `l_emit`    - Emitted radiance.
    /// * `shape`     - Shape describing surface of the light source.
    /// * `two_sided` - Indicates whether light source 2-sided.
    pub fn new(l_emit: Spectrum, shape: ArcShape, two_sided: bool) -> Self {
        let area = shape.area();
        Self {
            light_type: LightType::AREA_LIGHT,
            l_emit,
            shape: Arc::clone(&shape),
            area,
            two_sided,
        }
    }
}

impl Light for DiffuseAreaLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<Li> {
        let (mut p_shape, pdf) = self.shape.sample_solid_angle(hit, u);
        p_shape.time = hit.time;

        let wi = p_shape.p - hit.p;
        if pdf == 0.0 || wi.length_squared() == 0.0 {
            return None;
        }
        let wi = wi.normalize();
        let value = self.l(&p_shape, &(-wi));
        Some(Li::new(wi, pdf, VisibilityTester::new(*hit, p_shape), value))
    }

    /// Returns the probability density with respect to solid angle for the light’s
    /// `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float {
        self.shape.pdf_solid_angle(hit, wi)
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let sides = if self.two_sided { 2.0 } else { 1.0 };
        sides * self.l_emit * self.area * PI
    }

    /// Returns emitted radiance based on `two_sided` flag.
    ///
    /// * `hit` - Point on the light's surface.
    /// * `w`   - Outgoing direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum {
        if self.two_sided || hit.n.dot(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::zero()
        }
    }
}

impl From<(&ParamSet, ArcShape)> for DiffuseAreaLight {
    /// Create a `DiffuseAreaLight` from given parameter set and shape.
    ///
    /// * `p` - A tuple containing the parameter set and shape.
    fn from(p: (&ParamSet, ArcShape)) -> Self {
        let (params, shape) = p;
        let l = params.find_one_spectrum("L", Spectrum::one());
        let sc = params.find_one_spectrum("scale", Spectrum::one());
        let two_sided = params.find_one_bool("twosided", false);
        Self::new(l * sc, shape, two_sided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use shapes::Quad;

    /// Unit square at z = 1 facing down.
    fn panel(two_sided: bool) -> DiffuseAreaLight {
        let quad = Quad::new(
            Point3f::new(-0.5, -0.5, 1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            false,
        );
        DiffuseAreaLight::new(Spectrum::new(3.0), Arc::new(quad), two_sided)
    }

    #[test]
    fn emits_only_from_front_face() {
        let light = panel(false);
        let on_light = Hit::new(
            Point3f::new(0.0, 0.0, 1.0),
            0.0,
            Vector3f::zero(),
            Vector3f::zero(),
            Normal3f::new(0.0, 0.0, -1.0),
        );
        let down = Vector3f::new(0.0, 0.0, -1.0);
        assert_eq!(light.l(&on_light, &down), Spectrum::new(3.0));
        assert!(light.l(&on_light, &(-down)).is_black());
        assert!(!panel(true).l(&on_light, &(-down)).is_black());
    }

    #[test]
    fn sample_li_reaches_point_below() {
        let light = panel(false);
        let hit = Hit::new_minimal(Point3f::zero(), 0.0);
        let li = light.sample_li(&hit, &Point2f::new(0.5, 0.5)).expect("light faces the point");
        assert!(li.wi.z > 0.0);
        assert_eq!(li.value, Spectrum::new(3.0));
        // Center of a unit square one unit away: pdf = d^2 / (cos * A) = 1.
        assert!(approx_eq!(f32, li.pdf, 1.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, light.pdf_li(&hit, &li.wi), li.pdf, epsilon = 1e-4));
    }

    #[test]
    fn power_counts_sides() {
        assert!(approx_eq!(f32, panel(false).power()[0], 3.0 * PI, epsilon = 1e-5));
        assert!(approx_eq!(f32, panel(true).power()[0], 6.0 * PI, epsilon = 1e-5));
    }
}
