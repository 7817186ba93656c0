//! Uniform Infinite Area Light Source

use core::geometry::*;
use core::interaction::*;
use core::light::*;
use core::paramset::*;
use core::pbrt::*;
use core::sampling::*;
use core::scene::*;
use core::spectrum::*;
use std::sync::RwLock;

/// Implements an infinitely far away area light source that surrounds the
/// entire scene with constant radiance.
pub struct UniformInfiniteLight {
    /// Light source type.
    pub light_type: LightType,

    /// Emitted radiance.
    pub l: Spectrum,

    /// Center and radius of the scene bounds; calculated in `preprocess()`.
    world_sphere: RwLock<(Point3f, Float)>,
}

impl UniformInfiniteLight {
    /// Returns a new `UniformInfiniteLight`.
    ///
    /// * `l` - Emitted radiance.
    pub fn new(l: Spectrum) -> Self {
        Self {
            light_type: LightType::INFINITE_LIGHT,
            l,
            world_sphere: RwLock::new((Point3f::zero(), 1.0)),
        }
    }

    /// Returns the scene's bounding sphere.
    fn world_sphere(&self) -> (Point3f, Float) {
        *self.world_sphere.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Light for UniformInfiniteLight {
    /// Initialize the light source before rendering begins.
    ///
    /// * `scene` - The scene.
    fn preprocess(&self, scene: &Scene) {
        let sphere = scene.world_bound.bounding_sphere();
        *self.world_sphere.write().unwrap_or_else(|e| e.into_inner()) = sphere;
    }

    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<Li> {
        let wi = uniform_sample_sphere(u);
        let (_, world_radius) = self.world_sphere();
        let p1 = Hit::new_minimal(hit.p + wi * (2.0 * world_radius), hit.time);
        let vis = VisibilityTester::new(*hit, p1);
        Some(Li::new(wi, uniform_sphere_pdf(), vis, self.l))
    }

    /// Returns the probability density with respect to solid angle for the light’s
    /// `sample_li()`.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let (_, world_radius) = self.world_sphere();
        PI * world_radius * world_radius * self.l
    }

    /// Returns emitted radiance along a ray that escapes the scene bounds.
    fn le(&self, _ray: &Ray) -> Spectrum {
        self.l
    }
}

impl From<&ParamSet> for UniformInfiniteLight {
    /// Create a `UniformInfiniteLight` from given parameter set.
    ///
    /// * `params` - Parameter set with `L` and `scale`.
    fn from(params: &ParamSet) -> Self {
        let l = params.find_one_spectrum("L", Spectrum::one());
        let sc = params.find_one_spectrum("scale", Spectrum::one());
        if l.is_black() {
            warn!("Infinite light has black radiance.");
        }
        Self::new(l * sc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::primitive::*;
    use core::primitives::*;
    use float_cmp::approx_eq;
    use shapes::Sphere;
    use std::sync::Arc;

    #[test]
    fn radiance_is_constant() {
        let light = UniformInfiniteLight::new(Spectrum::new(0.5));
        let ray = Ray::unbounded(Point3f::zero(), Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(light.le(&ray), Spectrum::new(0.5));

        let hit = Hit::new_minimal(Point3f::zero(), 0.0);
        let li = light.sample_li(&hit, &Point2f::new(0.25, 0.75)).expect("always samples");
        assert!(approx_eq!(f32, li.pdf, 1.0 / (4.0 * PI), epsilon = 1e-6));
        assert!(approx_eq!(f32, li.wi.length(), 1.0, epsilon = 1e-5));
        assert_eq!(li.value, Spectrum::new(0.5));
    }

    #[test]
    fn preprocess_uses_scene_bounds() {
        let sphere = Arc::new(Sphere::new(Point3f::zero(), 2.0, false));
        let prim: ArcPrimitive = Arc::new(GeometricPrimitive::new(sphere, None, None));
        let light: Arc<UniformInfiniteLight> = Arc::new(UniformInfiniteLight::new(Spectrum::one()));
        let lights: Vec<ArcLight> = vec![light.clone() as ArcLight];
        let scene = Scene::new(prim, lights);
        assert_eq!(scene.infinite_lights.len(), 1);

        let (_, r) = light.world_sphere();
        assert!(approx_eq!(f32, r, (12.0 as Float).sqrt(), epsilon = 1e-5));
        assert!(approx_eq!(f32, light.power()[2], PI * 12.0, epsilon = 1e-3));
    }
}
