//! Path Tracing

use bumpalo::Bump;
use core::bssrdf::*;
use core::camera::*;
use core::geometry::*;
use core::integrator::*;
use core::light_distrib::*;
use core::material::*;
use core::paramset::*;
use core::pbrt::*;
use core::reflection::*;
use core::sampler::*;
use core::scene::*;
use core::spectrum::*;
use core::{stat_counter, stat_dist, stat_inc, stat_int_distribution, stat_register_fns};

stat_counter!("Integrator/Zero-radiance paths", ZERO_RADIANCE_PATHS, path_stats_zero_radiance);
stat_int_distribution!("Integrator/Path length", PATH_LENGTH, path_stats_path_length);
stat_counter!(
    "Integrator/Non-finite path throughput",
    NON_FINITE_THROUGHPUT,
    path_stats_non_finite
);

stat_register_fns!(path_stats_zero_radiance, path_stats_path_length, path_stats_non_finite);

/// Minimum bounce count before Russian roulette may end a path.
const ROULETTE_MIN_BOUNCES: usize = 3;

/// Why a path walk stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The ray left the scene.
    Escaped,

    /// The sampled direction had zero value or zero density.
    ZeroPdf,

    /// The maximum number of bounces was reached.
    MaxDepth,

    /// Russian roulette ended the path.
    RussianRoulette,

    /// The throughput became NaN or infinite; the estimate was discarded.
    NonFinite,

    /// Subsurface transport found no exit point or carried no energy.
    SubsurfaceAbsorbed,
}

/// Result of a single path estimate.
#[derive(Copy, Clone, Debug)]
pub struct PathSample {
    /// Radiance estimate.
    pub l: Spectrum,

    /// Number of scattering bounces when the path ended.
    pub bounces: usize,

    /// Why the path ended.
    pub termination: Termination,
}

impl PathSample {
    /// Records path statistics and returns the sample.
    fn finish(l: Spectrum, bounces: usize, termination: Termination) -> Self {
        if l.is_black() {
            stat_inc!(ZERO_RADIANCE_PATHS, 1);
        }
        stat_dist!(PATH_LENGTH, bounces as i64);
        Self {
            l,
            bounces,
            termination,
        }
    }

    /// Discards the estimate after a numeric defect.
    fn non_finite(bounces: usize) -> Self {
        warn!("Non-finite path throughput at bounce {}; discarding the path", bounces);
        stat_inc!(NON_FINITE_THROUGHPUT, 1);
        Self::finish(Spectrum::zero(), bounces, Termination::NonFinite)
    }
}

/// Estimates the radiance arriving along `r` with a forward path walk using
/// next-event estimation at every vertex and Russian roulette after the third
/// bounce.
///
/// Variates are drawn from the sampler's light stream for light sampling and
/// from the scattering stream for BSDF, subsurface and roulette decisions, in
/// that order per vertex. Both streams are rewound on entry so a replayable
/// sampler reproduces identical draws for unchanged coordinates.
///
/// * `r`             - The camera ray.
/// * `scene`         - The scene.
/// * `sampler`       - The variate source.
/// * `arena`         - The memory arena for scattering functions.
/// * `max_depth`     - Maximum number of bounces.
/// * `light_distrib` - Light selection distribution; lights are chosen
///                     uniformly when `None`.
pub fn path_li<S: Sampler + ?Sized>(
    r: &Ray,
    scene: &Scene,
    sampler: &mut S,
    arena: &Bump,
    max_depth: usize,
    light_distrib: Option<&ArcLightDistribution>,
) -> PathSample {
    sampler.start_stream(SCATTERING_STREAM_INDEX);
    sampler.start_stream(LIGHT_STREAM_INDEX);

    let mut l = Spectrum::zero();
    let mut beta = Spectrum::one();
    let mut ray = *r;
    let mut specular_bounce = false;
    let mut bounces = 0;

    loop {
        let found = scene.intersect(&mut ray);

        // Possibly add emitted light at path vertex or from the environment.
        if bounces == 0 || specular_bounce {
            match &found {
                Some(isect) => l += beta * isect.le(&(-ray.d)),
                None => {
                    for light in scene.infinite_lights.iter() {
                        l += beta * light.le(&ray);
                    }
                }
            }
        }

        let isect = match found {
            Some(isect) => isect,
            None => return PathSample::finish(l, bounces, Termination::Escaped),
        };
        if bounces >= max_depth {
            return PathSample::finish(l, bounces, Termination::MaxDepth);
        }

        // Skip over surfaces that only delimit regions of space.
        let sf = isect.compute_scattering_functions(arena, TransportMode::Radiance);
        let bsdf = match sf.bsdf {
            Some(bsdf) => bsdf,
            None => {
                ray = isect.hit.spawn_ray(&ray.d);
                continue;
            }
        };

        let distrib = light_distrib.and_then(|d| d.lookup(&isect.hit.p));

        // Sample illumination from lights to find path contribution.
        sampler.select_stream(LIGHT_STREAM_INDEX);
        l += beta * uniform_sample_one_light(&isect, &bsdf, scene, sampler, distrib.as_deref());

        // Sample BSDF to get new path direction.
        sampler.select_stream(SCATTERING_STREAM_INDEX);
        let wo = -ray.d;
        let u = sampler.get_2d();
        let BxDFSample {
            f,
            pdf,
            wi,
            sampled_type,
        } = bsdf.sample_f(&wo, &u, BxDFType::BSDF_ALL);
        if f.is_black() || pdf == 0.0 {
            return PathSample::finish(l, bounces, Termination::ZeroPdf);
        }
        beta *= f * abs_dot(&wi, &isect.shading.n) / pdf;
        if !beta.is_finite() {
            return PathSample::non_finite(bounces);
        }
        specular_bounce = sampled_type.contains(BxDFType::BSDF_SPECULAR);
        ray = isect.hit.spawn_ray(&wi);

        // Account for subsurface scattering, if applicable.
        if let Some(bssrdf) = sf.bssrdf {
            if sampled_type.contains(BxDFType::BSDF_TRANSMISSION) {
                let u1 = sampler.get_1d();
                let u2 = sampler.get_2d();
                let BSSRDFSample {
                    s,
                    si: exit,
                    bsdf: exit_bsdf,
                    pdf,
                } = match bssrdf.sample_s(scene, u1, &u2, arena) {
                    Some(sample) if pdf_is_usable(sample.pdf) => sample,
                    _ => return PathSample::finish(l, bounces, Termination::SubsurfaceAbsorbed),
                };
                beta *= s / pdf;
                if !beta.is_finite() {
                    return PathSample::non_finite(bounces);
                }
                if beta.is_black() {
                    return PathSample::finish(l, bounces, Termination::SubsurfaceAbsorbed);
                }

                // Account for the direct subsurface scattering component.
                let distrib = light_distrib.and_then(|d| d.lookup(&exit.hit.p));
                sampler.select_stream(LIGHT_STREAM_INDEX);
                l += beta * uniform_sample_one_light(&exit, &exit_bsdf, scene, sampler, distrib.as_deref());

                // Account for the indirect subsurface scattering component.
                sampler.select_stream(SCATTERING_STREAM_INDEX);
                let u = sampler.get_2d();
                let sample = exit_bsdf.sample_f(&exit.hit.wo, &u, BxDFType::BSDF_ALL);
                if sample.f.is_black() || sample.pdf == 0.0 {
                    return PathSample::finish(l, bounces, Termination::ZeroPdf);
                }
                beta *= sample.f * abs_dot(&sample.wi, &exit.shading.n) / sample.pdf;
                if !beta.is_finite() {
                    return PathSample::non_finite(bounces);
                }
                specular_bounce = sample.is_specular();
                ray = exit.hit.spawn_ray(&sample.wi);
            }
        }

        // Possibly terminate the path with Russian roulette.
        if bounces > ROULETTE_MIN_BOUNCES {
            let continue_probability = min(0.5, beta.y());
            if sampler.get_1d() > continue_probability {
                return PathSample::finish(l, bounces, Termination::RussianRoulette);
            }
            beta /= continue_probability;
            if !beta.is_finite() {
                return PathSample::non_finite(bounces);
            }
        }

        bounces += 1;
    }
}

/// Returns `true` for a density that can be divided by.
fn pdf_is_usable(pdf: Float) -> bool {
    pdf > 0.0 && pdf.is_finite()
}

/// Implements the unidirectional path tracing algorithm.
pub struct PathIntegrator {
    /// Common sampler integrator data.
    data: SamplerIntegratorData,

    /// Maximum number of bounces.
    max_depth: usize,

    /// Light sampling strategy.
    light_sample_strategy: LightSampleStategy,

    /// Light selection distribution built by `preprocess()`.
    light_distribution: Option<ArcLightDistribution>,
}

impl PathIntegrator {
    /// Create a new `PathIntegrator`.
    ///
    /// * `max_depth`             - Maximum number of bounces.
    /// * `camera`                - The camera.
    /// * `sampler`               - Sampler responsible for choosing point on image plane
    ///                             from which to trace rays.
    /// * `pixel_bounds`          - Pixel bounds for the image.
    /// * `light_sample_strategy` - Light sampling strategy.
    pub fn new(
        max_depth: usize,
        camera: ArcCamera,
        sampler: Box<dyn Sampler + Send + Sync>,
        pixel_bounds: Bounds2i,
        light_sample_strategy: LightSampleStategy,
    ) -> Self {
        register_stats();
        Self {
            data: SamplerIntegratorData::new(camera, sampler, pixel_bounds),
            max_depth,
            light_sample_strategy,
            light_distribution: None,
        }
    }

    /// Returns a handle that stops rendering between samples.
    pub fn abort_signal(&self) -> AbortSignal {
        self.data.abort.clone()
    }
}

impl Integrator for PathIntegrator {
    /// Builds the light selection distribution.
    ///
    /// * `scene` - The scene.
    fn preprocess(&mut self, scene: &Scene) {
        self.light_distribution = Some(create_light_sample_distribution(self.light_sample_strategy, scene));
    }

    /// Render the scene.
    ///
    /// * `scene` - The scene.
    fn render(&self, scene: &Scene) {
        if self.light_distribution.is_none() {
            warn!("Path integrator was not preprocessed; sampling lights uniformly");
        }
        self.render_tiles(scene);
    }
}

impl SamplerIntegrator for PathIntegrator {
    /// Returns the common data.
    fn get_data(&self) -> &SamplerIntegratorData {
        &self.data
    }

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - The memory arena for scattering functions.
    fn li(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump) -> Spectrum {
        path_li(ray, scene, sampler, arena, self.max_depth, self.light_distribution.as_ref()).l
    }
}

impl TryFrom<(&ParamSet, ArcCamera, Box<dyn Sampler + Send + Sync>)> for PathIntegrator {
    type Error = IntegratorError;

    /// Create a `PathIntegrator` from given parameter set, camera and sampler.
    ///
    /// * `p` - A tuple containing the parameter set, camera and sampler.
    fn try_from(p: (&ParamSet, ArcCamera, Box<dyn Sampler + Send + Sync>)) -> Result<Self, Self::Error> {
        let (params, camera, sampler) = p;

        let max_depth = params.find_one_int("maxdepth", 5);
        if max_depth < 0 {
            return Err(IntegratorError::invalid("maxdepth", max_depth, "must not be negative"));
        }

        // The sampler owns the per-pixel sample count.
        let pixel_samples = sampler.get_data().samples_per_pixel;
        if pixel_samples == 0 {
            return Err(IntegratorError::invalid("pixelsamples", pixel_samples, "must be positive"));
        }

        let sample_bounds = camera.get_data().film.get_sample_bounds();
        let pb = params.find_int("pixelbounds");
        let pixel_bounds = if pb.len() == 4 {
            let requested = Bounds2i::new(Point2i::new(pb[0], pb[2]), Point2i::new(pb[1], pb[3]));
            requested.intersect(&sample_bounds)
        } else {
            if !pb.is_empty() {
                warn!("Expected four values for 'pixelbounds'; got {}. Ignoring.", pb.len());
            }
            sample_bounds
        };
        let extent = pixel_bounds.diagonal();
        if extent.x <= 0 || extent.y <= 0 {
            return Err(IntegratorError::EmptyImage);
        }

        let strategy = LightSampleStategy::from(params.find_one_string("lightsamplestrategy", String::from("power")).as_str());

        Ok(Self::new(max_depth as usize, camera, sampler, pixel_bounds, strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scenes::*;
    use float_cmp::approx_eq;
    use samplers::RandomSampler;

    fn trace(scene: &Scene, ray: &Ray, max_depth: usize, seed: u64, n: usize) -> Vec<PathSample> {
        let arena = Bump::new();
        let mut sampler = RandomSampler::new(1, Some(seed));
        (0..n)
            .map(|_| path_li(ray, scene, &mut sampler, &arena, max_depth, None))
            .collect()
    }

    #[test]
    fn point_light_over_diffuse_floor_matches_analytic_value() {
        // Floor albedo 0.5, light intensity 4 at height 2: L = 0.5 / pi * 4 / 4.
        let scene = floor_with_point_light(0.5, 4.0, 2.0);
        let ray = Ray::unbounded(Point3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, 0.0, -1.0));
        let expected = 0.5 * INV_PI;
        for sample in trace(&scene, &ray, 5, 1, 256) {
            assert!(approx_eq!(f32, sample.l[0], expected, epsilon = 1e-4), "{:?}", sample);
            assert!(approx_eq!(f32, sample.l[2], expected, epsilon = 1e-4));
        }
    }

    #[test]
    fn max_depth_zero_sees_only_emission() {
        let scene = floor_with_point_light(0.5, 4.0, 2.0);
        let ray = Ray::unbounded(Point3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, 0.0, -1.0));
        for sample in trace(&scene, &ray, 0, 2, 8) {
            assert!(sample.l.is_black());
            assert_eq!(sample.termination, Termination::MaxDepth);
            assert_eq!(sample.bounces, 0);
        }
    }

    #[test]
    fn escaped_camera_ray_sees_environment() {
        let scene = uniform_environment(Spectrum::new(0.25));
        let ray = Ray::unbounded(Point3f::zero(), Vector3f::new(0.0, 1.0, 0.0));
        for sample in trace(&scene, &ray, 5, 3, 4) {
            assert_eq!(sample.l, Spectrum::new(0.25));
            assert_eq!(sample.termination, Termination::Escaped);
        }
    }

    #[test]
    fn directly_visible_area_light_adds_emission() {
        let scene = area_light_panel(Spectrum::new(2.0));
        let ray = Ray::unbounded(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0));
        for sample in trace(&scene, &ray, 0, 4, 4) {
            assert_eq!(sample.l, Spectrum::new(2.0));
        }
    }

    #[test]
    fn russian_roulette_never_fires_before_bounce_four() {
        let scene = closed_diffuse_sphere(0.5);
        let ray = Ray::unbounded(Point3f::zero(), Vector3f::new(0.3, 0.1, 1.0).normalize());
        let samples = trace(&scene, &ray, 64, 5, 2000);

        let roulette: Vec<_> = samples
            .iter()
            .filter(|s| s.termination == Termination::RussianRoulette)
            .collect();
        assert!(!roulette.is_empty());
        assert!(roulette.iter().all(|s| s.bounces > ROULETTE_MIN_BOUNCES));
        // Nothing emits inside the sphere.
        assert!(samples.iter().all(|s| s.l.is_black()));
    }

    #[test]
    fn subsurface_without_exit_point_is_absorbed() {
        let scene = translucent_floor(None, 4.0, 2.0);
        let ray = Ray::unbounded(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        for sample in trace(&scene, &ray, 5, 6, 16) {
            assert_eq!(sample.termination, Termination::SubsurfaceAbsorbed);
            assert_eq!(sample.bounces, 0);
            assert!(sample.l.is_black());
        }
    }

    #[test]
    fn subsurface_exit_point_receives_direct_light() {
        // Transmission 1, exit weight 0.5 / pdf 1, exit albedo 1, light I = 4 at h = 2.
        let scene = translucent_floor(Some(Spectrum::new(0.5)), 4.0, 2.0);
        let ray = Ray::unbounded(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        let expected = 0.5 * INV_PI;
        for sample in trace(&scene, &ray, 5, 7, 64) {
            assert!(approx_eq!(f32, sample.l[1], expected, epsilon = 1e-4), "{:?}", sample);
        }
    }

    #[test]
    fn non_finite_throughput_is_discarded() {
        let scene = infinite_albedo_floor();
        let ray = Ray::unbounded(Point3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        for sample in trace(&scene, &ray, 5, 8, 4) {
            assert_eq!(sample.termination, Termination::NonFinite);
            assert!(sample.l.is_black());
        }
    }

    #[test]
    fn light_distribution_is_used_when_present() {
        let scene = floor_with_point_light(0.5, 4.0, 2.0);
        let distrib = create_light_sample_distribution(LightSampleStategy::Power, &scene);
        let d = distrib.lookup(&Point3f::zero()).expect("scene has a light");
        assert!(approx_eq!(f32, d.discrete_pdf(0), 1.0));

        let arena = Bump::new();
        let mut sampler = RandomSampler::new(1, Some(9));
        let ray = Ray::unbounded(Point3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, 0.0, -1.0));
        let sample = path_li(&ray, &scene, &mut sampler, &arena, 5, Some(&distrib));
        assert!(approx_eq!(f32, sample.l[0], 0.5 * INV_PI, epsilon = 1e-4));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let camera = test_camera(4, 4);
        let sampler = || -> Box<dyn Sampler + Send + Sync> { Box::new(RandomSampler::new(1, None)) };

        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[-1]);
        let err = PathIntegrator::try_from((&params, camera.clone(), sampler())).err();
        assert_eq!(err, Some(IntegratorError::invalid("maxdepth", -1, "must not be negative")));

        let empty: Box<dyn Sampler + Send + Sync> = Box::new(RandomSampler::new(0, None));
        assert_eq!(
            PathIntegrator::try_from((&ParamSet::new(), camera.clone(), empty)).err(),
            Some(IntegratorError::invalid("pixelsamples", 0, "must be positive"))
        );

        let mut params = ParamSet::new();
        params.add_int("pixelbounds", &[10, 20, 10, 20]);
        assert_eq!(
            PathIntegrator::try_from((&params, camera.clone(), sampler())).err(),
            Some(IntegratorError::EmptyImage)
        );

        assert!(PathIntegrator::try_from((&ParamSet::new(), camera, sampler())).is_ok());
    }

    #[test]
    fn renders_uniform_environment() {
        let camera = test_camera(4, 4);
        let sampler: Box<dyn Sampler + Send + Sync> = Box::new(RandomSampler::new(2, Some(0)));
        let mut integrator =
            PathIntegrator::try_from((&ParamSet::new(), camera.clone(), sampler)).expect("valid parameters");

        let scene = uniform_environment(Spectrum::new(0.75));
        integrator.preprocess(&scene);
        integrator.render(&scene);

        for pixel in camera.get_data().film.image(1.0) {
            assert!(approx_eq!(f32, pixel[0], 0.75, epsilon = 1e-5));
        }
    }
}
