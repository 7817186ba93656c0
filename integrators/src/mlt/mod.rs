//! Metropolis Light Transport

use crate::path::*;
use bumpalo::Bump;
use core::app::options;
use core::camera::*;
use core::film::*;
use core::geometry::*;
use core::integrator::*;
use core::light_distrib::*;
use core::paramset::*;
use core::pbrt::*;
use core::rng::*;
use core::sampler::*;
use core::sampling::*;
use core::scene::*;
use core::spectrum::*;
use core::{report_stats, stat_inc, stat_percent, stat_register_fns};

mod mlt_sampler;

// Re-export.
pub use mlt_sampler::*;

stat_percent!(
    "Integrator/Acceptance rate",
    ACCEPTED_MUTATIONS,
    TOTAL_MUTATIONS,
    mlt_stats_acceptance_rate
);

stat_register_fns!(mlt_stats_acceptance_rate);

/// A path contribution evaluated at one state of a Markov chain.
#[derive(Copy, Clone, Debug, Default)]
pub struct ChainSample {
    /// Raster position the path contributes to.
    pub p_raster: Point2f,

    /// Radiance carried by the path.
    pub l: Spectrum,

    /// Scalar importance (luminance) of `l`; zero for black, negative or
    /// non-finite contributions.
    pub importance: Float,
}

impl ChainSample {
    /// Create a new `ChainSample`. Non-finite radiance is replaced by zero.
    ///
    /// * `p_raster` - Raster position.
    /// * `l`        - Radiance carried by the path.
    pub fn new(p_raster: Point2f, l: Spectrum) -> Self {
        let l = if l.is_finite() {
            l
        } else {
            warn!("Non-finite path contribution {} at raster {:?}; using zero", l, p_raster);
            Spectrum::zero()
        };
        let y = l.y();
        let importance = if y > 0.0 && y.is_finite() { y } else { 0.0 };
        Self { p_raster, l, importance }
    }
}

/// Returns the Metropolis acceptance probability for moving from a state with
/// importance `current` to one with importance `proposed`. A chain sitting on
/// a state of zero importance always moves.
///
/// * `current`  - Importance of the current state.
/// * `proposed` - Importance of the proposed state.
pub fn acceptance_probability(current: Float, proposed: Float) -> Float {
    if current <= 0.0 {
        1.0
    } else {
        min(1.0, proposed / current)
    }
}

/// Performs the splatting half of one Metropolis iteration and returns whether
/// the proposal is accepted.
///
/// Both states receive credit: the proposal in proportion to the acceptance
/// probability `a`, the current state in proportion to `1 - a`, each
/// normalized by its own importance and scaled by `b`.
///
/// * `current`  - The current chain state.
/// * `proposed` - The proposed chain state.
/// * `b`        - Normalization constant (mean bootstrap importance).
/// * `u`        - Uniform variate in [0, 1) deciding acceptance.
/// * `splat`    - Receives raster positions and weighted contributions.
pub fn metropolis_step<F>(current: &ChainSample, proposed: &ChainSample, b: Float, u: Float, mut splat: F) -> bool
where
    F: FnMut(&Point2f, &Spectrum),
{
    let a = acceptance_probability(current.importance, proposed.importance);
    if a > 0.0 && proposed.importance > 0.0 {
        splat(&proposed.p_raster, &(proposed.l * (a * b / proposed.importance)));
    }
    if a < 1.0 && current.importance > 0.0 {
        splat(&current.p_raster, &(current.l * ((1.0 - a) * b / current.importance)));
    }
    u < a
}

/// Implements Metropolis Light Transport in primary sample space on top of the
/// unidirectional path estimator.
pub struct MLTIntegrator {
    /// The camera.
    camera: ArcCamera,

    /// Maximum path depth.
    max_depth: usize,

    /// Number of bootstrap samples used to seed chains and estimate `b`.
    n_bootstrap: usize,

    /// Number of independent Markov chains.
    n_chains: usize,

    /// Number of iterations that MLT (on average!) spends in each pixel.
    mutations_per_pixel: usize,

    /// Controls the size of “small step” mutations.
    sigma: Float,

    /// Probability of taking a “large step” mutation.
    large_step_probability: Float,

    /// Light sampling strategy.
    light_sample_strategy: LightSampleStategy,

    /// Light selection distribution built by `preprocess()`.
    light_distribution: Option<ArcLightDistribution>,

    /// Raised to stop rendering between iterations.
    abort: AbortSignal,
}

impl MLTIntegrator {
    /// Create a new `MLTIntegrator`.
    ///
    /// * `camera`                 - The camera.
    /// * `max_depth`              - Maximum path depth.
    /// * `n_bootstrap`            - Number of bootstrap samples.
    /// * `n_chains`               - Number of independent Markov chains.
    /// * `mutations_per_pixel`    - Number of iterations that MLT (on average!)
    ///                              spends in each pixel.
    /// * `sigma`                  - Controls the size of “small step” mutations.
    /// * `large_step_probability` - Probability of taking a “large step” mutation.
    /// * `light_sample_strategy`  - Light sampling strategy.
    pub fn new(
        camera: ArcCamera,
        max_depth: usize,
        n_bootstrap: usize,
        n_chains: usize,
        mutations_per_pixel: usize,
        sigma: Float,
        large_step_probability: Float,
        light_sample_strategy: LightSampleStategy,
    ) -> Self {
        register_stats();
        Self {
            camera,
            max_depth,
            n_bootstrap,
            n_chains,
            mutations_per_pixel,
            sigma,
            large_step_probability,
            light_sample_strategy,
            light_distribution: None,
            abort: AbortSignal::new(),
        }
    }

    /// Returns a handle that stops rendering between iterations.
    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    /// Returns a fresh chain sampler whose initial state is determined by
    /// `seed`.
    ///
    /// * `seed` - Sequence index for the sampler's random number generator.
    fn new_sampler(&self, seed: u64) -> MLTSampler {
        MLTSampler::new(
            self.mutations_per_pixel,
            seed,
            self.sigma,
            self.large_step_probability,
            N_SAMPLE_STREAMS,
        )
    }

    /// Evaluates the path contribution for the sampler's current state. The
    /// raster position and ray time are the first variates of the camera
    /// stream.
    ///
    /// * `scene`         - The scene.
    /// * `sampler`       - The primary sample space sampler.
    /// * `arena`         - The memory arena for scattering functions.
    /// * `light_distrib` - Light selection distribution.
    pub fn l<S: Sampler + ?Sized>(
        &self,
        scene: &Scene,
        sampler: &mut S,
        arena: &Bump,
        light_distrib: Option<&ArcLightDistribution>,
    ) -> ChainSample {
        sampler.start_stream(CAMERA_STREAM_INDEX);
        let film = &self.camera.get_data().film;
        let sample_bounds = Bounds2f::from(film.get_sample_bounds());
        let p_raster = sample_bounds.lerp(&sampler.get_2d());
        let time = sampler.get_1d();

        let (ray, ray_weight) = self.camera.generate_ray(&CameraSample::new(p_raster, time));
        if ray_weight == 0.0 {
            return ChainSample::new(p_raster, Spectrum::zero());
        }

        let path = path_li(&ray, scene, sampler, arena, self.max_depth, light_distrib);
        ChainSample::new(p_raster, path.l * ray_weight)
    }

    /// Evaluates `n_bootstrap` independent samples, each with a sampler seeded
    /// by its index, and returns the distribution of their importances.
    ///
    /// * `scene`         - The scene.
    /// * `light_distrib` - Light selection distribution.
    fn bootstrap(&self, scene: &Scene, light_distrib: &ArcLightDistribution) -> Distribution1D {
        let n_threads = options().threads();
        let mut bootstrap_weights: Vec<Float> = vec![0.0; self.n_bootstrap];

        let progress = create_progress_reporter(self.n_bootstrap as u64, options().quiet);
        progress.set_message("Generating bootstrap paths");

        std::thread::scope(|scope| {
            let chunk_size = (self.n_bootstrap / 128).clamp(1, 8192);
            let (tx_collector, rx_collector) = crossbeam_channel::bounded::<(usize, Float)>(chunk_size);
            let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(chunk_size);

            // Spawn collector thread.
            let weights = bootstrap_weights.as_mut_slice();
            scope.spawn(move || {
                for (index, weight) in rx_collector.iter() {
                    weights[index] = weight;
                }
            });

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rx_worker = rx_worker.clone();
                let tx_collector = tx_collector.clone();
                let progress = &progress;
                scope.spawn(move || {
                    let mut arena = Bump::new();
                    for index in rx_worker.iter() {
                        let mut sampler = self.new_sampler(index as u64);
                        let sample = self.l(scene, &mut sampler, &arena, Some(light_distrib));
                        arena.reset();

                        if tx_collector.send((index, sample.importance)).is_err() {
                            break;
                        }
                        progress.inc(1);
                    }
                    report_stats!();
                });
            }
            drop(rx_worker);
            drop(tx_collector);

            // Send work.
            for index in 0..self.n_bootstrap {
                if self.abort.is_aborted() || tx_worker.send(index).is_err() {
                    break;
                }
            }
        });

        progress.finish_with_message("Bootstrap paths complete");
        Distribution1D::new(bootstrap_weights)
    }

    /// Runs the `chain_index`-th Markov chain for its share of the total
    /// mutation budget, splatting into `film`.
    ///
    /// * `chain_index`       - Index of the chain.
    /// * `n_total_mutations` - Mutation budget over all chains.
    /// * `scene`             - The scene.
    /// * `bootstrap`         - Distribution of bootstrap importances.
    /// * `b`                 - Normalization constant.
    /// * `light_distrib`     - Light selection distribution.
    /// * `arena`             - Per thread memory arena.
    /// * `film`              - Film receiving splats.
    fn run_chain(
        &self,
        chain_index: usize,
        n_total_mutations: u64,
        scene: &Scene,
        bootstrap: &Distribution1D,
        b: Float,
        light_distrib: &ArcLightDistribution,
        arena: &mut Bump,
        film: &Film,
    ) {
        let n_chains = self.n_chains as u64;
        let i = chain_index as u64;
        let n_chain_mutations = min((i + 1) * n_total_mutations / n_chains, n_total_mutations) - i * n_total_mutations / n_chains;

        // Select initial state from the set of bootstrap samples.
        let mut rng = RNG::new(i);
        let (bootstrap_index, _, _) = bootstrap.sample_discrete(rng.uniform_float());
        let mut sampler = self.new_sampler(bootstrap_index as u64);
        let mut current = self.l(scene, &mut sampler, arena, Some(light_distrib));
        arena.reset();

        debug!(
            "Chain {} starts from bootstrap sample {} for {} mutations",
            chain_index, bootstrap_index, n_chain_mutations
        );

        for _ in 0..n_chain_mutations {
            if self.abort.is_aborted() {
                break;
            }

            sampler.start_iteration();
            let proposed = self.l(scene, &mut sampler, arena, Some(light_distrib));
            arena.reset();

            let accepted = metropolis_step(&current, &proposed, b, rng.uniform_float(), |p, v| film.add_splat(p, v));
            stat_inc!(TOTAL_MUTATIONS, 1);
            if accepted {
                stat_inc!(ACCEPTED_MUTATIONS, 1);
                current = proposed;
                sampler.accept();
            } else {
                sampler.reject();
            }
        }
    }

    /// Writes the film with splats scaled by the mutation density.
    fn write_image(&self) {
        let film = &self.camera.get_data().film;
        if let Err(err) = film.write_image(1.0 / self.mutations_per_pixel as Float) {
            error!("Failed to write image: {}", err);
        }
    }
}

impl Integrator for MLTIntegrator {
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
        if scene.lights.is_empty() {
            warn!("Scene has no lights; writing a black image");
            self.write_image();
            return;
        }

        let light_distrib = self.light_distribution.clone().unwrap_or_else(|| {
            warn!("MLT integrator was not preprocessed; building the light distribution now");
            create_light_sample_distribution(self.light_sample_strategy, scene)
        });

        // Generate bootstrap samples and compute normalization constant `b`.
        let bootstrap = self.bootstrap(scene, &light_distrib);
        let b = bootstrap.func_int;
        info!("Bootstrap normalization b = {}", b);
        if b <= 0.0 || !b.is_finite() {
            warn!("All bootstrap paths carry zero importance; writing a black image");
            self.write_image();
            return;
        }

        // Run `n_chains` Markov chains in parallel.
        let film = &self.camera.get_data().film;
        let n_total_mutations = self.mutations_per_pixel as u64 * film.get_sample_bounds().area() as u64;
        let n_threads = options().threads();

        let progress = create_progress_reporter(self.n_chains as u64, options().quiet);
        progress.set_message("Running Markov chains");

        std::thread::scope(|scope| {
            let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_threads);

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rx_worker = rx_worker.clone();
                let progress = &progress;
                let bootstrap = &bootstrap;
                let light_distrib = &light_distrib;
                scope.spawn(move || {
                    let mut arena = Bump::new();
                    for chain_index in rx_worker.iter() {
                        self.run_chain(
                            chain_index,
                            n_total_mutations,
                            scene,
                            bootstrap,
                            b,
                            light_distrib,
                            &mut arena,
                            film,
                        );
                        progress.inc(1);
                    }
                    report_stats!();
                });
            }
            drop(rx_worker);

            // Send work.
            for chain_index in 0..self.n_chains {
                if self.abort.is_aborted() || tx_worker.send(chain_index).is_err() {
                    break;
                }
            }
        });

        if self.abort.is_aborted() {
            progress.abandon_with_message("Render aborted");
        } else {
            progress.finish_with_message("Render complete");
        }

        self.write_image();
    }
}

impl TryFrom<(&ParamSet, ArcCamera)> for MLTIntegrator {
    type Error = IntegratorError;

    /// Create a `MLTIntegrator` from given parameter set and camera.
    ///
    /// * `p` - A tuple containing parameter set and camera.
    fn try_from(p: (&ParamSet, ArcCamera)) -> Result<Self, Self::Error> {
        let (params, camera) = p;

        let max_depth = params.find_one_int("maxdepth", 5);
        if max_depth < 0 {
            return Err(IntegratorError::invalid("maxdepth", max_depth, "must not be negative"));
        }

        let n_bootstrap = params.find_one_int("bootstrapsamples", 100000);
        if n_bootstrap <= 0 {
            return Err(IntegratorError::invalid("bootstrapsamples", n_bootstrap, "must be positive"));
        }

        let n_chains = params.find_one_int("chains", 1000);
        if n_chains <= 0 {
            return Err(IntegratorError::invalid("chains", n_chains, "must be positive"));
        }

        let mutations_per_pixel = params.find_one_int("mutationsperpixel", 100);
        if mutations_per_pixel <= 0 {
            return Err(IntegratorError::invalid(
                "mutationsperpixel",
                mutations_per_pixel,
                "must be positive",
            ));
        }

        let large_step_probability = params.find_one_float("largestepprobability", 0.3);
        if !(0.0..=1.0).contains(&large_step_probability) {
            return Err(IntegratorError::invalid(
                "largestepprobability",
                large_step_probability,
                "must lie in [0, 1]",
            ));
        }

        let sigma = params.find_one_float("sigma", 0.01);
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(IntegratorError::invalid("sigma", sigma, "must be positive and finite"));
        }

        if camera.get_data().film.get_sample_bounds().area() <= 0 {
            return Err(IntegratorError::EmptyImage);
        }

        let light_sample_strategy =
            LightSampleStategy::from(params.find_one_string("lightsamplestrategy", String::from("power")).as_str());

        let (mut n_bootstrap, mut n_chains, mut mutations_per_pixel) =
            (n_bootstrap as usize, n_chains as usize, mutations_per_pixel as usize);
        if options().quick_render {
            n_bootstrap = max(1, n_bootstrap / 10);
            n_chains = max(1, n_chains / 10);
            mutations_per_pixel = min(mutations_per_pixel, 8);
        }

        Ok(Self::new(
            camera,
            max_depth as usize,
            n_bootstrap,
            n_chains,
            mutations_per_pixel,
            sigma,
            large_step_probability,
            light_sample_strategy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scenes::*;
    use float_cmp::approx_eq;
    use samplers::RandomSampler;

    fn chain_sample(x: Float, l: Float) -> ChainSample {
        ChainSample::new(Point2f::new(x, 0.5), Spectrum::new(l))
    }

    #[test]
    fn acceptance_from_zero_importance_is_certain() {
        assert_eq!(acceptance_probability(0.0, 0.0), 1.0);
        assert_eq!(acceptance_probability(0.0, 3.0), 1.0);
        assert_eq!(acceptance_probability(2.0, 0.0), 0.0);
        assert_eq!(acceptance_probability(2.0, 1.0), 0.5);
        assert_eq!(acceptance_probability(1.0, 4.0), 1.0);
    }

    #[test]
    fn non_finite_contribution_has_no_importance() {
        let sample = chain_sample(0.0, INFINITY);
        assert!(sample.l.is_black());
        assert_eq!(sample.importance, 0.0);

        let sample = chain_sample(0.0, -1.0);
        assert_eq!(sample.importance, 0.0);
    }

    #[test]
    fn step_splats_both_states_by_acceptance() {
        let current = chain_sample(1.5, 2.0);
        let proposed = chain_sample(2.5, 1.0);
        let (i_cur, i_prop) = (current.importance, proposed.importance);
        let a = i_prop / i_cur;

        let mut splats = Vec::new();
        let accepted = metropolis_step(&current, &proposed, 3.0, 0.4, |p, v| splats.push((*p, *v)));
        assert!(accepted);
        assert_eq!(splats.len(), 2);

        assert_eq!(splats[0].0, proposed.p_raster);
        assert!(approx_eq!(f32, splats[0].1[0], a * 3.0, epsilon = 1e-5));
        assert_eq!(splats[1].0, current.p_raster);
        assert!(approx_eq!(f32, splats[1].1[0], (1.0 - a) * 3.0 * 2.0 / i_cur, epsilon = 1e-5));

        assert!(!metropolis_step(&current, &proposed, 3.0, 0.6, |_, _| {}));
    }

    #[test]
    fn zero_importance_proposal_is_rejected() {
        let current = chain_sample(1.5, 2.0);
        let proposed = chain_sample(2.5, 0.0);

        let mut splats = Vec::new();
        for &u in &[0.0, 0.5, ONE_MINUS_EPSILON] {
            assert!(!metropolis_step(&current, &proposed, 1.0, u, |p, v| splats.push((*p, *v))));
        }
        // Only the current state is credited, with weight b / importance.
        assert_eq!(splats.len(), 3);
        for (p, v) in splats {
            assert_eq!(p, current.p_raster);
            assert!(approx_eq!(f32, v.y(), 1.0, epsilon = 1e-5));
        }
    }

    #[test]
    fn empirical_acceptance_rate_matches_importance_ratio() {
        let current = chain_sample(0.0, 2.0);
        let proposed = chain_sample(0.0, 0.5);
        let expected = proposed.importance / current.importance;

        let mut rng = RNG::new(17);
        let n = 20_000;
        let accepted = (0..n)
            .filter(|_| metropolis_step(&current, &proposed, 1.0, rng.uniform_float(), |_, _| {}))
            .count();
        let rate = accepted as Float / n as Float;
        assert!((rate - expected).abs() < 0.02, "rate {} expected {}", rate, expected);
    }

    fn integrator(camera: ArcCamera, bootstrap: Int, chains: Int, mpp: Int) -> MLTIntegrator {
        let mut params = ParamSet::new();
        params.add_int("bootstrapsamples", &[bootstrap]);
        params.add_int("chains", &[chains]);
        params.add_int("mutationsperpixel", &[mpp]);
        MLTIntegrator::try_from((&params, camera)).expect("valid parameters")
    }

    #[test]
    fn replaying_initial_state_reproduces_bootstrap_sample() {
        let scene = area_light_panel(Spectrum::new(2.0));
        let camera = test_camera(8, 8);
        let mut mlt = integrator(camera, 16, 2, 4);
        mlt.preprocess(&scene);
        let distrib = mlt.light_distribution.clone();
        let arena = Bump::new();

        let mut first = mlt.new_sampler(5);
        let a = mlt.l(&scene, &mut first, &arena, distrib.as_ref());
        let mut second = mlt.new_sampler(5);
        let b = mlt.l(&scene, &mut second, &arena, distrib.as_ref());
        assert_eq!(a.p_raster, b.p_raster);
        assert_eq!(a.l, b.l);

        // A rejected mutation leaves the chain on the same path.
        second.start_iteration();
        let _ = mlt.l(&scene, &mut second, &arena, distrib.as_ref());
        second.reject();
        let c = mlt.l(&scene, &mut second, &arena, distrib.as_ref());
        assert_eq!(a.p_raster, c.p_raster);
        assert_eq!(a.l, c.l);
    }

    #[test]
    fn uniform_environment_renders_to_its_radiance() {
        let le = Spectrum::new(0.75);
        let scene = uniform_environment(le);
        let camera = test_camera(8, 8);
        let mpp = 4;
        let mut mlt = integrator(camera.clone(), 64, 4, mpp);
        mlt.preprocess(&scene);
        mlt.render(&scene);

        let image = camera.get_data().film.image(1.0 / mpp as Float);
        let mean = image.iter().map(|s| s[0]).sum::<Float>() / image.len() as Float;
        assert!(approx_eq!(f32, mean, 0.75, epsilon = 1e-3), "mean {}", mean);
    }

    /// Mean of the given pixels in an 8x8 image.
    fn region_mean(image: &[Spectrum], pixels: &[(usize, usize)]) -> Float {
        pixels.iter().map(|&(x, y)| image[y * 8 + x][0]).sum::<Float>() / pixels.len() as Float
    }

    #[test]
    fn matches_path_tracing_where_importance_varies() {
        // Radiance falls from about 2.35 under the light to 0.48 in the corners.
        let scene = floor_with_point_light(0.5, 4.0, 0.5);
        let centre = [(3, 3), (4, 3), (3, 4), (4, 4)];
        let corners = [(0, 0), (7, 0), (0, 7), (7, 7)];

        let path_camera = overhead_camera(8, 8, 1.0);
        let sampler: Box<dyn Sampler + Send + Sync> = Box::new(RandomSampler::new(64, Some(3)));
        let mut path = PathIntegrator::try_from((&ParamSet::new(), path_camera.clone(), sampler))
            .expect("valid parameters");
        path.preprocess(&scene);
        path.render(&scene);
        let reference = path_camera.get_data().film.image(1.0);
        assert!(approx_eq!(f32, region_mean(&reference, &centre), 2.353, epsilon = 0.05));
        assert!(approx_eq!(f32, region_mean(&reference, &corners), 0.482, epsilon = 0.015));

        let mlt_camera = overhead_camera(8, 8, 1.0);
        let mpp = 512;
        let mut mlt = integrator(mlt_camera.clone(), 4096, 8, mpp);
        mlt.preprocess(&scene);
        mlt.render(&scene);
        let image = mlt_camera.get_data().film.image(1.0 / mpp as Float);

        let mean = |img: &[Spectrum]| img.iter().map(|s| s[0]).sum::<Float>() / img.len() as Float;
        let (expected, actual) = (mean(&reference), mean(&image));
        assert!((actual - expected).abs() < 0.05 * expected, "mean {} expected {}", actual, expected);

        for (region, tolerance) in [(&centre, 0.1), (&corners, 0.25)] {
            let expected = region_mean(&reference, region);
            let actual = region_mean(&image, region);
            assert!(
                (actual - expected).abs() < tolerance * expected,
                "region {:?}: {} expected {}",
                region,
                actual,
                expected
            );
        }
    }

    #[test]
    fn scene_without_lights_renders_black() {
        let scene = closed_diffuse_sphere(0.5);
        let camera = test_camera(4, 4);
        let mlt = integrator(camera.clone(), 8, 2, 2);
        mlt.render(&scene);
        assert!(camera.get_data().film.image(0.5).iter().all(|s| s.is_black()));
    }

    #[test]
    fn aborted_render_still_writes() {
        let scene = uniform_environment(Spectrum::new(1.0));
        let camera = test_camera(4, 4);
        let mut mlt = integrator(camera.clone(), 8, 2, 2);
        mlt.preprocess(&scene);
        mlt.abort_signal().abort();
        mlt.render(&scene);
        assert!(camera.get_data().film.image(0.5).iter().all(|s| s.is_black()));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let camera = test_camera(4, 4);
        let check = |name: &str, int: Option<Int>, float: Option<Float>| {
            let mut params = ParamSet::new();
            if let Some(v) = int {
                params.add_int(name, &[v]);
            }
            if let Some(v) = float {
                params.add_float(name, &[v]);
            }
            match MLTIntegrator::try_from((&params, camera.clone())) {
                Err(IntegratorError::InvalidParameter { name: n, .. }) => assert_eq!(n, name),
                Err(err) => panic!("unexpected error {}", err),
                Ok(_) => panic!("'{}' should be rejected", name),
            }
        };

        check("maxdepth", Some(-1), None);
        check("bootstrapsamples", Some(0), None);
        check("chains", Some(-3), None);
        check("mutationsperpixel", Some(0), None);
        check("sigma", None, Some(0.0));
        check("sigma", None, Some(INFINITY));
        check("largestepprobability", None, Some(1.5));
        check("largestepprobability", None, Some(-0.1));

        let mut params = ParamSet::new();
        params.add_int("maxdepth", &[0]);
        assert!(MLTIntegrator::try_from((&params, camera)).is_ok());
    }
}
