//! MLT Sampler

use core::geometry::*;
use core::pbrt::*;
use core::rng::*;
use core::sampler::*;

/// Lifecycle of a single primary sample coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SampleState {
    /// Never materialized.
    #[default]
    Unset,

    /// Holds a value belonging to the last committed iteration (or the initial
    /// state before any iteration started).
    Committed,

    /// Mutated by the pending iteration; a snapshot is held for rollback.
    Pending,
}

/// Records the current value of a single component of `X` on the interval [0,1).
#[derive(Copy, Clone, Debug, Default)]
pub struct PrimarySample {
    /// Sample value.
    pub value: Float,

    /// Iteration at which `value` was last changed.
    pub last_modification_iteration: u64,

    /// Lifecycle state.
    pub state: SampleState,

    /// Backed up sample value.
    value_backup: Float,

    /// Backed up last modification iteration.
    modify_backup: u64,

    /// Backed up lifecycle state.
    state_backup: SampleState,
}

impl PrimarySample {
    /// Backup the sample value.
    fn backup(&mut self) {
        self.value_backup = self.value;
        self.modify_backup = self.last_modification_iteration;
        self.state_backup = self.state;
    }

    /// Restore the sample value.
    fn restore(&mut self) {
        self.value = self.value_backup;
        self.last_modification_iteration = self.modify_backup;
        self.state = self.state_backup;
    }
}

/// Implements a sampler responsible for managing primary sample space state
/// vectors, mutations, and acceptance and rejection steps.
///
/// Coordinates are brought up to date lazily: a coordinate that was last
/// touched `n` iterations ago receives the `n` small step perturbations it
/// missed as one Gaussian step with standard deviation `sigma * sqrt(n)`, or a
/// fresh value if a large step was accepted since.
#[derive(Clone)]
pub struct MLTSampler {
    /// The sampler data.
    data: SamplerData,

    /// The random number generator.
    rng: RNG,

    /// Controls the size of “small step” mutations.
    sigma: Float,

    /// Probability of taking a “large step” mutation.
    large_step_probability: Float,

    /// Number of interleaved sample streams.
    stream_count: usize,

    /// Stores the current sample vector `X`.
    x: Vec<PrimarySample>,

    /// Indices of coordinates mutated by the pending iteration.
    touched: Vec<usize>,

    /// Number of committed (accepted) iterations.
    iteration: u64,

    /// Whether an iteration is pending a call to `accept()` or `reject()`.
    pending: bool,

    /// Indicates if the current iteration is a "large step" mutation.
    large_step: bool,

    /// Iteration of the last accepted large step.
    last_large_step_iteration: u64,

    /// Current stream index.
    stream_index: usize,

    /// Per stream cursor of the next sample within that stream.
    sample_index: Vec<usize>,
}

impl MLTSampler {
    /// Create a new `MLTSampler`.
    ///
    /// * `mutations_per_pixel`    - Number of iterations that MLT (on average!)
    ///                              spends in each pixel.
    /// * `rng_sequence_index`     - Supplies a unique stream index to the
    ///                              internal random number generator.
    /// * `sigma`                  - Controls the size of “small step” mutations.
    /// * `large_step_probability` - Probability of taking a “large step” mutation.
    /// * `stream_count`           - Number of sample streams to interleave.
    pub fn new(
        mutations_per_pixel: usize,
        rng_sequence_index: u64,
        sigma: Float,
        large_step_probability: Float,
        stream_count: usize,
    ) -> Self {
        let stream_count = stream_count.max(1);
        Self {
            data: SamplerData::new(mutations_per_pixel),
            rng: RNG::new(rng_sequence_index),
            sigma,
            large_step_probability,
            stream_count,
            x: Vec::new(),
            touched: Vec::new(),
            iteration: 0,
            pending: false,
            // The initial state is drawn like a large step.
            large_step: true,
            last_large_step_iteration: 0,
            stream_index: 0,
            sample_index: vec![0; stream_count],
        }
    }

    /// Returns the number of committed iterations.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Returns `true` if the pending (or initial) iteration is a large step.
    pub fn is_large_step(&self) -> bool {
        self.large_step
    }

    /// Returns the iteration of the last accepted large step.
    pub fn last_large_step_iteration(&self) -> u64 {
        self.last_large_step_iteration
    }

    /// Returns the coordinate at `index` if it was ever materialized.
    ///
    /// * `index` - Flat index into the sample vector.
    pub fn sample(&self, index: usize) -> Option<&PrimarySample> {
        self.x.get(index).filter(|s| s.state != SampleState::Unset)
    }

    /// Iteration stamp for values produced now.
    fn clock(&self) -> u64 {
        self.iteration + self.pending as u64
    }

    /// Returns a uniform value in [0, 1).
    fn uniform(&mut self) -> Float {
        self.rng.uniform_float()
    }

    /// Expands `self.x` as needed and brings the coordinate at `index` up to
    /// date with the current iteration. Returns its value.
    ///
    /// * `index` - Flat index into the sample vector.
    pub fn ensure_ready(&mut self, index: usize) -> Float {
        if index >= self.x.len() {
            self.x.resize_with(index + 1, Default::default);
        }

        let clock = self.clock();
        let current = self.x[index];

        // Already up to date; repeated reads within an iteration are stable.
        if current.state != SampleState::Unset && current.last_modification_iteration == clock {
            return current.value;
        }

        let mut xi = current;
        if self.pending {
            xi.backup();
            self.touched.push(index);
        }

        if self.large_step {
            xi.value = self.uniform();
        } else {
            // A coordinate not touched since the last accepted large step
            // takes a fresh value stamped at that large step.
            if xi.state == SampleState::Unset || xi.last_modification_iteration < self.last_large_step_iteration {
                xi.value = self.uniform();
                xi.last_modification_iteration = self.last_large_step_iteration;
            }

            // Apply all missed small steps as a single Gaussian perturbation.
            let n_small = clock - xi.last_modification_iteration;
            if n_small > 0 {
                let normal_sample = SQRT2 * erf_inv(2.0 * self.uniform() - 1.0);
                let eff_sigma = self.sigma * (n_small as Float).sqrt();
                xi.value += normal_sample * eff_sigma;
            }
            xi.value -= xi.value.floor();
            if xi.value >= 1.0 {
                xi.value = 0.0;
            }
        }

        xi.last_modification_iteration = clock;
        xi.state = if self.pending {
            SampleState::Pending
        } else {
            SampleState::Committed
        };
        self.x[index] = xi;
        xi.value
    }

    /// Begins a new pending iteration and chooses whether it is a large or a
    /// small step. Resets all stream cursors. A still pending iteration is
    /// rejected first.
    pub fn start_iteration(&mut self) {
        if self.pending {
            warn!("MLT iteration {} was neither accepted nor rejected; rejecting it", self.clock());
            self.reject();
        }
        self.pending = true;
        self.large_step = self.uniform() < self.large_step_probability;
        self.stream_index = 0;
        self.sample_index.iter_mut().for_each(|i| *i = 0);
    }

    /// Accept proposed mutation. Commits every touched coordinate and
    /// advances the iteration counter.
    pub fn accept(&mut self) {
        if !self.pending {
            warn!("MLTSampler::accept() called without a pending iteration");
            return;
        }
        self.iteration += 1;
        if self.large_step {
            self.last_large_step_iteration = self.iteration;
        }
        for &i in self.touched.iter() {
            self.x[i].state = SampleState::Committed;
        }
        self.touched.clear();
        self.pending = false;
    }

    /// Reject proposed mutation. Restores all `PrimarySample`s modified in the
    /// current iteration; the iteration counter does not advance.
    pub fn reject(&mut self) {
        if !self.pending {
            warn!("MLTSampler::reject() called without a pending iteration");
            return;
        }
        for &i in self.touched.iter() {
            self.x[i].restore();
        }
        self.touched.clear();
        self.pending = false;
    }

    /// Returns the flat index of the next sample of the current stream. Streams
    /// are interleaved: dimension `k` of stream `s` lives at
    /// `s + stream_count * k`.
    pub fn get_next_index(&mut self) -> usize {
        let cursor = &mut self.sample_index[self.stream_index];
        let next_index = self.stream_index + self.stream_count * *cursor;
        *cursor += 1;
        next_index
    }

    /// Clamps a stream index to the configured stream count.
    fn checked_stream(&self, index: usize) -> usize {
        if index < self.stream_count {
            index
        } else {
            warn!("Stream index {} out of range for {} streams", index, self.stream_count);
            self.stream_count - 1
        }
    }
}

impl Sampler for MLTSampler {
    /// Returns a shared reference underlying `SamplerData`.
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    /// Returns a mutable reference to underlying `SamplerData`.
    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    /// Generates a fresh `MLTSampler` with the same settings.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send> {
        Box::new(Self::new(
            self.data.samples_per_pixel,
            seed,
            self.sigma,
            self.large_step_probability,
            self.stream_count,
        ))
    }

    /// Returns the sample value for the next dimension of the current stream.
    fn get_1d(&mut self) -> Float {
        let index = self.get_next_index();
        self.ensure_ready(index)
    }

    /// Returns the sample value for the next two dimensions of the current stream.
    fn get_2d(&mut self) -> Point2f {
        let x = self.get_1d();
        let y = self.get_1d();
        Point2f::new(x, y)
    }

    /// Rewinds the stream and makes it current.
    ///
    /// * `index` - The stream index to start.
    fn start_stream(&mut self, index: usize) {
        let index = self.checked_stream(index);
        self.stream_index = index;
        self.sample_index[index] = 0;
    }

    /// Makes the stream current without rewinding it.
    ///
    /// * `index` - The stream index to select.
    fn select_stream(&mut self, index: usize) {
        self.stream_index = self.checked_stream(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler(seed: u64, sigma: Float, large_step_probability: Float) -> MLTSampler {
        MLTSampler::new(16, seed, sigma, large_step_probability, N_SAMPLE_STREAMS)
    }

    /// Draws `n` values from each stream starting at the beginning.
    fn draw_all(s: &mut MLTSampler, n: usize) -> Vec<Float> {
        let mut v = Vec::new();
        for stream in 0..N_SAMPLE_STREAMS {
            s.start_stream(stream);
            for _ in 0..n {
                v.push(s.get_1d());
            }
        }
        v
    }

    /// Snapshot of every materialized coordinate.
    fn snapshot(s: &MLTSampler) -> Vec<(Float, u64, SampleState)> {
        s.x.iter()
            .map(|p| (p.value, p.last_modification_iteration, p.state))
            .collect()
    }

    #[test]
    fn streams_interleave() {
        let mut s = sampler(1, 0.01, 0.3);
        s.start_stream(LIGHT_STREAM_INDEX);
        assert_eq!(s.get_next_index(), 1);
        assert_eq!(s.get_next_index(), 4);
        s.select_stream(SCATTERING_STREAM_INDEX);
        assert_eq!(s.get_next_index(), 2);
        s.select_stream(LIGHT_STREAM_INDEX);
        assert_eq!(s.get_next_index(), 7);
        s.start_stream(LIGHT_STREAM_INDEX);
        assert_eq!(s.get_next_index(), 1);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        for &sigma in &[1e-7, 1e-3, 0.5, 0.999, 1.0, 25.0] {
            for seed in 0..8 {
                let mut s = sampler(seed, sigma, 0.1);
                draw_all(&mut s, 4);
                for it in 0..200 {
                    s.start_iteration();
                    for v in draw_all(&mut s, 4 + it % 5) {
                        assert!((0.0..1.0).contains(&v), "value {} out of range for sigma {}", v, sigma);
                    }
                    if it % 3 == 0 {
                        s.reject();
                    } else {
                        s.accept();
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_get_is_idempotent() {
        let mut s = sampler(7, 0.05, 0.3);
        let initial = draw_all(&mut s, 3);
        assert_eq!(initial, draw_all(&mut s, 3));

        for _ in 0..50 {
            s.start_iteration();
            let first = draw_all(&mut s, 3);
            let second = draw_all(&mut s, 3);
            assert_eq!(first, second);
            s.accept();
        }
    }

    #[test]
    fn reject_restores_touched_coordinates() {
        let mut s = sampler(3, 0.1, 0.0);
        draw_all(&mut s, 4);
        for _ in 0..5 {
            s.start_iteration();
            draw_all(&mut s, 4);
            s.accept();
        }

        let before = snapshot(&s);
        let iteration = s.iteration();
        s.start_iteration();
        // Touch existing coordinates and grow the vector.
        draw_all(&mut s, 9);
        s.reject();

        let after = snapshot(&s);
        assert_eq!(&after[..before.len()], &before[..]);
        assert!(after[before.len()..].iter().all(|&(_, _, st)| st == SampleState::Unset));
        assert_eq!(s.iteration(), iteration);
    }

    #[test]
    fn large_step_then_reject_restores_pre_step_values() {
        let mut s = sampler(11, 0.01, 1.0);
        let initial = draw_all(&mut s, 4);
        s.start_iteration();
        assert!(s.is_large_step());
        let proposed = draw_all(&mut s, 4);
        assert_ne!(initial, proposed);
        s.reject();
        assert_eq!(s.last_large_step_iteration(), 0);

        // Reading without a pending iteration returns the committed values.
        assert_eq!(initial, draw_all(&mut s, 4));
    }

    #[test]
    fn accepted_large_step_resets_untouched_coordinates() {
        let mut s = sampler(5, 0.01, 1.0);
        draw_all(&mut s, 2);
        s.start_iteration();
        s.start_stream(CAMERA_STREAM_INDEX);
        s.get_1d();
        s.accept();
        assert_eq!(s.last_large_step_iteration(), 1);

        // Coordinate 1 was not touched by the accepted large step.
        let stale = s.x[1].last_modification_iteration;
        assert!(stale < s.last_large_step_iteration());

        s.large_step_probability = 0.0;
        s.start_iteration();
        s.start_stream(LIGHT_STREAM_INDEX);
        s.get_1d();
        assert_eq!(s.x[1].last_modification_iteration, 2);
        s.reject();
        assert_eq!(s.x[1].last_modification_iteration, stale);
    }

    #[test]
    fn small_steps_are_local() {
        let mut s = sampler(9, 1e-4, 0.0);
        let initial = draw_all(&mut s, 2);
        s.start_iteration();
        let proposed = draw_all(&mut s, 2);
        for (a, b) in initial.iter().zip(proposed.iter()) {
            let d = (a - b).abs();
            // Distance on the unit circle.
            assert!(d.min(1.0 - d) < 1e-2);
        }
    }

    #[test]
    fn unbalanced_calls_are_ignored() {
        let mut s = sampler(2, 0.01, 0.3);
        let initial = draw_all(&mut s, 2);
        s.accept();
        s.reject();
        assert_eq!(s.iteration(), 0);
        assert_eq!(initial, draw_all(&mut s, 2));

        s.start_iteration();
        draw_all(&mut s, 2);
        // A second start rejects the pending iteration.
        s.start_iteration();
        s.reject();
        assert_eq!(initial, draw_all(&mut s, 2));
    }

    #[test]
    fn random_sigmas_near_the_extremes_stay_in_unit_interval() {
        let mut rng = RNG::new(99);
        for seed in 0..64 {
            // Alternate tiny and near-unit step sizes.
            let sigma = if seed % 2 == 0 {
                1e-7 + 1e-3 * rng.uniform_float()
            } else {
                0.9 + 0.6 * rng.uniform_float()
            };
            let mut s = sampler(seed, sigma, rng.uniform_float());
            draw_all(&mut s, 3);
            for _ in 0..32 {
                s.start_iteration();
                for v in draw_all(&mut s, 3) {
                    assert!((0.0..1.0).contains(&v), "value {} out of range for sigma {}", v, sigma);
                }
                s.accept();
            }
        }
    }
}
