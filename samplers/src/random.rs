//! Random Sampler.

use core::app::options;
use core::geometry::*;
use core::paramset::*;
use core::pbrt::*;
use core::rng::*;
use core::sampler::*;

/// Implements a sampler that uses a PRNG to generate uniformly random samples.
pub struct RandomSampler {
    /// The common sampler data.
    pub data: SamplerData,

    /// The random number generator.
    pub rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Optional seed for the random number generator.
    pub fn new(samples_per_pixel: usize, seed: Option<u64>) -> Self {
        Self {
            data: SamplerData::new(samples_per_pixel),
            rng: seed.map_or_else(RNG::default, RNG::new),
        }
    }
}

impl Sampler for RandomSampler {
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send> {
        Box::new(Self::new(self.data.samples_per_pixel, Some(seed)))
    }

    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    fn get_2d(&mut self) -> Point2f {
        let x = self.rng.uniform_float();
        let y = self.rng.uniform_float();
        Point2f::new(x, y)
    }
}

impl From<&ParamSet> for RandomSampler {
    /// Create a `RandomSampler` from given parameter set. Quick render mode
    /// uses a single sample per pixel.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let mut samples_per_pixel = params.find_one_int("pixelsamples", 4);
        if samples_per_pixel <= 0 {
            warn!("pixelsamples {} is not positive. Using 1.", samples_per_pixel);
            samples_per_pixel = 1;
        }
        if options().quick_render {
            samples_per_pixel = 1;
        }
        Self::new(samples_per_pixel as usize, None)
    }
}
