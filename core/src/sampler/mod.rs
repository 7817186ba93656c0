//! Sampler

mod common;

use crate::camera::CameraSample;
use crate::geometry::{Point2f, Point2i};
use crate::pbrt::Float;

// Re-export
pub use common::*;

/// Logical stream for camera/film variates.
pub const CAMERA_STREAM_INDEX: usize = 0;

/// Logical stream for light selection and light sampling variates.
pub const LIGHT_STREAM_INDEX: usize = 1;

/// Logical stream for BSDF, subsurface and Russian roulette variates.
pub const SCATTERING_STREAM_INDEX: usize = 2;

/// Number of logical streams interleaved by samplers that support them.
pub const N_SAMPLE_STREAMS: usize = 3;

/// Sampler interface. A sampler is the uniform variate source consumed by
/// the light transport estimators.
pub trait Sampler {
    /// Returns a shared reference underlying `SamplerData`.
    fn get_data(&self) -> &SamplerData;

    /// Returns a mutable reference to underlying `SamplerData`.
    fn get_data_mut(&mut self) -> &mut SamplerData;

    /// Generates a new instance of an initial `Sampler` for use by a rendering thread.
    ///
    /// * `seed` - The seed for the random number generator (if any).
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send>;

    /// This should be called when the rendering algorithm is ready to start working on a given pixel.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i) {
        self.get_data_mut().start_pixel(p);
    }

    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f;

    /// Returns an initialized `CameraSample` for a given pixel.
    ///
    /// * `p_raster` - The pixel.
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        let film_sample = self.get_2d();
        let p_film = Point2f::new(p_raster.x as Float + film_sample.x, p_raster.y as Float + film_sample.y);
        let time = self.get_1d();
        CameraSample::new(p_film, time)
    }

    /// Reset the current sample dimension counter. Returns `true` if `current_pixel_sample_index` <
    /// `samples_per_pixel`; otherwise `false`.
    fn start_next_sample(&mut self) -> bool {
        self.get_data_mut().start_next_sample()
    }

    /// Rewinds the given logical stream and makes it the current one. Samplers
    /// without stream support ignore this.
    ///
    /// * `_index` - The stream index.
    fn start_stream(&mut self, _index: usize) {}

    /// Makes the given logical stream current without rewinding it. Samplers
    /// without stream support ignore this.
    ///
    /// * `_index` - The stream index.
    fn select_stream(&mut self, _index: usize) {}
}

// Implement `Sampler` so `Box<dyn Sampler + Send>` can be passed where a generic sampler is expected.
impl<S: Sampler + ?Sized> Sampler for Box<S> {
    #[inline]
    fn get_data(&self) -> &SamplerData {
        (**self).get_data()
    }

    #[inline]
    fn get_data_mut(&mut self) -> &mut SamplerData {
        (**self).get_data_mut()
    }

    #[inline]
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send> {
        (**self).clone_sampler(seed)
    }

    #[inline]
    fn start_pixel(&mut self, p: &Point2i) {
        (**self).start_pixel(p);
    }

    #[inline]
    fn get_1d(&mut self) -> Float {
        (**self).get_1d()
    }

    #[inline]
    fn get_2d(&mut self) -> Point2f {
        (**self).get_2d()
    }

    #[inline]
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        (**self).get_camera_sample(p_raster)
    }

    #[inline]
    fn start_next_sample(&mut self) -> bool {
        (**self).start_next_sample()
    }

    #[inline]
    fn start_stream(&mut self, index: usize) {
        (**self).start_stream(index);
    }

    #[inline]
    fn select_stream(&mut self, index: usize) {
        (**self).select_stream(index);
    }
}
