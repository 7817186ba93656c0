//! Camera

use crate::film::*;
use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::sync::Arc;

/// Camera trait provides common behavior.
pub trait Camera {
    /// Returns the common camera data.
    fn get_data(&self) -> &CameraData;

    /// Returns a ray corresponding to a given sample. It also returns, a floating
    /// point value that affects how much the radiance arriving at the film plane
    /// will contribute to final image.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float);
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;

/// Stores all of the sample values needed to specify a camera ray.
#[derive(Copy, Clone, Default, Debug)]
pub struct CameraSample {
    /// Point on the film to which the generated ray carries radiance.
    pub p_film: Point2f,

    /// Time at which the ray should sample the scene. This should be linearly
    /// interpolated between shutter open and close time range.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - Point on the film to which the generated ray carries radiance.
    /// * `time`   - Time at which the ray should sample the scene.
    pub fn new(p_film: Point2f, time: Float) -> Self {
        Self { p_film, time }
    }
}

impl fmt::Display for CameraSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ p_film: ({}, {}), time: {} ]",
            self.p_film.x, self.p_film.y, self.time
        )
    }
}

/// Stores common camera data.
pub struct CameraData {
    /// Shutter open time.
    pub shutter_open: Float,

    /// Shutter close time.
    pub shutter_close: Float,

    /// The film to capture the rendered image.
    pub film: Arc<Film>,
}

impl CameraData {
    /// Create a new instance of `CameraData`.
    ///
    /// * `shutter_open`  - Shutter open time.
    /// * `shutter_close` - Shutter close time.
    /// * `film`          - The film to capture the rendered image.
    pub fn new(shutter_open: Float, shutter_close: Float, film: Arc<Film>) -> Self {
        let (shutter_open, shutter_close) = if shutter_close < shutter_open {
            warn!(
                "Shutter close time {} < shutter open {}. Swapping them.",
                shutter_close, shutter_open
            );
            (shutter_close, shutter_open)
        } else {
            (shutter_open, shutter_close)
        };

        Self {
            shutter_open,
            shutter_close,
            film,
        }
    }

    /// Returns the ray time for a sample's time value in `[0, 1)`.
    ///
    /// * `u` - The sample's time value.
    pub fn ray_time(&self, u: Float) -> Float {
        lerp(u, self.shutter_open, self.shutter_close)
    }
}
