//! Integrator

mod abort;
mod common;
mod error;
mod sampler_integrator;

use crate::scene::Scene;

// Re-export.
pub use abort::*;
pub use common::*;
pub use error::*;
pub use sampler_integrator::*;

/// Integrator interface.
pub trait Integrator {
    /// Preprocess the scene before rendering; builds per-scene sampling
    /// structures such as the light selection distribution.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, _scene: &Scene) {}

    /// Render the scene and write the finished image to the camera's film.
    ///
    /// * `scene` - The scene.
    fn render(&self, scene: &Scene);
}
