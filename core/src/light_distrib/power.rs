//! Power Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// PowerLightDistribution returns a distribution with sampling probability
/// proportional to the total emitted power for each light, ignoring the
/// provided point. Works well when the most powerful lights are also the most
/// important contributors.
pub struct PowerLightDistribution {
    distrib: Option<Arc<Distribution1D>>,
}

impl PowerLightDistribution {
    /// Create a new instance of `PowerLightDistribution`.
    ///
    /// * `scene` - The scene.
    pub fn new(scene: &Scene) -> Self {
        Self {
            distrib: compute_light_power_distribution(scene).map(Arc::new),
        }
    }
}

impl LightDistribution for PowerLightDistribution {
    fn lookup(&self, _p: &Point3f) -> Option<Arc<Distribution1D>> {
        self.distrib.as_ref().map(Arc::clone)
    }
}

/// Returns a distribution over the scene lights proportional to the
/// luminance of their power. Falls back to uniform when every light reports
/// zero power.
///
/// * `scene` - The scene.
pub fn compute_light_power_distribution(scene: &Scene) -> Option<Distribution1D> {
    if scene.lights.is_empty() {
        return None;
    }

    let light_power: Vec<_> = scene.lights.iter().map(|light| light.power().y()).collect();
    if light_power.iter().all(|&p| p <= 0.0) {
        warn!("All lights report zero power. Sampling lights uniformly.");
        return Some(Distribution1D::new(vec![1.0; scene.lights.len()]));
    }
    Some(Distribution1D::new(light_power))
}
