//! Light Distribution.

mod power;
mod uniform;

pub use power::*;
pub use uniform::*;

use crate::geometry::*;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// Light sampling strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LightSampleStategy {
    /// Sample all light sources uniformly.
    Uniform,

    /// Samples light sources according to their emitted power.
    Power,
}

impl From<&str> for LightSampleStategy {
    /// Returns a `LightSampleStrategy` given a string name.
    fn from(name: &str) -> Self {
        match name {
            "uniform" => Self::Uniform,
            "power" => Self::Power,
            _ => {
                warn!(
                    "Light sample distribution type '{}' unknown. Using 'power'.",
                    name
                );
                Self::Power
            }
        }
    }
}

/// Interface of light distribution implementations that provide probability
/// distributions for sampling light sources at a given point in space.
pub trait LightDistribution {
    /// Returns the sampling distribution for light sources at point `p`, or
    /// `None` when the scene has no lights.
    ///
    /// * `p` - The point.
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>>;
}

/// Atomic reference counted `LightDistribution `.
pub type ArcLightDistribution = Arc<dyn LightDistribution + Send + Sync>;

/// Returns a smart pointer to a new `LightDistribution` implementation.
///
/// * `strategy` - The strategy to use for light sampling.
/// * `scene`    - The scene.
pub fn create_light_sample_distribution(
    strategy: LightSampleStategy,
    scene: &Scene,
) -> ArcLightDistribution {
    let strategy = if scene.lights.len() == 1 {
        LightSampleStategy::Uniform
    } else {
        strategy
    };
    match strategy {
        LightSampleStategy::Uniform => Arc::new(UniformLightDistribution::new(scene)),
        LightSampleStategy::Power => Arc::new(PowerLightDistribution::new(scene)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_falls_back_to_power() {
        assert_eq!(LightSampleStategy::from("uniform"), LightSampleStategy::Uniform);
        assert_eq!(LightSampleStategy::from("power"), LightSampleStategy::Power);
        assert_eq!(LightSampleStategy::from("spatial"), LightSampleStategy::Power);
    }
}
