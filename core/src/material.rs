//! Material

use crate::bssrdf::*;
use crate::interaction::*;
use crate::reflection::*;
use bumpalo::Bump;
use std::sync::Arc;

// Light transport mode enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportMode {
    /// Indicates incident ray that intersected a point started at the camera.
    Radiance,

    /// Indicates incident ray that intersected a point started at the light
    /// source.
    Importance,
}

/// The scattering functions at a surface point. Both are absent for surfaces
/// that only delimit regions of space.
#[derive(Default)]
pub struct ScatteringFunctions<'arena> {
    /// The BSDF.
    pub bsdf: Option<BSDF<'arena>>,

    /// The BSSRDF for translucent materials.
    pub bssrdf: Option<&'arena dyn BSSRDF>,
}

/// Material trait provides common behavior.
pub trait Material {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `si`    - The surface interaction at the intersection.
    /// * `mode`  - Transport mode.
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        mode: TransportMode,
    ) -> ScatteringFunctions<'arena>;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
