//! Bidirectional scattering surface reflectance distribution function.

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::scene::*;
use crate::spectrum::*;
use bumpalo::Bump;

/// Result of importance sampling an exit point for subsurface transport.
pub struct BSSRDFSample<'scene, 'arena> {
    /// The BSSRDF value between entry and exit point.
    pub s: Spectrum,

    /// The exit point.
    pub si: SurfaceInteraction<'scene>,

    /// Scattering at the exit point; used for the continued walk.
    pub bsdf: BSDF<'arena>,

    /// Probability density of sampling the exit point.
    pub pdf: Float,
}

/// BSSRDF trait provides common behavior for subsurface light transport.
pub trait BSSRDF {
    /// Samples an exit point for light entering the surface at the point the
    /// BSSRDF was created for. Returns `None` when no exit point was found.
    ///
    /// * `scene` - The scene used to probe for exit points.
    /// * `u1`    - Sample value for choosing the probe axis.
    /// * `u2`    - Sample values for placing the probe.
    /// * `arena` - The memory arena used for the exit BSDF.
    fn sample_s<'scene, 'arena>(
        &self,
        scene: &'scene Scene,
        u1: Float,
        u2: &Point2f,
        arena: &'arena Bump,
    ) -> Option<BSSRDFSample<'scene, 'arena>>;
}
