//! Surface Interactions

use super::Hit;
use crate::geometry::*;
use crate::material::*;
use crate::primitive::*;
use crate::spectrum::*;
use bumpalo::Bump;

/// SurfaceInteraction represents geometry of a particular point on a surface.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing primitive.
#[derive(Clone)]
pub struct SurfaceInteraction<'scene> {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Shading geometry.
    pub shading: Shading,

    /// The primitive that was hit.
    pub primitive: Option<&'scene dyn Primitive>,
}

impl<'scene> SurfaceInteraction<'scene> {
    /// Create a new surface interaction. Shading geometry starts out equal to
    /// the geometric frame.
    ///
    /// * `hit`       - The hit data.
    /// * `uv`        - The uv coordinates from surface parametrization.
    /// * `dpdu`      - Parametric partial derivative of the point ∂p/∂u.
    /// * `primitive` - The primitive.
    pub fn new(
        hit: Hit,
        uv: Point2f,
        dpdu: Vector3f,
        primitive: Option<&'scene dyn Primitive>,
    ) -> Self {
        Self {
            hit,
            uv,
            shading: Shading { n: hit.n, dpdu },
            primitive,
        }
    }

    /// Returns the emitted radiance at the surface point leaving in direction
    /// `w`. Zero unless the primitive carries an area light.
    ///
    /// * `w` - The outgoing direction.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        self.primitive
            .and_then(|p| p.get_area_light())
            .map_or_else(Spectrum::zero, |area| area.l(&self.hit, w))
    }

    /// Computes the scattering functions of the surface material.
    ///
    /// * `arena` - The memory arena used for allocations.
    /// * `mode`  - Transport mode.
    pub fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        mode: TransportMode,
    ) -> ScatteringFunctions<'arena> {
        self.primitive
            .map_or_else(ScatteringFunctions::default, |p| {
                p.compute_scattering_functions(arena, self, mode)
            })
    }
}

/// Shading geometry used for perturbed values.
#[derive(Copy, Clone, Debug, Default)]
pub struct Shading {
    /// Shading surface normal.
    pub n: Normal3f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,
}
