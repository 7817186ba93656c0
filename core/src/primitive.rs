//! Primitive

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use bumpalo::Bump;
use std::sync::Arc;

/// Primitive trait bridges the geometry and shading subsystems.
pub trait Primitive {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns geometric details if a ray intersects the primitive and updates
    /// the t_max parameter of the ray. If there is no intersection, `None` is
    /// returned.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>>;

    /// Returns `true` if a ray-primitive intersection succeeds; otherwise `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool;

    /// Returns the light describing the primitive's emission distribution, if
    /// the primitive is itself a light source.
    fn get_area_light(&self) -> Option<ArcLight>;

    /// Returns the material assigned to the primitive. A primitive without a
    /// material does not scatter light.
    fn get_material(&self) -> Option<ArcMaterial>;

    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `arena` - The memory arena used for allocations.
    /// * `si`    - The surface interaction at the intersection.
    /// * `mode`  - Transport mode.
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        mode: TransportMode,
    ) -> ScatteringFunctions<'arena> {
        self.get_material()
            .map_or_else(ScatteringFunctions::default, |material| {
                material.compute_scattering_functions(arena, si, mode)
            })
    }
}

/// Atomic reference counted `Primitive`.
pub type ArcPrimitive = Arc<dyn Primitive + Send + Sync>;

