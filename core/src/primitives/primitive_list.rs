//! Primitive List

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::primitive::*;
use crate::{stat_counter, stat_inc, stat_register_fns};

stat_counter!("Intersections/Primitive list tests", N_PRIMITIVE_TESTS, primitive_list_stats_tests);

stat_register_fns!(primitive_list_stats_tests);

/// A linear aggregate that tests every primitive for each ray.
pub struct PrimitiveList {
    /// The primitives.
    primitives: Vec<ArcPrimitive>,

    /// Union of the primitive bounds.
    bounds: Bounds3f,
}

impl PrimitiveList {
    /// Create a new aggregate.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<ArcPrimitive>) -> Self {
        register_stats();
        let bounds = primitives
            .iter()
            .fold(Bounds3f::empty(), |b, p| b.union(&p.world_bound()));
        Self { primitives, bounds }
    }
}

impl Primitive for PrimitiveList {
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        // Each hit shortens `r.t_max` so the last hit found is the closest.
        let mut closest = None;
        for primitive in self.primitives.iter() {
            stat_inc!(N_PRIMITIVE_TESTS, 1);
            if let Some(si) = primitive.intersect(r) {
                closest = Some(si);
            }
        }
        closest
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(r))
    }

    fn get_area_light(&self) -> Option<ArcLight> {
        warn!("PrimitiveList::get_area_light() should not be called");
        None
    }

    fn get_material(&self) -> Option<ArcMaterial> {
        warn!("PrimitiveList::get_material() should not be called");
        None
    }
}
