//! Geometric Primitives

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::primitive::*;

/// GeometricPrimitive represents a single shape in a scene.
#[derive(Clone)]
pub struct GeometricPrimitive {
    /// The shape.
    pub shape: ArcShape,

    /// The material.
    pub material: Option<ArcMaterial>,

    /// Optional area light that describes emmission characterisitics if it
    /// emits light.
    pub area_light: Option<ArcLight>,
}

impl GeometricPrimitive {
    /// Create a new geometric primitive.
    ///
    /// * `shape`      - The shape.
    /// * `material`   - The material.
    /// * `area_light` - Optional area light that describes emmission
    ///                  characterisitics if it emits light.
    pub fn new(shape: ArcShape, material: Option<ArcMaterial>, area_light: Option<ArcLight>) -> Self {
        Self {
            shape,
            material,
            area_light,
        }
    }
}

impl Primitive for GeometricPrimitive {
    fn world_bound(&self) -> Bounds3f {
        self.shape.world_bound()
    }

    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        let mut it = self.shape.intersect(r)?;
        r.t_max = it.t;
        it.isect.primitive = Some(self);
        Some(it.isect)
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.shape.intersect_p(r)
    }

    fn get_area_light(&self) -> Option<ArcLight> {
        self.area_light.clone()
    }

    fn get_material(&self) -> Option<ArcMaterial> {
        self.material.clone()
    }
}
