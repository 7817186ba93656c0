//! Small scenes shared by integrator tests.

use bumpalo::Bump;
use cameras::PerspectiveCamera;
use core::bssrdf::*;
use core::camera::*;
use core::film::*;
use core::geometry::*;
use core::interaction::*;
use core::light::*;
use core::material::*;
use core::pbrt::*;
use core::primitive::*;
use core::primitives::*;
use core::reflection::*;
use core::scene::*;
use core::spectrum::*;
use lights::{DiffuseAreaLight, PointLight, UniformInfiniteLight};
use materials::MatteMaterial;
use shapes::{Quad, Sphere};
use std::sync::Arc;

/// A 20x20 floor in the z = 0 plane facing +z.
fn floor(material: ArcMaterial) -> ArcPrimitive {
    let quad = Quad::new(
        Point3f::new(-10.0, -10.0, 0.0),
        Vector3f::new(20.0, 0.0, 0.0),
        Vector3f::new(0.0, 20.0, 0.0),
        false,
    );
    Arc::new(GeometricPrimitive::new(Arc::new(quad), Some(material), None))
}

fn scene(primitives: Vec<ArcPrimitive>, lights: Vec<ArcLight>) -> Scene {
    Scene::new(Arc::new(PrimitiveList::new(primitives)), lights)
}

/// Returns a camera with a 60 degree field of view and a film that is never
/// written to disk.
///
/// * `pos`    - Camera position.
/// * `look`   - Point the camera looks at.
/// * `width`  - Image width.
/// * `height` - Image height.
fn camera(pos: Point3f, look: Point3f, width: Int, height: Int) -> ArcCamera {
    let film = Film::new(
        &Point2i::new(width, height),
        &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
        "",
        None,
        None,
    );
    Arc::new(PerspectiveCamera::new(
        pos,
        look,
        Vector3f::new(0.0, 1.0, 0.0),
        60.0,
        0.0,
        1.0,
        Arc::new(film),
    ))
}

/// Returns a camera at the origin looking down +z.
///
/// * `width`  - Image width.
/// * `height` - Image height.
pub fn test_camera(width: Int, height: Int) -> ArcCamera {
    camera(Point3f::zero(), Point3f::new(0.0, 0.0, 1.0), width, height)
}

/// Returns a camera above the origin looking straight down at the z = 0 floor.
///
/// * `width`     - Image width.
/// * `height`    - Image height.
/// * `elevation` - Camera height above the floor.
pub fn overhead_camera(width: Int, height: Int, elevation: Float) -> ArcCamera {
    camera(Point3f::new(0.0, 0.0, elevation), Point3f::zero(), width, height)
}

/// A diffuse floor lit by a point light straight above the origin.
///
/// * `albedo`    - Floor reflectance.
/// * `intensity` - Light intensity.
/// * `height`    - Light height above the floor.
pub fn floor_with_point_light(albedo: Float, intensity: Float, height: Float) -> Scene {
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(albedo), Spectrum::zero()));
    let light: ArcLight = Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, height),
        Spectrum::new(intensity),
    ));
    scene(vec![floor(matte)], vec![light])
}

/// Constant environment radiance with a small sphere behind the test camera
/// so the scene has finite bounds.
///
/// * `le` - Environment radiance.
pub fn uniform_environment(le: Spectrum) -> Scene {
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(0.5), Spectrum::zero()));
    let sphere = Sphere::new(Point3f::new(0.0, 0.0, -10.0), 0.5, false);
    let prim: ArcPrimitive = Arc::new(GeometricPrimitive::new(Arc::new(sphere), Some(matte), None));
    let light: ArcLight = Arc::new(UniformInfiniteLight::new(le));
    scene(vec![prim], vec![light])
}

/// A one-sided emitting panel at z = 1 facing the origin.
///
/// * `le` - Emitted radiance.
pub fn area_light_panel(le: Spectrum) -> Scene {
    let quad: ArcShape = Arc::new(Quad::new(
        Point3f::new(-1.0, -1.0, 1.0),
        Vector3f::new(0.0, 2.0, 0.0),
        Vector3f::new(2.0, 0.0, 0.0),
        false,
    ));
    let light: ArcLight = Arc::new(DiffuseAreaLight::new(le, Arc::clone(&quad), false));
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(0.5), Spectrum::zero()));
    let prim: ArcPrimitive = Arc::new(GeometricPrimitive::new(quad, Some(matte), Some(Arc::clone(&light))));
    scene(vec![prim], vec![light])
}

/// The inside of a unit sphere around the origin with no light sources.
///
/// * `albedo` - Reflectance of the inner surface.
pub fn closed_diffuse_sphere(albedo: Float) -> Scene {
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(albedo), Spectrum::zero()));
    let sphere = Sphere::new(Point3f::zero(), 1.0, true);
    let prim: ArcPrimitive = Arc::new(GeometricPrimitive::new(Arc::new(sphere), Some(matte), None));
    scene(vec![prim], vec![])
}

/// Sends all subsurface transport to a fixed exit point at the origin.
struct FixedExitBSSRDF {
    /// Exit weight with unit density; `None` means no exit point was found.
    weight: Option<Spectrum>,
}

impl BSSRDF for FixedExitBSSRDF {
    fn sample_s<'scene, 'arena>(
        &self,
        _scene: &'scene Scene,
        _u1: Float,
        _u2: &Point2f,
        arena: &'arena Bump,
    ) -> Option<BSSRDFSample<'scene, 'arena>> {
        let s = self.weight?;
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let hit = Hit::new(
            Point3f::zero(),
            0.0,
            Vector3f::new(1e-6, 1e-6, 1e-6),
            Vector3f::new(0.0, 0.0, 1.0),
            n,
        );
        let si = SurfaceInteraction::new(hit, Point2f::zero(), Vector3f::new(1.0, 0.0, 0.0), None);
        let mut bsdf = BSDF::new(arena, &si, None);
        bsdf.add(LambertianReflection::alloc(arena, Spectrum::one()));
        Some(BSSRDFSample { s, si, bsdf, pdf: 1.0 })
    }
}

/// Fully transmissive surface with a fixed-exit BSSRDF.
struct TranslucentMaterial {
    exit_weight: Option<Spectrum>,
}

impl Material for TranslucentMaterial {
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(arena, si, None);
        bsdf.add(LambertianTransmission::alloc(arena, Spectrum::one()));
        let bssrdf: &'arena dyn BSSRDF = arena.alloc(FixedExitBSSRDF {
            weight: self.exit_weight,
        });
        ScatteringFunctions {
            bsdf: Some(bsdf),
            bssrdf: Some(bssrdf),
        }
    }
}

/// A translucent floor whose subsurface exit point is the origin, lit by a
/// point light above it.
///
/// * `exit_weight` - BSSRDF value at the exit point, or `None` to absorb.
/// * `intensity`   - Light intensity.
/// * `height`      - Light height above the floor.
pub fn translucent_floor(exit_weight: Option<Spectrum>, intensity: Float, height: Float) -> Scene {
    let material: ArcMaterial = Arc::new(TranslucentMaterial { exit_weight });
    let light: ArcLight = Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, height),
        Spectrum::new(intensity),
    ));
    scene(vec![floor(material)], vec![light])
}

/// Diffuse reflector with unbounded albedo.
struct UnboundedMaterial;

impl Material for UnboundedMaterial {
    fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        si: &SurfaceInteraction,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(arena, si, None);
        bsdf.add(LambertianReflection::alloc(arena, Spectrum::new(INFINITY)));
        ScatteringFunctions {
            bsdf: Some(bsdf),
            bssrdf: None,
        }
    }
}

/// A floor whose first bounce makes the path throughput infinite.
pub fn infinite_albedo_floor() -> Scene {
    scene(vec![floor(Arc::new(UnboundedMaterial))], vec![])
}
