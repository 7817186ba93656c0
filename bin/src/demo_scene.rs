//! Built-in demo scene

use core::geometry::*;
use core::light::*;
use core::material::*;
use core::paramset::*;
use core::pbrt::*;
use core::primitive::*;
use core::primitives::*;
use core::scene::*;
use lights::{DiffuseAreaLight, PointLight, UniformInfiniteLight};
use materials::{MatteMaterial, MirrorMaterial};
use shapes::{Quad, Sphere};
use std::sync::Arc;

/// Returns a parameter set with the given float triples.
///
/// * `values` - Name and value of each triple.
fn triples(values: &[(&str, [Float; 3])]) -> ParamSet {
    let mut params = ParamSet::new();
    for (name, v) in values {
        params.add_float(name, v);
    }
    params
}

/// Returns a parameter set with a single RGB spectrum.
///
/// * `name` - Parameter name.
/// * `rgb`  - RGB value.
fn rgb(name: &str, rgb: [Float; 3]) -> ParamSet {
    let mut params = ParamSet::new();
    params.add_rgb_spectrum(name, &rgb);
    params
}

/// Returns the camera parameters looking at the demo scene.
pub fn camera_params() -> ParamSet {
    let mut params = triples(&[
        ("from", [0.0, 2.0, -7.0]),
        ("to", [0.0, 1.0, 0.0]),
        ("up", [0.0, 1.0, 0.0]),
    ]);
    params.add_float("fov", &[40.0]);
    params
}

/// Builds a ground quad with a matte and a mirror sphere, lit by a quad area
/// light, a point light and a dim uniform environment.
pub fn build() -> Scene {
    let matte_ground: ArcMaterial = Arc::new(MatteMaterial::from(&rgb("Kd", [0.6, 0.6, 0.55])));
    let matte_red: ArcMaterial = Arc::new(MatteMaterial::from(&rgb("Kd", [0.7, 0.15, 0.1])));
    let mirror: ArcMaterial = Arc::new(MirrorMaterial::from(&rgb("Kr", [0.9, 0.9, 0.9])));

    let ground: ArcShape = Arc::new(Quad::from(&triples(&[
        ("p0", [-10.0, 0.0, -10.0]),
        ("e1", [0.0, 0.0, 20.0]),
        ("e2", [20.0, 0.0, 0.0]),
    ])));

    let mut params = ParamSet::new();
    params.add_float("center", &[-1.1, 1.0, 0.0]);
    params.add_float("radius", &[1.0]);
    let red_sphere: ArcShape = Arc::new(Sphere::from(&params));

    let mut params = ParamSet::new();
    params.add_float("center", &[1.2, 0.8, 0.6]);
    params.add_float("radius", &[0.8]);
    let mirror_sphere: ArcShape = Arc::new(Sphere::from(&params));

    // Emitting panel above the spheres facing down.
    let panel: ArcShape = Arc::new(Quad::from(&triples(&[
        ("p0", [-1.0, 4.0, -1.0]),
        ("e1", [2.0, 0.0, 0.0]),
        ("e2", [0.0, 0.0, 2.0]),
    ])));
    let panel_light: ArcLight = Arc::new(DiffuseAreaLight::from((&rgb("L", [8.0, 8.0, 7.0]), Arc::clone(&panel))));

    let mut params = rgb("I", [12.0, 10.0, 8.0]);
    params.add_float("from", &[3.0, 5.0, -3.0]);
    let point_light: ArcLight = Arc::new(PointLight::from(&params));

    let sky: ArcLight = Arc::new(UniformInfiniteLight::from(&rgb("L", [0.03, 0.04, 0.06])));

    let primitives: Vec<ArcPrimitive> = vec![
        Arc::new(GeometricPrimitive::new(ground, Some(matte_ground), None)),
        Arc::new(GeometricPrimitive::new(red_sphere, Some(Arc::clone(&matte_red)), None)),
        Arc::new(GeometricPrimitive::new(mirror_sphere, Some(mirror), None)),
        Arc::new(GeometricPrimitive::new(panel, Some(matte_red), Some(Arc::clone(&panel_light)))),
    ];
    info!("Demo scene has {} primitives", primitives.len());

    Scene::new(Arc::new(PrimitiveList::new(primitives)), vec![panel_light, point_light, sky])
}
