//! Common

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::sampler::*;
use crate::sampling::*;
use crate::scene::*;
use crate::spectrum::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Samples one light in the scene for direct lighting and divides by the
/// probability of choosing it. Consumes one 1D and two 2D variates from the
/// sampler's current stream in that order, even when the result is zero.
///
/// * `si`            - The surface interaction.
/// * `bsdf`          - The BSDF at the surface interaction.
/// * `scene`         - The scene.
/// * `sampler`       - The sampler.
/// * `light_distrib` - Light selection distribution; uniform when `None`.
pub fn uniform_sample_one_light<S: Sampler + ?Sized>(
    si: &SurfaceInteraction,
    bsdf: &BSDF,
    scene: &Scene,
    sampler: &mut S,
    light_distrib: Option<&Distribution1D>,
) -> Spectrum {
    let n_lights = scene.lights.len();
    if n_lights == 0 {
        return Spectrum::zero();
    }

    let u_select = sampler.get_1d();
    let u_light = sampler.get_2d();
    let u_scattering = sampler.get_2d();

    let (light_num, light_pdf) = if let Some(ld) = light_distrib {
        let (ln, pdf, _) = ld.sample_discrete(u_select);
        (ln, pdf)
    } else {
        let ln = min(u_select * n_lights as Float, n_lights as Float - 1.0) as usize;
        (ln, 1.0 / n_lights as Float)
    };
    if light_pdf == 0.0 {
        return Spectrum::zero();
    }

    let light = &scene.lights[light_num];
    estimate_direct(si, bsdf, &u_scattering, light, &u_light, scene, false) / light_pdf
}

/// Compute a direct lighting estimate for a light source sample by applying
/// multiple importance sampling.
///
/// * `si`           - The surface interaction.
/// * `bsdf`         - The BSDF at the surface interaction.
/// * `u_scattering` - Scattering sample.
/// * `light`        - The light.
/// * `u_light`      - Light sample.
/// * `scene`        - The scene.
/// * `specular`     - Indicates whether perfectly specular lobes should be
///                    considered.
pub fn estimate_direct(
    si: &SurfaceInteraction,
    bsdf: &BSDF,
    u_scattering: &Point2f,
    light: &ArcLight,
    u_light: &Point2f,
    scene: &Scene,
    specular: bool,
) -> Spectrum {
    let bsdf_flags = if specular {
        BxDFType::BSDF_ALL
    } else {
        BxDFType::BSDF_ALL & !BxDFType::BSDF_SPECULAR
    };
    let hit = &si.hit;
    let mut ld = Spectrum::zero();

    // Sample light source with multiple importance sampling.
    if let Some(Li {
        wi,
        pdf: light_pdf,
        visibility,
        value,
    }) = light.sample_li(hit, u_light)
    {
        if light_pdf > 0.0 && !value.is_black() {
            let f = bsdf.f(&hit.wo, &wi, bsdf_flags) * abs_dot(&wi, &si.shading.n);
            let scattering_pdf = bsdf.pdf(&hit.wo, &wi, bsdf_flags);

            if !f.is_black() && visibility.unoccluded(scene) {
                if light.is_delta_light() {
                    ld += f * value / light_pdf;
                } else {
                    let weight = power_heuristic(1, light_pdf, 1, scattering_pdf);
                    ld += f * value * weight / light_pdf;
                }
            } else {
                debug!("  light sample blocked or outside BSDF support");
            }
        }
    }

    // Sample BSDF with multiple importance sampling.
    if !light.is_delta_light() {
        let BxDFSample {
            f,
            pdf: scattering_pdf,
            wi,
            sampled_type,
        } = bsdf.sample_f(&hit.wo, u_scattering, bsdf_flags);
        let f = f * abs_dot(&wi, &si.shading.n);
        let sampled_specular = sampled_type.contains(BxDFType::BSDF_SPECULAR);

        if !f.is_black() && scattering_pdf > 0.0 {
            let mut weight = 1.0;
            if !sampled_specular {
                let light_pdf = light.pdf_li(hit, &wi);
                if light_pdf == 0.0 {
                    return ld;
                }
                weight = power_heuristic(1, scattering_pdf, 1, light_pdf);
            }

            // Add light contribution from material sampling.
            let mut ray = hit.spawn_ray(&wi);
            let li = match scene.intersect(&mut ray) {
                Some(light_isect) => match light_isect.primitive.and_then(|p| p.get_area_light()) {
                    Some(area_light) if same_light(&area_light, light) => light_isect.le(&(-wi)),
                    _ => Spectrum::zero(),
                },
                None => light.le(&ray),
            };

            if !li.is_black() {
                ld += f * li * weight / scattering_pdf;
            }
        }
    }

    ld
}

/// Returns `true` if both handles refer to the same light.
fn same_light(a: &ArcLight, b: &ArcLight) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Returns a progress bar for a rendering phase. The bar is hidden when quiet
/// mode is enabled.
///
/// * `len`   - Number of work units.
/// * `quiet` - Hide the progress bar.
pub fn create_progress_reporter(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress
}
