#[macro_use]
extern crate log;

mod demo_scene;

use cameras::PerspectiveCamera;
use clap::Parser;
use core::app::*;
use core::camera::*;
use core::film::*;
use core::geometry::*;
use core::integrator::*;
use core::paramset::*;
use core::pbrt::*;
use core::print_stats;
use core::report_stats;
use core::sampler::*;
use integrators::{MLTIntegrator, PathIntegrator};
use samplers::RandomSampler;
use std::sync::Arc;

fn main() {
    let opts = Options::parse();

    // Initialize `env_logger`; quiet mode only reports errors.
    let default_filter = if opts.quiet { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if init_options(opts).is_err() {
        warn!("Options were already initialized");
    }

    if let Err(e) = render() {
        error!("{e}");
        std::process::exit(1);
    }

    report_stats!();
    if !options().quiet {
        print_stats!();
    }
}

/// Translates the command line options into integrator parameters.
fn integrator_params() -> ParamSet {
    let opts = options();
    let mut params = ParamSet::new();
    params.add_int("maxdepth", &[opts.maxdepth]);
    params.add_int("pixelsamples", &[opts.pixelsamples]);
    params.add_int("bootstrapsamples", &[opts.bootstrapsamples]);
    params.add_int("chains", &[opts.chains]);
    params.add_int("mutationsperpixel", &[opts.mutationsperpixel]);
    params.add_float("largestepprobability", &[opts.largestepprobability]);
    params.add_float("sigma", &[opts.sigma]);
    params
}

/// Returns the crop window from the options, or the full image.
fn crop_window() -> Bounds2f {
    match options().crop_window.as_slice() {
        &[x0, x1, y0, y1] => {
            let c = |v: Float| v.clamp(0.0, 1.0);
            Bounds2f::new(Point2f::new(c(x0), c(y0)), Point2f::new(c(x1), c(y1)))
        }
        _ => Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
    }
}

/// Builds the demo scene and renders it with the selected integrator.
fn render() -> Result<(), IntegratorError> {
    let opts = options();
    if opts.xresolution <= 0 || opts.yresolution <= 0 {
        return Err(IntegratorError::EmptyImage);
    }

    let film = Arc::new(Film::new(
        &Point2i::new(opts.xresolution, opts.yresolution),
        &crop_window(),
        &opts.image_file,
        None,
        None,
    ));
    let camera: ArcCamera = Arc::new(PerspectiveCamera::from((&demo_scene::camera_params(), film)));
    let params = integrator_params();

    let mut integrator: Box<dyn Integrator> = match opts.integrator {
        IntegratorName::Path => {
            let sampler: Box<dyn Sampler + Send + Sync> = Box::new(RandomSampler::from(&params));
            Box::new(PathIntegrator::try_from((&params, camera, sampler))?)
        }
        IntegratorName::Mlt => Box::new(MLTIntegrator::try_from((&params, camera))?),
    };

    info!("Rendering demo scene with the '{}' integrator", opts.integrator.as_str());
    let scene = demo_scene::build();
    integrator.preprocess(&scene);
    integrator.render(&scene);
    Ok(())
}
