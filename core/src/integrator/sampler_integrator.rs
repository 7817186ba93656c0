//! Sampler Integrator

use super::*;
use crate::app::options;
use crate::camera::*;
use crate::film::FilmTile;
use crate::geometry::*;
use crate::pbrt::*;
use crate::report_stats;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;
use bumpalo::Bump;

/// Common data for sampler integrators.
pub struct SamplerIntegratorData {
    /// Sampler responsible for choosing points on the image plane from which
    /// to trace rays and for supplying sample positions used by integrators.
    pub sampler: Box<dyn Sampler + Send + Sync>,

    /// The camera.
    pub camera: ArcCamera,

    /// Pixel bounds for the image.
    pub pixel_bounds: Bounds2i,

    /// Raised to stop rendering between samples.
    pub abort: AbortSignal,
}

impl SamplerIntegratorData {
    /// Create a new `SamplerIntegratorData`.
    ///
    /// * `camera`       - The camera.
    /// * `sampler`      - Sampler responsible for choosing point on image plane
    ///                    from which to trace rays.
    /// * `pixel_bounds` - Pixel bounds for the image.
    pub fn new(
        camera: ArcCamera,
        sampler: Box<dyn Sampler + Send + Sync>,
        pixel_bounds: Bounds2i,
    ) -> Self {
        Self {
            camera,
            sampler,
            pixel_bounds,
            abort: AbortSignal::new(),
        }
    }
}

/// Implements the basis of a rendering process driven by a stream of samples
/// from a `Sampler`. Each sample identifies a point on the image plane at
/// which we compute the light arriving from the scene.
pub trait SamplerIntegrator: Integrator + Send + Sync {
    /// Returns the common data.
    fn get_data(&self) -> &SamplerIntegratorData;

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - The memory arena for scattering functions.
    fn li(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump) -> Spectrum;

    /// Render the scene in image tiles distributed over worker threads and
    /// write the image.
    ///
    /// * `scene` - The scene.
    fn render_tiles(&self, scene: &Scene) {
        let data = self.get_data();
        let film = &data.camera.get_data().film;

        // Compute number of tiles, `n_tiles`, to use for parallel rendering.
        let sample_bounds = film.get_sample_bounds();
        let sample_extent = sample_bounds.diagonal();
        let tile_size = options().tile_size.max(1) as Int;
        let n_tiles = Point2::new(
            ((sample_extent.x + tile_size - 1) / tile_size) as usize,
            ((sample_extent.y + tile_size - 1) / tile_size) as usize,
        );
        let tile_count = n_tiles.x * n_tiles.y;
        let n_threads = options().threads();

        info!("Rendering {}x{} tiles with {} threads", n_tiles.x, n_tiles.y, n_threads);

        let progress = create_progress_reporter(tile_count as u64, options().quiet);
        progress.set_message("Rendering scene");

        std::thread::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded(n_threads);

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rxc = rx.clone();
                let progress = &progress;
                scope.spawn(move || {
                    let mut arena = Bump::new();
                    for tile_idx in rxc.iter() {
                        let film_tile =
                            self.render_tile(tile_idx, n_tiles, scene, sample_bounds, tile_size, &mut arena);
                        film.merge_film_tile(&film_tile);
                        progress.inc(1);
                    }
                    report_stats!();
                });
            }
            drop(rx);

            // Send work.
            for tile_idx in 0..tile_count {
                if data.abort.is_aborted() || tx.send(tile_idx).is_err() {
                    break;
                }
            }
        });

        if data.abort.is_aborted() {
            progress.abandon_with_message("Render aborted");
        } else {
            progress.finish_with_message("Render complete");
        }

        if let Err(err) = film.write_image(1.0) {
            error!("Failed to write image: {}", err);
        }
    }

    /// Render an image tile.
    ///
    /// * `tile_idx`      - Unique tile index.
    /// * `n_tiles`       - Number of tiles in (x, y) direction.
    /// * `scene`         - Scene.
    /// * `sample_bounds` - Sample bounds.
    /// * `tile_size`     - Tile size in pixels.
    /// * `arena`         - Per thread memory arena.
    fn render_tile(
        &self,
        tile_idx: usize,
        n_tiles: Point2<usize>,
        scene: &Scene,
        sample_bounds: Bounds2i,
        tile_size: Int,
        arena: &mut Bump,
    ) -> FilmTile {
        let tile_x = (tile_idx % n_tiles.x) as Int;
        let tile_y = (tile_idx / n_tiles.x) as Int;

        let data = self.get_data();
        let camera = &data.camera;
        let film = &camera.get_data().film;

        // Get sampler instance for tile.
        let mut tile_sampler = data.sampler.clone_sampler(tile_idx as u64);

        // Compute sample bounds for tile.
        let x0 = sample_bounds.p_min.x + tile_x * tile_size;
        let x1 = min(x0 + tile_size, sample_bounds.p_max.x);
        let y0 = sample_bounds.p_min.y + tile_y * tile_size;
        let y1 = min(y0 + tile_size, sample_bounds.p_max.y);
        let tile_bounds = Bounds2i::new(Point2i::new(x0, y0), Point2i::new(x1, y1));

        debug!("Starting image tile ({}, {}) -> {:?}", tile_x, tile_y, tile_bounds);

        let mut film_tile = film.get_film_tile(&tile_bounds);

        for pixel in tile_bounds.iter() {
            if data.abort.is_aborted() {
                break;
            }

            tile_sampler.start_pixel(&pixel);

            // Do this check after the start_pixel() call; this keeps the
            // usage of RNG values consistent.
            if !data.pixel_bounds.contains_exclusive(&pixel) {
                continue;
            }

            loop {
                let camera_sample = tile_sampler.get_camera_sample(&pixel);
                let (mut ray, ray_weight) = camera.generate_ray(&camera_sample);

                let mut l = if ray_weight > 0.0 {
                    self.li(&mut ray, scene, &mut *tile_sampler, arena)
                } else {
                    Spectrum::zero()
                };

                // Issue warning if unexpected radiance value returned.
                let sample_index = tile_sampler.get_data().current_pixel_sample_index;
                if l.has_nans() {
                    error!(
                        "Not-a-number radiance value returned for pixel ({}, {}), sample {}. Setting to black.",
                        pixel.x, pixel.y, sample_index
                    );
                    l = Spectrum::zero();
                } else if l.y() < -1e-5 {
                    error!(
                        "Negative luminance value, {}, returned for pixel ({}, {}), sample {}. Setting to black.",
                        l.y(),
                        pixel.x,
                        pixel.y,
                        sample_index
                    );
                    l = Spectrum::zero();
                } else if l.y().is_infinite() {
                    error!(
                        "Infinite luminance value returned for pixel ({}, {}), sample {}. Setting to black.",
                        pixel.x, pixel.y, sample_index
                    );
                    l = Spectrum::zero();
                }

                film_tile.add_sample(&camera_sample.p_film, &l, ray_weight);

                // Free memory used by scattering functions for this sample.
                arena.reset();

                if !tile_sampler.start_next_sample() {
                    break;
                }
            }
        }

        debug!("Finished image tile ({}, {})", tile_x, tile_y);

        film_tile
    }
}
