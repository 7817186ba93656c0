//! Film

use crate::geometry::{Bounds2f, Bounds2i, Point2f, Point2i};
use crate::image_io::write_image;
use crate::parallel::AtomicFloat;
use crate::pbrt::{Float, Int, INFINITY};
use crate::spectrum::Spectrum;
use crate::{stat_inc, stat_memory_counter, stat_register_fns};
use std::sync::atomic::Ordering;
use std::sync::Mutex;

mod film_tile;

// Re-export.
pub use film_tile::*;

stat_memory_counter!("Memory/Film pixels", FILM_PIXEL_MEMORY, film_stats_pixels);

stat_register_fns!(film_stats_pixels);

/// Pixel data.
#[derive(Copy, Clone, Default, Debug)]
pub struct Pixel {
    /// Running weighted sum of RGB sample contributions.
    pub rgb: [Float; 3],

    /// Sum of sample weights for the pixel.
    pub weight_sum: Float,
}

/// Models the sensing device of the camera. Stores per-pixel weighted sample
/// sums merged from `FilmTile`s and an independent additive splat buffer that
/// many threads may update concurrently.
pub struct Film {
    /// The overall image resolution in pixels.
    pub full_resolution: Point2i,

    /// Filename of output image. Empty to skip writing.
    pub filename: String,

    /// Crop window of the subset of the image to render.
    pub cropped_pixel_bounds: Bounds2i,

    /// Scale factor for pixel values.
    scale: Float,

    /// Maximum sample luminence.
    max_sample_luminance: Float,

    /// Weighted pixel sums.
    pixels: Mutex<Vec<Pixel>>,

    /// Unweighted RGB splat sums.
    splats: Vec<[AtomicFloat; 3]>,
}

impl Film {
    /// Create a new `Film` instance.
    ///
    /// * `resolution`           - The overall image resolution in pixels.
    /// * `crop_window`          - Crop window in NDC space of the subset of the image to render.
    /// * `filename`             - Filename of output image.
    /// * `scale`                - Optional scale factor for pixel values. Defaults to 1.0.
    /// * `max_sample_luminance` - Optional maximum sample luminence. Defaults to `INFINITY`.
    pub fn new(
        resolution: &Point2i,
        crop_window: &Bounds2f,
        filename: &str,
        scale: Option<Float>,
        max_sample_luminance: Option<Float>,
    ) -> Self {
        register_stats();

        let cropped_pixel_bounds = Bounds2i::new(
            Point2i::new(
                (resolution.x as Float * crop_window.p_min.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_min.y).ceil() as Int,
            ),
            Point2i::new(
                (resolution.x as Float * crop_window.p_max.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_max.y).ceil() as Int,
            ),
        );
        debug!("Created film with full resolution {resolution:?}, crop window {cropped_pixel_bounds:?}");

        let n = cropped_pixel_bounds.area() as usize;
        let pixels = Mutex::new(vec![Pixel::default(); n]);
        let splats = (0..n).map(|_| Default::default()).collect();
        stat_inc!(
            FILM_PIXEL_MEMORY,
            (n * (std::mem::size_of::<Pixel>() + std::mem::size_of::<[AtomicFloat; 3]>())) as u64
        );

        Self {
            full_resolution: *resolution,
            filename: String::from(filename),
            cropped_pixel_bounds,
            scale: scale.unwrap_or(1.0),
            max_sample_luminance: max_sample_luminance.unwrap_or(INFINITY),
            pixels,
            splats,
        }
    }

    /// Returns the bounds of pixels that samples must be generated for. Each
    /// sample lands in exactly one pixel so this is the cropped pixel bounds.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        self.cropped_pixel_bounds
    }

    /// Returns the offset of a pixel in the cropped pixel storage.
    ///
    /// * `p` - The pixel.
    pub fn get_pixel_offset(&self, p: &Point2i) -> usize {
        let width = self.cropped_pixel_bounds.p_max.x - self.cropped_pixel_bounds.p_min.x;
        ((p.y - self.cropped_pixel_bounds.p_min.y) * width + (p.x - self.cropped_pixel_bounds.p_min.x)) as usize
    }

    /// Returns a `FilmTile` for the pixels in `sample_bounds` clipped to the
    /// image.
    ///
    /// * `sample_bounds` - Tile bounds in pixels.
    pub fn get_film_tile(&self, sample_bounds: &Bounds2i) -> FilmTile {
        let tile_bounds = sample_bounds.intersect(&self.cropped_pixel_bounds);
        FilmTile::new(tile_bounds, self.max_sample_luminance)
    }

    /// Merge the `FilmTile`'s pixel contribution into the image.
    ///
    /// * `tile` - The `FilmTile` to merge.
    pub fn merge_film_tile(&self, tile: &FilmTile) {
        let mut pixels = self.pixels.lock().unwrap_or_else(|e| e.into_inner());
        for p in tile.get_pixel_bounds().iter() {
            let tile_pixel = &tile.pixels[tile.get_pixel_offset(&p)];
            let merge_pixel = &mut pixels[self.get_pixel_offset(&p)];
            let rgb = tile_pixel.contrib_sum.to_rgb();
            for (i, c) in rgb.iter().enumerate() {
                merge_pixel.rgb[i] += c;
            }
            merge_pixel.weight_sum += tile_pixel.weight_sum;
        }
    }

    /// Atomically adds a splat contribution to the pixel containing `p`.
    /// Splats with NaN, negative or infinite luminance are ignored.
    ///
    /// * `p` - Continuous raster position.
    /// * `v` - Contribution.
    pub fn add_splat(&self, p: &Point2f, v: &Spectrum) {
        if v.has_nans() {
            warn!("Ignoring splatted spectrum with NaN values at ({}, {})", p.x, p.y);
            return;
        }

        let vy = v.y();
        if vy < 0.0 {
            warn!("Ignoring splatted spectrum with negative luminance {vy} at ({}, {})", p.x, p.y);
            return;
        }
        if !v.is_finite() {
            warn!("Ignoring splatted spectrum with infinite luminance at ({}, {})", p.x, p.y);
            return;
        }

        let pi = Point2i::from(p.floor());
        if !self.cropped_pixel_bounds.contains_exclusive(&pi) {
            return;
        }

        let v = if vy > self.max_sample_luminance {
            *v * (self.max_sample_luminance / vy)
        } else {
            *v
        };

        let splat = &self.splats[self.get_pixel_offset(&pi)];
        for (i, c) in v.to_rgb().iter().enumerate() {
            splat[i].add(*c);
        }
    }

    /// Resets the splat buffer to zero.
    pub fn clear_splats(&self) {
        for splat in self.splats.iter() {
            for c in splat.iter() {
                c.store(0.0, Ordering::SeqCst);
            }
        }
    }

    /// Returns the final pixel values for the cropped image in scanline order:
    /// the weighted average of merged samples plus the splat sum scaled by
    /// `splat_scale`, all multiplied by the film scale.
    ///
    /// * `splat_scale` - Scale factor for splats.
    pub fn image(&self, splat_scale: Float) -> Vec<Spectrum> {
        let pixels = self.pixels.lock().unwrap_or_else(|e| e.into_inner());
        pixels
            .iter()
            .zip(self.splats.iter())
            .map(|(pixel, splat)| {
                let mut rgb = pixel.rgb;
                if pixel.weight_sum != 0.0 {
                    let inv_wt = 1.0 / pixel.weight_sum;
                    rgb.iter_mut().for_each(|c| *c = (*c * inv_wt).max(0.0));
                }
                for (i, c) in rgb.iter_mut().enumerate() {
                    *c += splat_scale * splat[i].load(Ordering::SeqCst);
                    *c *= self.scale;
                }
                Spectrum::from_rgb(rgb[0], rgb[1], rgb[2])
            })
            .collect()
    }

    /// Computes the final image and writes it to `filename`. Does nothing
    /// when the filename is empty.
    ///
    /// * `splat_scale` - Scale factor for splats.
    pub fn write_image(&self, splat_scale: Float) -> Result<(), String> {
        if self.filename.is_empty() {
            debug!("No output file specified; skipping image write");
            return Ok(());
        }

        info!("Computing final weighted pixel values");
        let rgb: Vec<Float> = self.image(splat_scale).iter().flat_map(|s| s.to_rgb()).collect();
        write_image(&self.filename, &rgb, &self.cropped_pixel_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn film(w: Int, h: Int) -> Film {
        Film::new(
            &Point2i::new(w, h),
            &Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            "",
            None,
            None,
        )
    }

    #[test]
    fn splats_accumulate_and_scale() {
        let film = film(4, 2);
        film.add_splat(&Point2f::new(1.5, 0.5), &Spectrum::new(1.0));
        film.add_splat(&Point2f::new(1.2, 0.9), &Spectrum::new(2.0));
        let img = film.image(0.5);
        let offset = film.get_pixel_offset(&Point2i::new(1, 0));
        assert!(approx_eq!(Float, img[offset][0], 1.5, epsilon = 1e-6));
        assert!(img[0].is_black());
    }

    #[test]
    fn invalid_splats_are_ignored() {
        let film = film(2, 2);
        film.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(Float::NAN));
        film.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(Float::INFINITY));
        film.add_splat(&Point2f::new(0.5, 0.5), &Spectrum::new(-1.0));
        film.add_splat(&Point2f::new(5.5, 0.5), &Spectrum::new(1.0));
        assert!(film.image(1.0).iter().all(|s| s.is_black()));
    }

    #[test]
    fn merged_tiles_are_weighted_averages() {
        let film = film(2, 2);
        let mut tile = film.get_film_tile(&film.get_sample_bounds());
        tile.add_sample(&Point2f::new(0.5, 1.5), &Spectrum::new(1.0), 1.0);
        tile.add_sample(&Point2f::new(0.25, 1.25), &Spectrum::new(3.0), 1.0);
        film.merge_film_tile(&tile);
        let img = film.image(1.0);
        let offset = film.get_pixel_offset(&Point2i::new(0, 1));
        assert!(approx_eq!(Float, img[offset][1], 2.0, epsilon = 1e-6));
    }

    #[test]
    fn crop_window_limits_pixels() {
        let film = Film::new(
            &Point2i::new(10, 10),
            &Bounds2f::new(Point2f::new(0.0, 0.5), Point2f::new(0.5, 1.0)),
            "",
            None,
            None,
        );
        assert_eq!(film.cropped_pixel_bounds.area(), 25);
        assert_eq!(film.image(1.0).len(), 25);
    }
}
