//! Film Tile

use crate::geometry::{Bounds2i, Point2f, Point2i};
use crate::pbrt::{Float, Int};
use crate::spectrum::Spectrum;

/// Accumulated contribution of the samples that landed in one tile pixel.
#[derive(Copy, Clone, Default, Debug)]
pub struct FilmTilePixel {
    /// Sum of weighted sample contributions.
    pub contrib_sum: Spectrum,

    /// Sum of sample weights.
    pub weight_sum: Float,
}

/// A region of the image owned by a single rendering thread until it is
/// merged back into the `Film`.
pub struct FilmTile {
    /// Bounds of the pixels in the tile.
    pixel_bounds: Bounds2i,

    /// Maximum sample luminance; brighter samples are scaled down.
    max_sample_luminance: Float,

    /// The pixels.
    pub pixels: Vec<FilmTilePixel>,
}

impl FilmTile {
    /// Create a new `FilmTile`.
    ///
    /// * `pixel_bounds`         - Bounds of the pixels in the tile.
    /// * `max_sample_luminance` - Maximum sample luminance.
    pub fn new(pixel_bounds: Bounds2i, max_sample_luminance: Float) -> Self {
        let n = pixel_bounds.area().max(0) as usize;
        Self {
            pixel_bounds,
            max_sample_luminance,
            pixels: vec![FilmTilePixel::default(); n],
        }
    }

    /// Adds a radiance sample to the pixel containing `p_film`. Each sample
    /// contributes only to the pixel it lands in.
    ///
    /// * `p_film`        - Continuous film coordinates of the sample.
    /// * `l`             - Radiance.
    /// * `sample_weight` - Weight returned by the camera for the sample.
    pub fn add_sample(&mut self, p_film: &Point2f, l: &Spectrum, sample_weight: Float) {
        let p = Point2i::from(p_film.floor());
        if !self.pixel_bounds.contains_exclusive(&p) {
            return;
        }

        let ly = l.y();
        let l = if ly > self.max_sample_luminance {
            *l * (self.max_sample_luminance / ly)
        } else {
            *l
        };

        let offset = self.get_pixel_offset(&p);
        let pixel = &mut self.pixels[offset];
        pixel.contrib_sum += l * sample_weight;
        pixel.weight_sum += sample_weight;
    }

    /// Returns the offset of a pixel within `pixels`.
    ///
    /// * `p` - The pixel.
    pub fn get_pixel_offset(&self, p: &Point2i) -> usize {
        let width: Int = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        ((p.y - self.pixel_bounds.p_min.y) * width + (p.x - self.pixel_bounds.p_min.x)) as usize
    }

    /// Returns the pixel bounds.
    pub fn get_pixel_bounds(&self) -> Bounds2i {
        self.pixel_bounds
    }
}
