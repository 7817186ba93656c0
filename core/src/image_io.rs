//! Image I/O

use crate::geometry::Bounds2i;
use crate::pbrt::{clamp, gamma_correct, Float};
use exr::prelude::*;
use image::{ImageBuffer, ImageFormat, Rgb};
use std::path::Path;
use std::result::Result;

/// Write an RGB image to a file. The format is chosen from the file
/// extension: `.exr` keeps floating point values, `.png` and `.tga` are
/// gamma encoded 8-bit images.
///
/// * `path`          - Output file path.
/// * `rgb`           - Floating point RGB pixel data in scanline order.
/// * `output_bounds` - Pixel bounds of the image.
pub fn write_image(path: &str, rgb: &[Float], output_bounds: &Bounds2i) -> Result<(), String> {
    let resolution = output_bounds.diagonal();
    let res_x = resolution.x as u32;
    let res_y = resolution.y as u32;
    if rgb.len() != 3 * (res_x as usize) * (res_y as usize) {
        return Err(format!(
            "Pixel data length {} does not match resolution {res_x}x{res_y}",
            rgb.len()
        ));
    }

    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("exr") => write_exr(path, rgb, res_x, res_y),
        Some("png") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Png),
        Some("tga") => write_8_bit(path, rgb, res_x, res_y, ImageFormat::Tga),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `rgb`   - Floating point RGB pixel data.
/// * `res_x` - X resolution.
/// * `res_y` - Y resolution.
fn write_exr(path: &str, rgb: &[Float], res_x: u32, res_y: u32) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    let width = res_x as usize;
    write_rgb_file(path, width, res_y as usize, |x, y| {
        let offset = 3 * (y * width + x);
        (rgb[offset], rgb[offset + 1], rgb[offset + 2])
    })
    .map_err(|err| format!("Error saving output image {path}: {err}"))
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `rgb`          - Floating point RGB pixel data.
/// * `res_x`        - X resolution.
/// * `res_y`        - Y resolution.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, rgb: &[Float], res_x: u32, res_y: u32, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    let imgbuf = ImageBuffer::from_fn(res_x, res_y, |x, y| {
        let offset = 3 * (y * res_x + x) as usize;
        Rgb(apply_gamma(&[rgb[offset], rgb[offset + 1], rgb[offset + 2]]))
    });

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| format!("Error saving output image {path}: {err}."))
}

/// Apply gamma correction and clamp to 8-bit values.
///
/// * `rgb` - Linear RGB values.
fn apply_gamma(rgb: &[Float; 3]) -> [u8; 3] {
    [clamp_byte(rgb[0]), clamp_byte(rgb[1]), clamp_byte(rgb[2])]
}

/// Clamp floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2i;

    #[test]
    fn gamma_clamps_to_byte_range() {
        assert_eq!(apply_gamma(&[0.0, 1.0, 10.0]), [0, 255, 255]);
        assert_eq!(apply_gamma(&[-1.0, 0.0, 0.0])[0], 0);
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        let bounds = Bounds2i::new(Point2i::new(0, 0), Point2i::new(1, 1));
        assert!(write_image("out.bmp2", &[0.0; 3], &bounds).is_err());
        assert!(write_image("out", &[0.0; 3], &bounds).is_err());
        assert!(write_image("out.png", &[0.0; 6], &bounds).is_err());
    }

    #[test]
    fn writes_supported_formats_and_reports_errors_as_text() {
        let bounds = Bounds2i::new(Point2i::new(0, 0), Point2i::new(2, 1));
        let rgb = [0.25, 0.5, 1.0, 2.0, 0.0, 0.75];
        let dir = std::env::temp_dir();
        for name in ["image_io_test.exr", "image_io_test.png"] {
            let path = dir.join(name);
            let path = path.to_str().expect("utf-8 temp path");
            assert_eq!(write_image(path, &rgb, &bounds), Ok(()));
            assert!(std::fs::metadata(path).is_ok());
            let _ = std::fs::remove_file(path);
        }

        let err: Result<(), String> = write_image("out.bmp2", &rgb, &bounds);
        assert_eq!(err, Err("Extension bmp2 is not supported".to_string()));
    }
}
