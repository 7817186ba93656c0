//! Common

use crate::geometry::{Point2f, Vector3f};
use crate::pbrt::{Float, Int, INV_FOUR_PI, INV_PI, PI_OVER_FOUR, PI_OVER_TWO, TWO_PI};

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = TWO_PI * u.y;
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Sample a point on a unit disk by mapping concentric squares of [-1, 1]^2
/// to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    let ox = 2.0 * u.x - 1.0;
    let oy = 2.0 * u.y - 1.0;

    if ox == 0.0 && oy == 0.0 {
        return Point2f::new(0.0, 0.0);
    }

    let (r, theta) = if ox.abs() > oy.abs() {
        (ox, PI_OVER_FOUR * (oy / ox))
    } else {
        (oy, PI_OVER_TWO - PI_OVER_FOUR * (ox / oy))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Sample a direction on the `+z` hemisphere using cosine-weighted sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling a direction from a hemisphere.
///
/// * `cos_theta` - Cosine term of incident radiance.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Weight samples using the power heuristic.
///
/// * `nf`    - Number of samples taken from `f_pdf`.
/// * `f_pdf` - First sampling distribution.
/// * `ng`    - Number of samples taken from `g_pdf`.
/// * `g_pdf` - Second sampling distribution.
#[inline]
pub fn power_heuristic(nf: Int, f_pdf: Float, ng: Int, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    if f == 0.0 && g == 0.0 {
        return 0.0;
    }
    (f * f) / (f * f + g * g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sphere_samples_are_unit(x in 0.0f32..1.0, y in 0.0f32..1.0) {
            let v = uniform_sample_sphere(&Point2f::new(x, y));
            prop_assert!(approx_eq!(Float, v.length(), 1.0, epsilon = 1e-4));
        }

        #[test]
        fn disk_samples_inside_unit_disk(x in 0.0f32..1.0, y in 0.0f32..1.0) {
            let p = concentric_sample_disk(&Point2f::new(x, y));
            prop_assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-5);
        }

        #[test]
        fn cosine_samples_in_upper_hemisphere(x in 0.0f32..1.0, y in 0.0f32..1.0) {
            let v = cosine_sample_hemisphere(&Point2f::new(x, y));
            prop_assert!(v.z >= 0.0);
            prop_assert!(approx_eq!(Float, v.length(), 1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn power_heuristic_weights_sum_to_one() {
        let a = power_heuristic(1, 0.3, 1, 0.7);
        let b = power_heuristic(1, 0.7, 1, 0.3);
        assert!(approx_eq!(Float, a + b, 1.0, epsilon = 1e-6));
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
    }
}
