//! Perspective Camera

use core::camera::*;
use core::film::*;
use core::geometry::*;
use core::paramset::*;
use core::pbrt::*;
use std::sync::Arc;

/// Pinhole perspective camera defined by a look-at frame.
pub struct PerspectiveCamera {
    /// Common camera parameters.
    pub data: CameraData,

    /// Camera position.
    pub pos: Point3f,

    /// Unit viewing direction.
    pub forward: Vector3f,

    /// Image plane x-axis at unit distance, scaled by the half-width.
    pub right: Vector3f,

    /// Image plane y-axis at unit distance, scaled by the half-height.
    pub up: Vector3f,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `pos`           - Camera position.
    /// * `look`          - Point the camera looks at.
    /// * `up`            - Approximate up direction.
    /// * `fov`           - Vertical field-of-view angle in degrees.
    /// * `shutter_open`  - Time when shutter is open.
    /// * `shutter_close` - Time when shutter is closed.
    /// * `film`          - The film to capture the rendered image.
    pub fn new(
        pos: Point3f,
        look: Point3f,
        up: Vector3f,
        fov: Float,
        shutter_open: Float,
        shutter_close: Float,
        film: Arc<Film>,
    ) -> Self {
        let mut forward = look - pos;
        if forward.length_squared() == 0.0 {
            warn!("Camera position and look at point are the same. Looking down -z.");
            forward = Vector3f::new(0.0, 0.0, -1.0);
        }
        let forward = forward.normalize();

        let mut right = forward.cross(&up);
        if right.length_squared() == 0.0 {
            warn!("Camera up vector {:?} is parallel to the view direction.", up);
            right = coordinate_system(&forward).0;
        }
        let right = right.normalize();
        let cam_up = right.cross(&forward);

        let fov = if fov > 0.0 && fov < 180.0 {
            fov
        } else {
            warn!("Invalid field of view {}. Using 90 degrees.", fov);
            90.0
        };
        let tan_half = (0.5 * fov * PI / 180.0).tan();
        let res = film.full_resolution;
        let aspect = res.x as Float / res.y as Float;

        Self {
            data: CameraData::new(shutter_open, shutter_close, film),
            pos,
            forward,
            right: right * (tan_half * aspect),
            up: cam_up * tan_half,
        }
    }
}

impl Camera for PerspectiveCamera {
    /// Returns the common camera data.
    fn get_data(&self) -> &CameraData {
        &self.data
    }

    /// Returns a ray corresponding to a given sample. The weight is always 1.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float) {
        let res = self.data.film.full_resolution;
        let sx = 2.0 * sample.p_film.x / res.x as Float - 1.0;
        let sy = 1.0 - 2.0 * sample.p_film.y / res.y as Float;

        let d = (self.forward + self.right * sx + self.up * sy).normalize();
        let ray = Ray::new(self.pos, d, INFINITY, self.data.ray_time(sample.time));
        (ray, 1.0)
    }
}

impl From<(&ParamSet, Arc<Film>)> for PerspectiveCamera {
    /// Create a `PerspectiveCamera` from given parameter set and film.
    ///
    /// * `p` - Tuple containing the parameter set and film.
    fn from(p: (&ParamSet, Arc<Film>)) -> Self {
        let (params, film) = p;
        let triple = |name: &str, default: [Float; 3]| {
            let v = params.find_float(name);
            if v.len() == 3 {
                [v[0], v[1], v[2]]
            } else {
                default
            }
        };
        let from = triple("from", [0.0, 0.0, 0.0]);
        let to = triple("to", [0.0, 0.0, -1.0]);
        let up = triple("up", [0.0, 1.0, 0.0]);

        Self::new(
            Point3f::new(from[0], from[1], from[2]),
            Point3f::new(to[0], to[1], to[2]),
            Vector3f::new(up[0], up[1], up[2]),
            params.find_one_float("fov", 90.0),
            params.find_one_float("shutteropen", 0.0),
            params.find_one_float("shutterclose", 1.0),
            film,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn film(x: Int, y: Int) -> Arc<Film> {
        let crop = Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0));
        Arc::new(Film::new(&Point2i::new(x, y), &crop, "", None, None))
    }

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::zero(),
            Vector3f::new(0.0, 1.0, 0.0),
            90.0,
            0.0,
            1.0,
            film(4, 2),
        )
    }

    #[test]
    fn center_ray_looks_forward() {
        let cam = camera();
        let (ray, w) = cam.generate_ray(&CameraSample::new(Point2f::new(2.0, 1.0), 0.5));
        assert_eq!(w, 1.0);
        assert_eq!(ray.o, Point3f::new(0.0, 0.0, 5.0));
        assert!(approx_eq!(f32, ray.d.z, -1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, ray.time, 0.5, epsilon = 1e-6));
    }

    #[test]
    fn raster_corners_span_field_of_view() {
        let cam = camera();
        // Top left corner of the image: up and to the left.
        let (ray, _) = cam.generate_ray(&CameraSample::new(Point2f::new(0.0, 0.0), 0.0));
        assert!(ray.d.x < 0.0);
        assert!(ray.d.y > 0.0);

        // Vertical edge at 45 degrees for a 90 degree field of view.
        let (ray, _) = cam.generate_ray(&CameraSample::new(Point2f::new(2.0, 0.0), 0.0));
        assert!(approx_eq!(f32, ray.d.y, -ray.d.z, epsilon = 1e-6));
        assert!(approx_eq!(f32, ray.d.x, 0.0, epsilon = 1e-6));

        // Aspect ratio widens the horizontal extent.
        let (ray, _) = cam.generate_ray(&CameraSample::new(Point2f::new(4.0, 1.0), 0.0));
        assert!(approx_eq!(f32, ray.d.x / -ray.d.z, 2.0, epsilon = 1e-5));
    }

    #[test]
    fn degenerate_up_still_builds_a_frame() {
        let cam = PerspectiveCamera::new(
            Point3f::zero(),
            Point3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            0.0,
            0.0,
            film(2, 2),
        );
        assert!(approx_eq!(f32, cam.right.dot(&cam.forward), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, cam.up.dot(&cam.forward), 0.0, epsilon = 1e-6));
    }
}
