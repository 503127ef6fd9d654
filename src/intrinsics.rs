use crate::all::*;

// Calibration matrix with zero skew and the principal point at the image center.
// `image_size` is `(width, height)`.
pub fn construct_k(focal_length: f64, image_size: (f64, f64)) -> Matrix3d {
  Matrix3d::new(
    focal_length, 0., image_size.0 / 2.,
    0., focal_length, image_size.1 / 2.,
    0., 0., 1.,
  )
}
