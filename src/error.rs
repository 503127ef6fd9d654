// Errors of the camera geometry operations.
//
// Numerically degenerate inputs (points on the principal plane, rays parallel
// to a plane) are not reported here, they propagate as infinities or NaN.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraError {
  #[error("Intrinsic matrix K is not invertible")]
  SingularIntrinsics,
  #[error("Number of points {points} != number of depths {depths}")]
  PointDepthMismatch { points: usize, depths: usize },
  #[error("Number of cameras {cameras} != number of 2d projections {observations}")]
  CameraObservationMismatch { cameras: usize, observations: usize },
  #[error("Triangulation needs at least two views, got {0}")]
  TooFewViews(usize),
  #[error("Plane to image homography is not invertible")]
  SingularHomography,
  #[error("Numerical error: {0}")]
  Numerical(String),
}

pub type CameraResult<T> = std::result::Result<T, CameraError>;
