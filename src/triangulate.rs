use crate::all::*;

// Linear (DLT) triangulation of one 3d point from its projections in two or
// more cameras.
//
// Each view contributes the rows `P_0 - x P_2` and `P_1 - y P_2` of a 2N x 4
// system `A X = 0`, solved in the least squares sense by the right singular
// vector of the smallest singular value. The result is exact for noiseless
// observations and minimizes the algebraic (not reprojection) error otherwise.
//
// The homogeneous point is returned as is, so points at infinity survive. Use
// `from_homogeneous()` for Euclidean coordinates.
pub fn triangulate_point(
  cameras: &[PinholeCamera],
  projections: &[Vector2d],
) -> CameraResult<Vector4d> {
  if cameras.len() != projections.len() {
    return Err(CameraError::CameraObservationMismatch {
      cameras: cameras.len(),
      observations: projections.len(),
    });
  }
  if cameras.len() < 2 {
    return Err(CameraError::TooFewViews(cameras.len()));
  }

  let mut A = DMatrix::<f64>::zeros(2 * cameras.len(), 4);
  for (i, (camera, x)) in cameras.iter().zip(projections).enumerate() {
    let P = camera.P();
    A.row_mut(2 * i).copy_from(&(P.row(0) - x[0] * P.row(2)));
    A.row_mut(2 * i + 1).copy_from(&(P.row(1) - x[1] * P.row(2)));
  }

  let svd = A.svd(false, true);
  let v_t = svd.v_t
    .ok_or_else(|| CameraError::Numerical("SVD did not compute V.".to_string()))?;
  // Pick the smallest explicitly rather than rely on the ordering.
  let i = svd.singular_values.imin();
  debug!(
    "Triangulated from {} views, smallest singular value {}.",
    cameras.len(),
    svd.singular_values[i],
  );
  let v = v_t.row(i);
  Ok(Vector4d::new(v[0], v[1], v[2], v[3]))
}
