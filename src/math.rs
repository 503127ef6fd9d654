use crate::all::*;

// The order of quaternion entries in a Vector4d is: w, x, y, z.

pub fn to_rotation_matrix(q: Vector4d) -> Matrix3d {
  Matrix3d::new(
    q[0]*q[0] + q[1]*q[1] - q[2]*q[2] - q[3]*q[3], 2.*q[1]*q[2] - 2.*q[0]*q[3], 2.*q[1]*q[3] + 2.*q[0]*q[2],
    2.*q[1]*q[2] + 2.*q[0]*q[3], q[0]*q[0] - q[1]*q[1] + q[2]*q[2] - q[3]*q[3], 2.*q[2]*q[3] - 2.*q[0]*q[1],
    2.*q[1]*q[3] - 2.*q[0]*q[2], 2.*q[2]*q[3] + 2.*q[0]*q[1], q[0]*q[0] - q[1]*q[1] - q[2]*q[2] + q[3]*q[3],
    )
}

// Perspective division. Not guarded: a zero last coordinate gives inf or NaN.
pub fn hnormalize(x: &Vector3d) -> Vector2d {
  Vector2d::new(x[0] / x[2], x[1] / x[2])
}

// Euclidean point of a homogeneous one, `None` for points at infinity.
pub fn from_homogeneous(x: &Vector4d) -> Option<Vector3d> {
  if x[3].abs() < f64::EPSILON { return None }
  Some(Vector3d::new(x[0] / x[3], x[1] / x[3], x[2] / x[3]))
}

// Apply 3x3 homography to a 2d point.
pub fn transform_2d(H: &Matrix3d, x: &Vector2d) -> Vector2d {
  hnormalize(&(H * Vector3d::new(x[0], x[1], 1.)))
}
