use crate::all::*;

// A planar coordinate system embedded in the world. The lengths of the axes are
// the plane-local units, so plane coordinate (1, 0) is `origin + x_axis`.
// The axes are assumed orthogonal and non-zero; degenerate axes give NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneFrame {
  pub origin: Vector3d,
  pub x_axis: Vector3d,
  pub y_axis: Vector3d,
}

impl PlaneFrame {
  pub fn new(origin: Vector3d, x_axis: Vector3d, y_axis: Vector3d) -> PlaneFrame {
    PlaneFrame { origin, x_axis, y_axis }
  }

  // Rotation with the unit axes and their normal as columns.
  fn rotation(&self) -> Matrix3d {
    let xu = self.x_axis.normalize();
    let yu = self.y_axis.normalize();
    Matrix3d::from_columns(&[xu, yu, xu.cross(&yu)])
  }

  pub fn normal(&self) -> Vector3d {
    self.x_axis.normalize().cross(&self.y_axis.normalize())
  }

  // Homogeneous transform from plane-local (x, y, z, 1) to world coordinates,
  // including the scale of the local x and y units.
  pub fn plane_to_world(&self) -> Matrix4d {
    let mut rt = Matrix4d::identity();
    rt.fixed_slice_mut::<3, 3>(0, 0).copy_from(&self.rotation());
    rt.fixed_slice_mut::<3, 1>(0, 3).copy_from(&self.origin);
    let scale = Matrix4d::from_diagonal(&Vector4d::new(
      self.x_axis.norm(),
      self.y_axis.norm(),
      1.,
      1.,
    ));
    rt * scale
  }

  // World point of plane-local coordinates.
  pub fn point(&self, p: &Vector2d) -> Vector3d {
    self.origin + p[0] * self.x_axis + p[1] * self.y_axis
  }

  // Plane equation of the surface spanned by the frame.
  pub fn plane(&self) -> Plane {
    let n = self.normal();
    Plane::new(n[0], n[1], n[2], -n.dot(&self.origin))
  }
}
