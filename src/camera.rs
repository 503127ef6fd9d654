use crate::all::*;

// Threshold below which P(2, 3) is considered zero and P is left unnormalized.
const P_NORMALIZATION_THRESHOLD: f64 = 1e-6;

// Intrinsic and extrinsic parameters of a distortion-free pinhole camera, with
// the matrices derived from them. Immutable: every operation reads the
// matrices computed once in `new()`.
//
// `R` is assumed to be a proper rotation. This is not checked.
#[derive(Clone, Debug, PartialEq)]
pub struct PinholeCamera {
  K: Matrix3d,
  R: Matrix3d,
  T: Vector3d,
  // K [R | T], scaled so that P(2, 3) = 1 unless that entry is ~0.
  P: Matrix34d,
  // Camera center in world coordinates, -R' T.
  center: Vector3d,
  K_inv: Matrix3d,
  // R' K^-1, maps homogeneous pixels to world-frame ray directions.
  KR_inv: Matrix3d,
}

impl PinholeCamera {
  // `R` and `T` transform world coordinates to camera coordinates.
  pub fn new(K: Matrix3d, R: Matrix3d, T: Vector3d) -> CameraResult<PinholeCamera> {
    let K_inv = K.try_inverse().ok_or(CameraError::SingularIntrinsics)?;

    let mut RT = Matrix34d::zeros();
    RT.fixed_slice_mut::<3, 3>(0, 0).copy_from(&R);
    RT.set_column(3, &T);
    let mut P = K * RT;
    let p23 = P[(2, 3)];
    if p23.abs() > P_NORMALIZATION_THRESHOLD {
      P /= p23;
    }
    else {
      debug!("P(2, 3) = {}, skipping projection matrix normalization.", p23);
    }

    let center = -R.transpose() * T;
    debug!("Camera center {:?}.", center.as_slice());
    Ok(PinholeCamera {
      K,
      R,
      T,
      P,
      center,
      K_inv,
      KR_inv: R.transpose() * K_inv,
    })
  }

  // Image coordinates of world points.
  //
  // Points on the principal plane of the camera project to infinity (or NaN),
  // and points behind the camera project as if mirrored through the center.
  // Checking that the points are in front of the camera is left to the caller.
  pub fn project_points(&self, pts_3d: &[Vector3d]) -> Vec<Vector2d> {
    self.project_homogeneous(pts_3d, 1.)
  }

  pub fn project_point(&self, pt_3d: &Vector3d) -> Vector2d {
    self.project_points(std::slice::from_ref(pt_3d))[0]
  }

  // Image coordinates of free directions (vanishing points). Translation of the
  // camera is ignored. Same degenerate cases as `project_points()`.
  pub fn project_vectors(&self, vecs_3d: &[Vector3d]) -> Vec<Vector2d> {
    self.project_homogeneous(vecs_3d, 0.)
  }

  pub fn project_vector(&self, vec_3d: &Vector3d) -> Vector2d {
    self.project_vectors(std::slice::from_ref(vec_3d))[0]
  }

  fn project_homogeneous(&self, xs: &[Vector3d], w: f64) -> Vec<Vector2d> {
    let X = nalgebra::Matrix4xX::from_fn(xs.len(), |r, c| if r < 3 { xs[c][r] } else { w });
    let x = self.P * X;
    x.column_iter()
      .map(|col| hnormalize(&col.into_owned()))
      .collect()
  }

  // Unit ray directions in world coordinates from the camera center through
  // the given image points.
  pub fn viewing_rays(&self, pts_2d: &[Vector2d]) -> Vec<Vector3d> {
    pts_2d.iter()
      .map(|p| (self.KR_inv * Vector3d::new(p[0], p[1], 1.)).normalize())
      .collect()
  }

  pub fn viewing_ray(&self, pt_2d: &Vector2d) -> Vector3d {
    self.viewing_rays(std::slice::from_ref(pt_2d))[0]
  }

  // World points at the given distances from the camera center along the
  // viewing rays. Depth is the Euclidean distance along the ray, not the
  // z coordinate in the camera frame.
  pub fn backproject_points(
    &self,
    pts_2d: &[Vector2d],
    depths: &[f64],
  ) -> CameraResult<Vec<Vector3d>> {
    if pts_2d.len() != depths.len() {
      return Err(CameraError::PointDepthMismatch {
        points: pts_2d.len(),
        depths: depths.len(),
      });
    }
    Ok(self.viewing_rays(pts_2d).iter()
      .zip(depths)
      .map(|(ray, depth)| self.center + *depth * *ray)
      .collect())
  }

  pub fn backproject_point(&self, pt_2d: &Vector2d, depth: f64) -> Vector3d {
    self.center + depth * self.viewing_ray(pt_2d)
  }

  // Intersections of the viewing rays with a plane. The intersection may be
  // behind the camera. Rays parallel to the plane give inf or NaN coordinates.
  pub fn backproject_points_plane(&self, pts_2d: &[Vector2d], plane: &Plane) -> Vec<Vector3d> {
    let normal = plane.fixed_rows::<3>(0);
    let c = self.center;
    let offset = plane.dot(&Vector4d::new(c[0], c[1], c[2], 1.));
    self.viewing_rays(pts_2d).iter()
      .map(|ray| {
        let depth = -offset / normal.dot(ray);
        c + depth * *ray
      })
      .collect()
  }

  pub fn backproject_point_plane(&self, pt_2d: &Vector2d, plane: &Plane) -> Vector3d {
    self.backproject_points_plane(std::slice::from_ref(pt_2d), plane)[0]
  }

  // Homography from plane-local coordinates (x, y, 1) of the frame spanned by
  // `plane_x` and `plane_y` at `plane_origin` to homogeneous image coordinates.
  // The axis lengths set the plane units.
  pub fn plane2image(
    &self,
    plane_origin: &Vector3d,
    plane_x: &Vector3d,
    plane_y: &Vector3d,
  ) -> Matrix3d {
    self.plane_frame_to_image(&PlaneFrame::new(*plane_origin, *plane_x, *plane_y))
  }

  pub fn plane_frame_to_image(&self, frame: &PlaneFrame) -> Matrix3d {
    let plane_to_image = self.P * frame.plane_to_world();
    // Points on the plane have local z = 0, so the third column drops out.
    Matrix3d::from_columns(&[
      plane_to_image.column(0).into_owned(),
      plane_to_image.column(1).into_owned(),
      plane_to_image.column(3).into_owned(),
    ])
  }

  // Inverse of `plane2image()`: maps homogeneous image coordinates to
  // plane-local (x, y, 1), up to scale.
  pub fn image2plane(
    &self,
    plane_origin: &Vector3d,
    plane_x: &Vector3d,
    plane_y: &Vector3d,
  ) -> CameraResult<Matrix3d> {
    self.image_to_plane_frame(&PlaneFrame::new(*plane_origin, *plane_x, *plane_y))
  }

  pub fn image_to_plane_frame(&self, frame: &PlaneFrame) -> CameraResult<Matrix3d> {
    self.plane_frame_to_image(frame)
      .try_inverse()
      .ok_or(CameraError::SingularHomography)
  }

  // Camera for the image resampled by `scale_factor`. Fails if the scale makes
  // K singular, ie `scale_factor` is zero.
  pub fn rescale(&self, scale_factor: f64) -> CameraResult<PinholeCamera> {
    let mut K = self.K * scale_factor;
    K[(2, 2)] = self.K[(2, 2)];
    PinholeCamera::new(K, self.R, self.T)
  }

  pub fn principal_point(&self) -> Vector2d {
    Vector2d::new(self.K[(0, 2)], self.K[(1, 2)])
  }

  // Optical axis direction in world coordinates.
  pub fn principal_ray(&self) -> Vector3d {
    self.R.row(2).transpose()
  }

  pub fn x_axis(&self) -> Vector3d {
    self.R.row(0).transpose()
  }

  pub fn y_axis(&self) -> Vector3d {
    self.R.row(1).transpose()
  }

  pub fn K(&self) -> &Matrix3d { &self.K }
  pub fn R(&self) -> &Matrix3d { &self.R }
  pub fn T(&self) -> &Vector3d { &self.T }
  pub fn P(&self) -> &Matrix34d { &self.P }
  pub fn center(&self) -> &Vector3d { &self.center }
  pub fn K_inv(&self) -> &Matrix3d { &self.K_inv }
  pub fn KR_inv(&self) -> &Matrix3d { &self.KR_inv }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::{Rng, SeedableRng};
  use rand_xoshiro::Xoshiro256PlusPlus;

  // Camera at (1, -2, -10) looking roughly along +z.
  fn test_camera() -> PinholeCamera {
    let q = Vector4d::new(0.98, 0.05, -0.1, 0.15).normalize();
    let R = to_rotation_matrix(q);
    let center = Vector3d::new(1., -2., -10.);
    let K = Matrix3d::new(
      800., 0.5, 330.,
      0., 790., 235.,
      0., 0., 1.,
    );
    PinholeCamera::new(K, R, -R * center).unwrap()
  }

  fn random_points_in_front(rng: &mut Xoshiro256PlusPlus, n: usize) -> Vec<Vector3d> {
    (0..n).map(|_| Vector3d::new(
      rng.gen_range(-3.0..3.0),
      rng.gen_range(-3.0..3.0),
      rng.gen_range(-1.0..5.0),
    )).collect()
  }

  #[test]
  fn test_derived_matrices() {
    let camera = test_camera();
    assert!((camera.P()[(2, 3)] - 1.).abs() < 1e-12);
    assert!((camera.center() - Vector3d::new(1., -2., -10.)).norm() < 1e-12);
    assert!((camera.K() * camera.K_inv() - Matrix3d::identity()).norm() < 1e-12);
    assert!((camera.KR_inv() - camera.R().transpose() * camera.K_inv()).norm() < 1e-12);

    // P maps the center to zero.
    let c = camera.center();
    let x = camera.P() * Vector4d::new(c[0], c[1], c[2], 1.);
    assert!(x.norm() < 1e-9);
  }

  #[test]
  fn test_singular_intrinsics() {
    let K = Matrix3d::new(
      1000., 0., 320.,
      0., 0., 240.,
      0., 0., 0.,
    );
    let err = PinholeCamera::new(K, Matrix3d::identity(), Vector3d::zeros()).unwrap_err();
    assert_eq!(err, CameraError::SingularIntrinsics);
  }

  #[test]
  fn test_normalization_skipped_at_zero_translation() {
    let K = construct_k(1000., (640., 480.));
    let camera = PinholeCamera::new(K, Matrix3d::identity(), Vector3d::new(0.5, 0.2, 0.)).unwrap();
    assert_eq!(camera.P()[(2, 3)], 0.);
    assert_eq!(camera.P()[(0, 0)], 1000.);
    assert_eq!(camera.P()[(0, 3)], 500.);
  }

  #[test]
  fn test_project_points() {
    let K = construct_k(1000., (640., 480.));
    let camera = PinholeCamera::new(K, Matrix3d::identity(), Vector3d::new(0., 0., 2.)).unwrap();
    let pixels = camera.project_points(&[
      Vector3d::new(0., 0., 0.),
      Vector3d::new(0.2, -0.4, 2.),
    ]);
    assert_eq!(pixels.len(), 2);
    assert!((pixels[0] - Vector2d::new(320., 240.)).norm() < 1e-9);
    assert!((pixels[1] - Vector2d::new(370., 140.)).norm() < 1e-9);
    assert!(camera.project_points(&[]).is_empty());

    // Point on the principal plane.
    let p = camera.project_point(&Vector3d::new(1., 0., -2.));
    assert!(!p[0].is_finite());
  }

  #[test]
  fn test_project_vectors() {
    let K = construct_k(1000., (640., 480.));
    let camera = PinholeCamera::new(K, Matrix3d::identity(), Vector3d::new(5., 3., 2.)).unwrap();
    // Translation does not affect directions.
    let v = camera.project_vector(&Vector3d::new(0., 0., 1.));
    assert!((v - camera.principal_point()).norm() < 1e-9);
    let v = camera.project_vector(&Vector3d::new(1., 0., 1.));
    assert!((v - Vector2d::new(1320., 240.)).norm() < 1e-9);
  }

  #[test]
  fn test_viewing_rays() {
    let camera = test_camera();
    let rays = camera.viewing_rays(&[camera.principal_point(), Vector2d::new(10., 470.)]);
    for ray in &rays {
      assert!((ray.norm() - 1.).abs() < 1e-12);
    }
    // Skew is non-zero but the principal point still maps to the optical axis.
    assert!((rays[0] - camera.principal_ray()).norm() < 1e-12);
    // The ray through a pixel projects back to that pixel.
    let x = camera.center() + 3. * rays[1];
    assert!((camera.project_point(&x) - Vector2d::new(10., 470.)).norm() < 1e-9);
  }

  #[test]
  fn test_project_backproject_round_trip() {
    let camera = test_camera();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    let points = random_points_in_front(&mut rng, 50);
    let pixels = camera.project_points(&points);
    let depths: Vec<f64> = points.iter().map(|x| (x - camera.center()).norm()).collect();
    let backprojected = camera.backproject_points(&pixels, &depths).unwrap();
    for (x0, x1) in points.iter().zip(&backprojected) {
      assert!((x0 - x1).norm() < 1e-8);
    }
    let x = camera.backproject_point(&pixels[3], depths[3]);
    assert!((x - points[3]).norm() < 1e-8);
  }

  #[test]
  fn test_backproject_length_mismatch() {
    let camera = test_camera();
    let pixels = vec![Vector2d::new(1., 2.), Vector2d::new(3., 4.), Vector2d::new(5., 6.)];
    let err = camera.backproject_points(&pixels, &[1., 2.]).unwrap_err();
    assert_eq!(err, CameraError::PointDepthMismatch { points: 3, depths: 2 });
    assert_eq!(err.to_string(), "Number of points 3 != number of depths 2");
  }

  #[test]
  fn test_backproject_points_plane() {
    let camera = test_camera();
    let frame = PlaneFrame::new(
      Vector3d::new(0., 0., 3.),
      Vector3d::new(1., 0., 0.2),
      Vector3d::new(0., 1., 0.),
    );
    let plane = frame.plane();
    let pixels = vec![Vector2d::new(100., 50.), Vector2d::new(320., 240.), Vector2d::new(600., 400.)];
    let points = camera.backproject_points_plane(&pixels, &plane);
    for (x, pixel) in points.iter().zip(&pixels) {
      assert!(plane.dot(&Vector4d::new(x[0], x[1], x[2], 1.)).abs() < 1e-9);
      assert!((camera.project_point(x) - pixel).norm() < 1e-6);
    }
    let x = camera.backproject_point_plane(&pixels[1], &plane);
    assert!((x - points[1]).norm() < 1e-12);
  }

  #[test]
  fn test_backproject_plane_parallel_ray() {
    let K = construct_k(1000., (640., 480.));
    let camera = PinholeCamera::new(K, Matrix3d::identity(), Vector3d::new(0., 0., 5.)).unwrap();
    // Plane x = 1 is parallel to the optical axis.
    let x = camera.backproject_point_plane(&Vector2d::new(320., 240.), &Plane::new(1., 0., 0., -1.));
    assert!(!x[2].is_finite());
  }

  #[test]
  fn test_plane_homography_round_trip() {
    let camera = test_camera();
    let origin = Vector3d::new(-1., 0.5, 4.);
    let x_axis = Vector3d::new(0.5, 0., 0.1);
    let y_axis = Vector3d::new(0., 2., 0.);
    let H = camera.plane2image(&origin, &x_axis, &y_axis);
    let H_inv = camera.image2plane(&origin, &x_axis, &y_axis).unwrap();
    let I = H_inv * H;
    let I = I / I[(2, 2)];
    assert!((I - Matrix3d::identity()).norm() < 1e-9);
  }

  #[test]
  fn test_plane_homography_consistency() {
    let camera = test_camera();
    let origin = Vector3d::new(-1., 0.5, 4.);
    let x_axis = Vector3d::new(0.5, 0., 0.1);
    let y_axis = Vector3d::new(0., 2., 0.);
    let frame = PlaneFrame::new(origin, x_axis, y_axis);
    let H = camera.plane2image(&origin, &x_axis, &y_axis);
    let H_inv = camera.image2plane(&origin, &x_axis, &y_axis).unwrap();
    for p in [Vector2d::new(0., 0.), Vector2d::new(1.5, -0.25), Vector2d::new(-3., 1.)] {
      let pixel = camera.project_point(&frame.point(&p));
      assert!((transform_2d(&H, &p) - pixel).norm() < 1e-8);
      assert!((transform_2d(&H_inv, &pixel) - p).norm() < 1e-8);
    }
  }

  #[test]
  fn test_image2plane_through_center() {
    let K = construct_k(1000., (640., 480.));
    let camera = PinholeCamera::new(K, Matrix3d::identity(), Vector3d::zeros()).unwrap();
    // Plane containing the camera center projects to a line.
    let err = camera.image2plane(
      camera.center(),
      &Vector3d::new(1., 0., 0.),
      &Vector3d::new(0., 0., 1.),
    ).unwrap_err();
    assert_eq!(err, CameraError::SingularHomography);
  }

  #[test]
  fn test_rescale() {
    let camera = test_camera();
    let s = 0.5;
    let scaled = camera.rescale(s).unwrap();
    assert_eq!(scaled.R(), camera.R());
    assert_eq!(scaled.T(), camera.T());
    assert_eq!(scaled.K()[(2, 2)], 1.);
    assert!((scaled.principal_point() - s * camera.principal_point()).norm() < 1e-12);
    // Receiver is unchanged.
    assert_eq!(camera.K()[(0, 0)], 800.);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let points = random_points_in_front(&mut rng, 20);
    for s in [0.25, 2., 3.7] {
      let scaled = camera.rescale(s).unwrap();
      for (p0, p1) in camera.project_points(&points).iter().zip(scaled.project_points(&points)) {
        assert!((s * *p0 - p1).norm() < 1e-8);
      }
    }

    assert_eq!(camera.rescale(0.).unwrap_err(), CameraError::SingularIntrinsics);
  }

  #[test]
  fn test_axes() {
    let R = Matrix3d::new(
      0., -1., 0.,
      0., 0., -1.,
      1., 0., 0.,
    );
    let camera = PinholeCamera::new(construct_k(500., (100., 80.)), R, Vector3d::zeros()).unwrap();
    assert_eq!(camera.x_axis(), Vector3d::new(0., -1., 0.));
    assert_eq!(camera.y_axis(), Vector3d::new(0., 0., -1.));
    assert_eq!(camera.principal_ray(), Vector3d::new(1., 0., 0.));
    assert_eq!(camera.principal_point(), Vector2d::new(50., 40.));
  }
}
