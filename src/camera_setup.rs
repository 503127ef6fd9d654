use crate::all::*;

// One camera of a rig file. Intrinsics are given either as `cameraMatrix` or
// as `focalLength` with the image size, orientation either as a world to
// camera `rotation` matrix or as an `orientation` quaternion (w, x, y, z).
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraSetup {
  pub cameraMatrix: Option<Vec<Vec<f64>>>,
  pub focalLength: Option<f64>,
  pub imageWidth: Option<f64>,
  pub imageHeight: Option<f64>,
  pub rotation: Option<Vec<Vec<f64>>>,
  pub orientation: Option<Vec<f64>>,
  pub translation: Option<Vec<f64>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraSetupRoot {
  pub cameras: Vec<CameraSetup>,
}

pub const SETUP_FILE_NAME: &'static str = "cameras.json";

pub fn load_camera_setup(path: &Path) -> Result<Vec<PinholeCamera>> {
  // Accept a directory containing the setup file.
  let path = if path.is_dir() { path.join(SETUP_FILE_NAME) } else { path.to_path_buf() };
  let s = std::fs::read_to_string(&path)
    .context(format!("Failed to read file {}.", path.display()))?;
  let cameras = parse_camera_setup(&s)
    .context(format!("Failed to parse {}.", path.display()))?;
  info!("Loaded {} cameras from {}.", cameras.len(), path.display());
  Ok(cameras)
}

pub fn parse_camera_setup(s: &str) -> Result<Vec<PinholeCamera>> {
  let root: CameraSetupRoot = serde_json::from_str(s)?;
  root.cameras.into_iter()
    .enumerate()
    .map(|(i, x)| convert_setup(x).context(format!("Invalid camera {}.", i)))
    .collect::<Result<Vec<_>>>()
}

fn convert_setup(d: CameraSetup) -> Result<PinholeCamera> {
  let K = match (d.cameraMatrix, d.focalLength, d.imageWidth, d.imageHeight) {
    (Some(k), None, _, _) => convert_matrix3(&k).context("Bad cameraMatrix.")?,
    (None, Some(f), Some(w), Some(h)) => construct_k(f, (w, h)),
    (Some(_), Some(_), _, _) => bail!("Both cameraMatrix and focalLength given."),
    _ => bail!("Expected cameraMatrix or focalLength, imageWidth and imageHeight."),
  };
  let R = match (d.rotation, d.orientation) {
    (Some(r), None) => convert_matrix3(&r).context("Bad rotation.")?,
    (None, Some(q)) => {
      if q.len() != 4 { bail!("Orientation quaternion has {} values, expected 4.", q.len()) }
      let q = Vector4d::new(q[0], q[1], q[2], q[3]);
      if q.norm() < 1e-12 { bail!("Orientation quaternion has zero norm.") }
      to_rotation_matrix(q.normalize())
    },
    (None, None) => Matrix3d::identity(),
    (Some(_), Some(_)) => bail!("Both rotation and orientation given."),
  };
  let T = match d.translation {
    Some(t) if t.len() == 3 => Vector3d::new(t[0], t[1], t[2]),
    Some(t) => bail!("Translation has {} values, expected 3.", t.len()),
    None => Vector3d::zeros(),
  };
  Ok(PinholeCamera::new(K, R, T)?)
}

fn convert_matrix3(rows: &[Vec<f64>]) -> Result<Matrix3d> {
  if rows.len() != 3 || rows.iter().any(|r| r.len() != 3) {
    bail!("Expected a 3x3 nested array.");
  }
  Ok(Matrix3d::from_iterator(rows.iter().flatten().copied()).transpose())
}
