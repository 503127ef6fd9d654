// Plain text camera files.
//
// KRT layout: three rows of K, blank line, three rows of R, blank line, T.
// P layout: the three rows of the projection matrix.
// Values are separated by spaces and written with six decimals.

use crate::all::*;

pub fn save_krt(camera: &PinholeCamera, path: &Path) -> Result<()> {
  let mut s = String::new();
  write_rows(&mut s, camera.K().row_iter().map(|r| r.iter().copied().collect::<Vec<f64>>()));
  s.push('\n');
  write_rows(&mut s, camera.R().row_iter().map(|r| r.iter().copied().collect::<Vec<f64>>()));
  s.push('\n');
  write_rows(&mut s, std::iter::once(camera.T().iter().copied().collect::<Vec<f64>>()));
  write_file(path, &s)
}

pub fn save_p(camera: &PinholeCamera, path: &Path) -> Result<()> {
  let mut s = String::new();
  write_rows(&mut s, camera.P().row_iter().map(|r| r.iter().copied().collect::<Vec<f64>>()));
  write_file(path, &s)
}

pub fn load_krt(path: &Path) -> Result<PinholeCamera> {
  let rows = read_rows(path)?;
  let lengths: Vec<usize> = rows.iter().map(|r| r.len()).collect();
  if lengths != [3; 7] {
    bail!("Expected 7 rows of 3 values in KRT file {}, got row lengths {:?}.", path.display(), lengths);
  }
  let matrix = |first: usize| Matrix3d::from_fn(|r, c| rows[first + r][c]);
  let camera = PinholeCamera::new(
    matrix(0),
    matrix(3),
    Vector3d::new(rows[6][0], rows[6][1], rows[6][2]),
  ).context(format!("Invalid camera in {}.", path.display()))?;
  Ok(camera)
}

pub fn load_p(path: &Path) -> Result<Matrix34d> {
  let rows = read_rows(path)?;
  let lengths: Vec<usize> = rows.iter().map(|r| r.len()).collect();
  if lengths != [4; 3] {
    bail!("Expected 3 rows of 4 values in P file {}, got row lengths {:?}.", path.display(), lengths);
  }
  Ok(Matrix34d::from_fn(|r, c| rows[r][c]))
}

fn write_rows(s: &mut String, rows: impl Iterator<Item = Vec<f64>>) {
  for row in rows {
    let row: Vec<String> = row.iter().map(|x| format!("{:.6}", x)).collect();
    s.push_str(&row.join(" "));
    s.push('\n');
  }
}

fn write_file(path: &Path, s: &str) -> Result<()> {
  std::fs::write(path, s)
    .context(format!("Failed to write file {}.", path.display()))?;
  info!("Wrote {}.", path.display());
  Ok(())
}

// Non-empty lines parsed as whitespace separated numbers.
fn read_rows(path: &Path) -> Result<Vec<Vec<f64>>> {
  let s = std::fs::read_to_string(path)
    .context(format!("Failed to read file {}.", path.display()))?;
  s.lines()
    .map(|line| line.trim())
    .filter(|line| !line.is_empty())
    .map(|line| {
      line.split_whitespace()
        .map(|x| x.parse::<f64>().context(format!("Bad number `{}` in {}.", x, path.display())))
        .collect::<Result<Vec<_>>>()
    })
    .collect()
}
