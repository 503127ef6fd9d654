use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use pinhole::{
  camera_io::{save_krt, save_p},
  camera_setup::load_camera_setup,
  math::from_homogeneous,
  triangulate_point,
  util,
  Vector2d,
  Vector3d,
};

#[derive(Parser)]
struct Args {
  // Camera rig JSON file, or a directory containing `cameras.json`.
  #[clap(short, long)]
  setup: PathBuf,
  #[clap(short, long)]
  verbose: bool,
  #[clap(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  // Project a world point into every camera.
  Project {
    #[clap(allow_hyphen_values = true)]
    x: f64,
    #[clap(allow_hyphen_values = true)]
    y: f64,
    #[clap(allow_hyphen_values = true)]
    z: f64,
  },
  // Triangulate a point from one `u v` observation per camera.
  Triangulate {
    #[clap(allow_hyphen_values = true)]
    observations: Vec<f64>,
  },
  // Write each camera as a text file into a directory.
  Export {
    out_dir: PathBuf,
    // Write the projection matrix instead of K, R and T.
    #[clap(long)]
    projection: bool,
  },
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    println!("  {}: {}", i + 1, e);
  }
}

fn main() {
  if let Err(err) = run() {
    handle_error(&err);
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  util::init_logging(args.verbose);
  let cameras = load_camera_setup(&args.setup)?;

  match args.command {
    Command::Project { x, y, z } => {
      let point = Vector3d::new(x, y, z);
      for (i, camera) in cameras.iter().enumerate() {
        let p = camera.project_point(&point);
        println!("camera {}: {} {}", i, p[0], p[1]);
      }
    },
    Command::Triangulate { observations } => {
      if observations.len() != 2 * cameras.len() {
        bail!(
          "Expected {} values (u v for each of {} cameras), got {}.",
          2 * cameras.len(),
          cameras.len(),
          observations.len(),
        );
      }
      let projections: Vec<Vector2d> = observations.chunks(2)
        .map(|uv| Vector2d::new(uv[0], uv[1]))
        .collect();
      let x = triangulate_point(&cameras, &projections)?;
      println!("homogeneous: {} {} {} {}", x[0], x[1], x[2], x[3]);
      match from_homogeneous(&x) {
        Some(x) => println!("point: {} {} {}", x[0], x[1], x[2]),
        None => println!("point at infinity"),
      }
    },
    Command::Export { out_dir, projection } => export(&cameras, &out_dir, projection)?,
  }
  Ok(())
}

fn export(cameras: &[pinhole::PinholeCamera], out_dir: &Path, projection: bool) -> Result<()> {
  std::fs::create_dir_all(out_dir)
    .context(format!("Failed to create directory {}.", out_dir.display()))?;
  for (i, camera) in cameras.iter().enumerate() {
    let path = out_dir.join(format!("camera{}.txt", i));
    if projection {
      save_p(camera, &path)?;
    }
    else {
      save_krt(camera, &path)?;
    }
  }
  info!("Exported {} cameras to {}.", cameras.len(), out_dir.display());
  Ok(())
}
