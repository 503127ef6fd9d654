#![allow(non_snake_case)]

mod all;
pub mod camera;
pub mod camera_io;
pub mod camera_setup;
pub mod error;
pub mod intrinsics;
pub mod math;
pub mod plane;
pub mod triangulate;
pub mod types;
pub mod util;

pub use crate::{
  camera::PinholeCamera,
  error::{CameraError, CameraResult},
  intrinsics::construct_k,
  plane::PlaneFrame,
  triangulate::triangulate_point,
  types::*,
};
