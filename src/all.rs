// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  camera::*,
  error::*,
  intrinsics::*,
  math::*,
  plane::*,
  types::*,
};

pub use {
  std::path::Path,
  log::{debug, info},
  nalgebra::DMatrix,
  serde::Deserialize,
  anyhow::{bail, Context as AnyhowContext, Result},
};
