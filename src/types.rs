// use crate::all::*;

// Eigen-like aliases.
pub type Vector2d = nalgebra::Vector2::<f64>;
pub type Vector3d = nalgebra::Vector3::<f64>;
pub type Vector4d = nalgebra::Vector4::<f64>;
pub type Matrix3d = nalgebra::Matrix3::<f64>;
pub type Matrix34d = nalgebra::Matrix3x4::<f64>;
pub type Matrix4d = nalgebra::Matrix4::<f64>;

// Plane `(a, b, c, d)` of points satisfying `a*x + b*y + c*z + d = 0`.
pub type Plane = Vector4d;
