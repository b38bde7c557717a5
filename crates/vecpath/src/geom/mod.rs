//! 2D primitives: points, rectangles, boundaries, affine matrices, lines and cubics.
//!
//! Purpose
//! - Value types consumed by every other module. Nothing here allocates except
//!   flattening and root lists.
//!
//! Conventions
//! - Points are `nalgebra::Vector2<f64>`.
//! - Tolerances live in `GeomCfg` and are passed by value.

mod affine;
mod bezier;
pub mod roots;
mod types;

pub use affine::AffineMatrix;
pub use bezier::{CubicBez, Line};
pub use types::{Boundary, GeomCfg, Point, Rect, Size};

pub(crate) use types::{cross, cross3, perpendicular_distance, point_segment_distance};
