//! Error type shared by the geometry operations.
//!
//! - Invalid input (`TooFewPoints`, `NonFinite`, `InvalidTolerance`,
//!   `GridTooDense`, `Unsupported`) is the caller's problem and is recoverable.
//! - `Degenerate` reports numerically degenerate configurations that the
//!   fallback policy of an operation could not resolve.
//! - `Internal` marks a broken invariant inside this crate (a defect, not an
//!   input error). Callers should surface it loudly.

use thiserror::Error;

/// Errors produced by geometry operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GeomError {
    #[error("need at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    #[error("grid spacing {spacing} needs more than {limit} lines")]
    GridTooDense { spacing: f64, limit: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),

    #[error("unsupported operand: {0}")]
    Unsupported(String),

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl GeomError {
    /// True for defects inside the crate, false for input-related failures.
    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, GeomError::Internal(_))
    }
}

pub type Result<T> = std::result::Result<T, GeomError>;

/// Reject point sets that are too short or carry NaN/Inf coordinates.
pub(crate) fn check_points(points: &[crate::Point], needed: usize) -> Result<()> {
    if points.len() < needed {
        return Err(GeomError::TooFewPoints {
            needed,
            got: points.len(),
        });
    }
    if let Some(index) = points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(GeomError::NonFinite { index });
    }
    Ok(())
}

/// Tolerances must be finite and `>= 0`.
pub(crate) fn check_tolerance(tol: f64) -> Result<()> {
    if tol.is_finite() && tol >= 0.0 {
        Ok(())
    } else {
        Err(GeomError::InvalidTolerance(tol))
    }
}
