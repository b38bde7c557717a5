//! 2D vector path and geometry core.
//!
//! Layers (leaves first)
//! - `geom`: points, rectangles, boundaries, affine matrices, lines, cubics.
//! - `overlap`: Cohen–Sutherland span rejection test.
//! - `intersect`: line/line, line/curve and curve/curve intersection records.
//! - `fit`, `simplify`, `polygon`: Schneider fitting, RDP, polygon queries and
//!   boolean operations.
//! - `path`: command/point stream model composing all of the above.
//!
//! All operations are pure computation over caller-owned buffers. Tolerances
//! and recursion guards live in `GeomCfg`.

pub mod error;
pub mod fit;
pub mod geom;
pub mod intersect;
pub mod overlap;
pub mod path;
pub mod polygon;
pub mod sample;
pub mod simplify;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{GeomError, Result};
pub use geom::{AffineMatrix, CubicBez, GeomCfg, Line, Point, Rect};
pub use path::{PathCmd, Pen, VectorPath};
pub use polygon::{BooleanOp, Polygon};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{GeomError, Result};
    pub use crate::fit::{fit_curve, fit_curve_spans, FittedSpan};
    pub use crate::geom::{AffineMatrix, Boundary, CubicBez, GeomCfg, Line, Point, Rect, Size};
    pub use crate::intersect::{
        intersect, IntersectionList, IntersectionRecord, Segment, SegmentEnd, SegmentId, SegmentKind,
    };
    pub use crate::overlap::{intersects, Overlap};
    pub use crate::path::{vertical_grid, PathCmd, PathEl, PathSegment, Pen, SvgPen, VectorPath};
    pub use crate::polygon::{BooleanOp, Polygon};
    pub use crate::sample::{draw_stroke, ReplayToken, StrokeCfg};
    pub use crate::simplify::{rdp_indices, simplify_polyline};
}
