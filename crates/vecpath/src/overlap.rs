//! Interval-overlap tester (Cohen–Sutherland outcodes).
//!
//! `intersects(a, b)` is an O(1) rejection test on the axis-aligned spans of two
//! shapes. Both spans are normalized to `min <= max`; the min and max corners of
//! `a` get an outcode relative to the span of `b`; the spans overlap iff no side
//! has both corners outside of it (`code(min) & code(max) == 0`). Touching spans
//! overlap. Empty boundaries never overlap anything.

use crate::geom::{Boundary, CubicBez, Line, Point, Rect};
use crate::intersect::Segment;

/// 4-bit region code of a point relative to a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Outcode(pub u8);

impl Outcode {
    pub const INSIDE: Outcode = Outcode(0);
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const BOTTOM: u8 = 4;
    pub const TOP: u8 = 8;

    /// Code of `p` against the span `[lo, hi]` (assumed normalized).
    #[inline]
    pub fn of(p: Point, lo: Point, hi: Point) -> Outcode {
        let mut code = 0;
        if p.x < lo.x {
            code |= Self::LEFT;
        } else if p.x > hi.x {
            code |= Self::RIGHT;
        }
        if p.y < lo.y {
            code |= Self::BOTTOM;
        } else if p.y > hi.y {
            code |= Self::TOP;
        }
        Outcode(code)
    }

    #[inline]
    pub fn is_inside(self) -> bool {
        self == Self::INSIDE
    }
}

impl std::ops::BitAnd for Outcode {
    type Output = Outcode;
    #[inline]
    fn bitand(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 & rhs.0)
    }
}

/// Anything with an axis-aligned span that can take part in the overlap test.
pub trait Overlap {
    /// Normalized `(min, max)` corners, `None` for an empty item.
    fn span(&self) -> Option<(Point, Point)>;
}

#[inline]
fn normalized(a: Point, b: Point) -> (Point, Point) {
    (
        Point::new(a.x.min(b.x), a.y.min(b.y)),
        Point::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

impl Overlap for Rect {
    fn span(&self) -> Option<(Point, Point)> {
        Some(normalized(self.min(), self.max()))
    }
}

impl Overlap for Boundary {
    fn span(&self) -> Option<(Point, Point)> {
        if self.empty {
            return None;
        }
        Some(normalized(self.p0, self.p1))
    }
}

impl Overlap for Line {
    fn span(&self) -> Option<(Point, Point)> {
        Some(normalized(self.p0, self.p1))
    }
}

impl Overlap for CubicBez {
    /// Control-polygon span (contains the curve).
    fn span(&self) -> Option<(Point, Point)> {
        let r = self.control_bounds();
        Some((r.min(), r.max()))
    }
}

impl Overlap for Segment {
    fn span(&self) -> Option<(Point, Point)> {
        match self {
            Segment::Line(l) => l.span(),
            Segment::Curve(c) => c.span(),
        }
    }
}

/// True iff the spans of `a` and `b` overlap on both axes.
pub fn intersects<A: Overlap + ?Sized, B: Overlap + ?Sized>(a: &A, b: &B) -> bool {
    let (Some((amin, amax)), Some((bmin, bmax))) = (a.span(), b.span()) else {
        return false;
    };
    let lo = Outcode::of(amin, bmin, bmax);
    let hi = Outcode::of(amax, bmin, bmax);
    (lo & hi).is_inside()
}
