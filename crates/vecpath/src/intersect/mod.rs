//! Curve/line intersection engine.
//!
//! Purpose
//! - Pairwise intersections of line segments and cubic Béziers, appended to a
//!   caller-owned `IntersectionList` as parametrized records.
//!
//! Behavior
//! - line/line: 2×2 solve; parallel, collinear and zero-length segments never
//!   intersect. At most 1 record.
//! - line/curve: the line's implicit equation substituted into the cubic's power
//!   basis, solved with `geom::roots::solve_cubic`. At most 3 records.
//! - curve/curve: recursive halving with bounding-box rejection (`overlap`),
//!   resolved on flat pieces by chord intersection. At most 9 records.
//! - Records from one call closer than `eps_merge` to a record of the same call
//!   are dropped. Lists are append-only and keep discovery order.
//!
//! References
//! - Code cross-refs: `overlap::intersects`, `geom::{Line, CubicBez, GeomCfg}`

mod curve_curve;

use crate::geom::{cross, roots, CubicBez, GeomCfg, Line, Point};

pub use curve_curve::curve_curve;

/// Kind of primitive an intersection end belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Line,
    Curve,
}

/// Index into the source point array of a segment's start point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SegmentId(pub usize);

/// One side of an intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentEnd {
    pub kind: SegmentKind,
    pub id: SegmentId,
    /// Local parameter in `[0, 1]`.
    pub u: f64,
    /// The point evaluated on this segment at `u`.
    pub point: Point,
}

/// Intersection between segment `a` and segment `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionRecord {
    pub a: SegmentEnd,
    pub b: SegmentEnd,
}

impl IntersectionRecord {
    /// Same intersection seen from the other segment.
    #[inline]
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
}

/// Append-only list of intersections in discovery order.
#[derive(Clone, Debug, Default)]
pub struct IntersectionList {
    records: Vec<IntersectionRecord>,
}

impl IntersectionList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn push(&mut self, rec: IntersectionRecord) {
        self.records.push(rec);
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, IntersectionRecord> {
        self.records.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[IntersectionRecord] {
        &self.records
    }

    /// Push unless a record appended at or after `since` lies within `eps` of it.
    pub(crate) fn push_unique(&mut self, rec: IntersectionRecord, since: usize, eps: f64) -> bool {
        let dup = self.records[since..]
            .iter()
            .any(|r| (r.a.point - rec.a.point).norm() <= eps && (r.b.point - rec.b.point).norm() <= eps);
        if dup {
            return false;
        }
        self.records.push(rec);
        true
    }
}

impl<'a> IntoIterator for &'a IntersectionList {
    type Item = &'a IntersectionRecord;
    type IntoIter = std::slice::Iter<'a, IntersectionRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A line or a cubic, the two primitive kinds the engine understands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Line(Line),
    Curve(CubicBez),
}

impl Segment {
    #[inline]
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Line(_) => SegmentKind::Line,
            Segment::Curve(_) => SegmentKind::Curve,
        }
    }

    #[inline]
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(l) => l.p0,
            Segment::Curve(c) => c.p0,
        }
    }

    #[inline]
    pub fn end(&self) -> Point {
        match self {
            Segment::Line(l) => l.p1,
            Segment::Curve(c) => c.p3,
        }
    }

    #[inline]
    pub fn eval(&self, u: f64) -> Point {
        match self {
            Segment::Line(l) => l.eval(u),
            Segment::Curve(c) => c.eval(u),
        }
    }
}

/// Intersect any two primitives; returns the number of records appended.
pub fn intersect(
    a: &Segment,
    a_id: SegmentId,
    b: &Segment,
    b_id: SegmentId,
    cfg: GeomCfg,
    out: &mut IntersectionList,
) -> usize {
    match (a, b) {
        (Segment::Line(la), Segment::Line(lb)) => line_line(la, a_id, lb, b_id, cfg, out),
        (Segment::Line(l), Segment::Curve(c)) => line_curve(l, a_id, c, b_id, cfg, out),
        (Segment::Curve(c), Segment::Line(l)) => {
            let mut tmp = IntersectionList::new();
            let n = line_curve(l, b_id, c, a_id, cfg, &mut tmp);
            for rec in tmp.records {
                out.push(rec.swapped());
            }
            n
        }
        (Segment::Curve(ca), Segment::Curve(cb)) => curve_curve(ca, a_id, cb, b_id, cfg, out),
    }
}

/// Parameters `(s, t)` with `a.eval(s) == b.eval(t)`, `None` when parallel or degenerate.
pub(crate) fn line_params(a: &Line, b: &Line, eps_det: f64) -> Option<(f64, f64)> {
    let da = a.p1 - a.p0;
    let db = b.p1 - b.p0;
    let denom = cross(da, db);
    let scale = da.norm() * db.norm();
    if scale == 0.0 || !(denom.abs() > eps_det * scale) {
        return None;
    }
    let r = b.p0 - a.p0;
    Some((cross(r, db) / denom, cross(r, da) / denom))
}

/// Segment/segment intersection (at most one record).
pub fn line_line(
    a: &Line,
    a_id: SegmentId,
    b: &Line,
    b_id: SegmentId,
    cfg: GeomCfg,
    out: &mut IntersectionList,
) -> usize {
    let Some((s, t)) = line_params(a, b, cfg.eps_det) else {
        return 0;
    };
    let eps = cfg.eps_param;
    if s < -eps || s > 1.0 + eps || t < -eps || t > 1.0 + eps {
        return 0;
    }
    let s = s.clamp(0.0, 1.0);
    let t = t.clamp(0.0, 1.0);
    out.push(IntersectionRecord {
        a: SegmentEnd {
            kind: SegmentKind::Line,
            id: a_id,
            u: s,
            point: a.eval(s),
        },
        b: SegmentEnd {
            kind: SegmentKind::Line,
            id: b_id,
            u: t,
            point: b.eval(t),
        },
    });
    1
}

/// Segment/cubic intersection (at most three records, line end first).
pub fn line_curve(
    line: &Line,
    line_id: SegmentId,
    curve: &CubicBez,
    curve_id: SegmentId,
    cfg: GeomCfg,
    out: &mut IntersectionList,
) -> usize {
    let d = line.p1 - line.p0;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return 0;
    }
    // n·p = n·p0 on the line
    let n = Point::new(-d.y, d.x);
    let c0 = n.dot(&line.p0);
    let [pa, pb, pc, pd] = curve.power_coeffs();
    let us = roots::solve_cubic(n.dot(&pa), n.dot(&pb), n.dot(&pc), n.dot(&pd) - c0);
    let us = roots::unit_interval_roots(us, cfg.eps_param);

    let since = out.len();
    let mut count = 0;
    for u in us {
        let p = curve.eval(u);
        let s = (p - line.p0).dot(&d) / len2;
        if s < -cfg.eps_param || s > 1.0 + cfg.eps_param {
            continue;
        }
        let s = s.clamp(0.0, 1.0);
        let rec = IntersectionRecord {
            a: SegmentEnd {
                kind: SegmentKind::Line,
                id: line_id,
                u: s,
                point: line.eval(s),
            },
            b: SegmentEnd {
                kind: SegmentKind::Curve,
                id: curve_id,
                u,
                point: p,
            },
        };
        if out.push_unique(rec, since, cfg.eps_merge) {
            count += 1;
        }
    }
    count
}
