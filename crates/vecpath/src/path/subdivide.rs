//! Path subdivision against constraint lines.
//!
//! Each segment is intersected with every constraint (`intersect::intersect`),
//! its parameters are sorted, merged within `eps_param` and stripped of values
//! at the segment ends. Lines are split at the points, cubics with
//! `CubicBez::subsegment`, so every piece is an exact cubic of the original.
//! A split closing line is emitted as explicit `Line` pieces followed by `Close`.

use crate::error::{GeomError, Result};
use crate::geom::{CubicBez, GeomCfg, Line, Point, Rect};
use crate::intersect::{intersect, IntersectionList, Segment, SegmentId};
use crate::overlap::intersects;

use super::{PathEl, Pen, VectorPath};

/// Side of the square drawn around each split point by `subdivide_marked`.
const MARK_SIZE: f64 = 4.0;

/// Most lines `vertical_grid` will build.
pub const MAX_GRID_LINES: usize = 100_000;

struct NoMarks;

impl Pen for NoMarks {
    fn move_to(&mut self, _: Point) {}
    fn line_to(&mut self, _: Point) {}
    fn curve_to(&mut self, _: Point, _: Point, _: Point) {}
    fn close(&mut self) {}
}

impl VectorPath {
    /// Split every segment where it crosses one of `constraints`.
    pub fn subdivide(&self, constraints: &[Line], cfg: GeomCfg) -> VectorPath {
        self.subdivide_marked(constraints, cfg, &mut NoMarks)
    }

    /// `subdivide`, drawing a small square on `marks` around every split point.
    pub fn subdivide_marked<P: Pen + ?Sized>(&self, constraints: &[Line], cfg: GeomCfg, marks: &mut P) -> VectorPath {
        let mut out = VectorPath::new();
        let mut start = Point::zeros();
        let mut cur = Point::zeros();
        let mut splits = 0usize;
        for el in self.iter() {
            match el {
                PathEl::MoveTo(p) => {
                    out.move_to(p);
                    start = p;
                    cur = p;
                }
                PathEl::LineTo(p) => {
                    let line = Line::new(cur, p);
                    for u in split_params(&Segment::Line(line), constraints, cfg) {
                        let q = line.eval(u);
                        out.line_to(q);
                        mark(marks, q);
                        splits += 1;
                    }
                    out.line_to(p);
                    cur = p;
                }
                PathEl::CurveTo(c1, c2, p) => {
                    let bez = CubicBez::new(cur, c1, c2, p);
                    let mut u0 = 0.0;
                    for u in split_params(&Segment::Curve(bez), constraints, cfg) {
                        let piece = bez.subsegment(u0, u);
                        out.curve_to(piece.p1, piece.p2, piece.p3);
                        mark(marks, piece.p3);
                        splits += 1;
                        u0 = u;
                    }
                    let last = bez.subsegment(u0, 1.0);
                    out.curve_to(last.p1, last.p2, p);
                    cur = p;
                }
                PathEl::ClosePath => {
                    if cur != start {
                        let line = Line::new(cur, start);
                        let us = split_params(&Segment::Line(line), constraints, cfg);
                        for u in &us {
                            let q = line.eval(*u);
                            out.line_to(q);
                            mark(marks, q);
                        }
                        splits += us.len();
                    }
                    out.close();
                    cur = start;
                }
            }
        }
        tracing::debug!(constraints = constraints.len(), splits, "subdivide");
        out
    }
}

/// Interior split parameters of `seg`, ascending, merged within `eps_param`.
fn split_params(seg: &Segment, constraints: &[Line], cfg: GeomCfg) -> Vec<f64> {
    let mut hits = IntersectionList::new();
    for (k, c) in constraints.iter().enumerate() {
        if intersects(seg, c) {
            intersect(seg, SegmentId(0), &Segment::Line(*c), SegmentId(k), cfg, &mut hits);
        }
    }
    let eps = cfg.eps_param;
    let mut us: Vec<f64> = hits
        .iter()
        .map(|r| r.a.u)
        .filter(|u| *u > eps && *u < 1.0 - eps)
        .collect();
    us.sort_by(|a, b| a.total_cmp(b));
    us.dedup_by(|b, a| (*b - *a).abs() <= eps);
    us
}

fn mark<P: Pen + ?Sized>(marks: &mut P, q: Point) {
    let h = 0.5 * MARK_SIZE;
    marks.move_to(Point::new(q.x - h, q.y - h));
    marks.line_to(Point::new(q.x + h, q.y - h));
    marks.line_to(Point::new(q.x + h, q.y + h));
    marks.line_to(Point::new(q.x - h, q.y + h));
    marks.close();
}

/// Vertical lines at multiples of `spacing` across `rect`.
///
/// Lines overshoot the rect by one `spacing` above and below so that flat
/// paths lying on the rect's edge still cross them.
///
/// Errors: `InvalidTolerance` for a non-positive or non-finite `spacing`,
/// `GridTooDense` when the rect needs more than `MAX_GRID_LINES` lines.
pub fn vertical_grid(rect: &Rect, spacing: f64) -> Result<Vec<Line>> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GeomError::InvalidTolerance(spacing));
    }
    let (lo, hi) = (rect.min(), rect.max());
    let first = (lo.x / spacing).ceil();
    let last = (hi.x / spacing).floor();
    let count = last - first + 1.0;
    if !(count <= MAX_GRID_LINES as f64) {
        return Err(GeomError::GridTooDense {
            spacing,
            limit: MAX_GRID_LINES,
        });
    }
    let first = first as i64;
    let lines = count.max(0.0) as i64;
    Ok((first..first + lines)
        .map(|k| {
            let x = k as f64 * spacing;
            Line::new(Point::new(x, lo.y - spacing), Point::new(x, hi.y + spacing))
        })
        .collect())
}
