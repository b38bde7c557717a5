//! Vector path model: command stream over a flat point buffer.
//!
//! Purpose
//! - `VectorPath` stores `PathCmd`s and the points they consume
//!   (`Move`/`Line` one, `Curve` three, `Close` none). It is built by
//!   geometry operations (fit, simplify, subdivide) and replayed against a
//!   `Pen`.
//!
//! Invariants
//! - `points.len()` equals the sum of per-command consumption.
//! - Every subpath starts with `Move`; `Curve` points are `(c1, c2, end)` of a
//!   cubic whose start is the current point.
//! - Drawing with no current point starts a subpath implicitly; drawing after
//!   `Close` first moves back to the subpath start.
//!
//! Code cross-refs: `pen::Pen`, `subdivide`, `simplify`, `polygon::boolean`.

mod pen;
mod simplify;
mod subdivide;

use crate::error::{check_points, check_tolerance, GeomError, Result};
use crate::fit::fit_curve;
use crate::geom::{AffineMatrix, CubicBez, GeomCfg, Line, Point, Rect};
use crate::intersect::{intersect, IntersectionList, Segment, SegmentId, SegmentKind};
use crate::overlap::intersects;
use crate::polygon::{BooleanOp, Polygon};

pub use pen::{Pen, SvgPen};
pub use subdivide::{vertical_grid, MAX_GRID_LINES};

/// One drawing command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathCmd {
    Move,
    Line,
    Curve,
    Close,
}

impl PathCmd {
    /// Number of points this command consumes from the point stream.
    #[inline]
    pub fn point_count(self) -> usize {
        match self {
            PathCmd::Move | PathCmd::Line => 1,
            PathCmd::Curve => 3,
            PathCmd::Close => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PathCmd::Move => "move",
            PathCmd::Line => "line",
            PathCmd::Curve => "curve",
            PathCmd::Close => "close",
        }
    }
}

/// A command together with the points it consumed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathEl {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    ClosePath,
}

/// A drawable segment of a path; `Close` shows up as a `Line` back to the
/// subpath start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSegment {
    /// Index of the segment's start point in the point stream.
    pub id: SegmentId,
    pub kind: SegmentKind,
    pub segment: Segment,
    /// True for the implicit closing line.
    pub closing: bool,
}

/// Command stream plus point stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorPath {
    cmds: Vec<PathCmd>,
    points: Vec<Point>,
    /// Point index of the current subpath's `Move`.
    start: Option<usize>,
}

impl VectorPath {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Current point: end of the last command, the subpath start after `Close`.
    pub fn current_point(&self) -> Option<Point> {
        match self.cmds.last()? {
            PathCmd::Close => self.start_point(),
            _ => self.points.last().copied(),
        }
    }

    fn start_point(&self) -> Option<Point> {
        self.start.map(|i| self.points[i])
    }

    /// Begin a new subpath. A `Move` right after another `Move` replaces it.
    pub fn move_to(&mut self, p: Point) {
        if self.cmds.last() == Some(&PathCmd::Move) {
            if let Some(last) = self.points.last_mut() {
                *last = p;
            }
            return;
        }
        self.start = Some(self.points.len());
        self.cmds.push(PathCmd::Move);
        self.points.push(p);
    }

    /// Make sure there is an open subpath; `at` is used when there is no current point.
    /// Returns false when the subpath was started at `at`.
    fn ensure_open(&mut self, at: Point) -> bool {
        match self.cmds.last() {
            None => {
                self.move_to(at);
                false
            }
            Some(PathCmd::Close) => {
                if let Some(s) = self.start_point() {
                    self.move_to(s);
                }
                true
            }
            Some(_) => true,
        }
    }

    pub fn line_to(&mut self, p: Point) {
        if !self.ensure_open(p) {
            return;
        }
        self.cmds.push(PathCmd::Line);
        self.points.push(p);
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.ensure_open(c1);
        self.cmds.push(PathCmd::Curve);
        self.points.extend_from_slice(&[c1, c2, p]);
    }

    /// Close the current subpath. Ignored when there is none open.
    pub fn close(&mut self) {
        match self.cmds.last() {
            None | Some(PathCmd::Close) => {}
            Some(_) => self.cmds.push(PathCmd::Close),
        }
    }

    /// `Move` to the first point, `Line` to the rest, `Close` when `closed`.
    pub fn from_polyline(points: &[Point], closed: bool) -> Result<Self> {
        check_points(points, 1)?;
        let mut path = Self::new();
        path.move_to(points[0]);
        for p in &points[1..] {
            path.line_to(*p);
        }
        if closed {
            path.close();
        }
        Ok(path)
    }

    /// Chain cubics; a gap between consecutive cubics starts a new subpath.
    pub fn from_cubics(cubics: &[CubicBez]) -> Self {
        let mut path = Self::new();
        for c in cubics {
            if path.current_point() != Some(c.p0) {
                path.move_to(c.p0);
            }
            path.curve_to(c.p1, c.p2, c.p3);
        }
        path
    }

    /// Fit `points` with cubics (see `fit::fit_curve`) into an open path.
    pub fn fit(points: &[Point], tolerance: f64) -> Result<Self> {
        Self::fit_with(points, tolerance, GeomCfg::default())
    }

    pub fn fit_with(points: &[Point], tolerance: f64, cfg: GeomCfg) -> Result<Self> {
        Ok(Self::from_cubics(&fit_curve(points, tolerance, cfg)?))
    }

    /// Commands with their points, in stream order.
    pub fn iter(&self) -> impl Iterator<Item = PathEl> + '_ {
        self.elements().map(|(_, el)| el)
    }

    /// Like `iter`, with the index of the first consumed point.
    fn elements(&self) -> impl Iterator<Item = (usize, PathEl)> + '_ {
        let pts = &self.points;
        self.cmds.iter().scan(0usize, move |at, cmd| {
            let i = *at;
            *at += cmd.point_count();
            let el = match cmd {
                PathCmd::Move => PathEl::MoveTo(pts[i]),
                PathCmd::Line => PathEl::LineTo(pts[i]),
                PathCmd::Curve => PathEl::CurveTo(pts[i], pts[i + 1], pts[i + 2]),
                PathCmd::Close => PathEl::ClosePath,
            };
            Some((i, el))
        })
    }

    /// Replay the command stream against `pen`.
    pub fn apply<P: Pen + ?Sized>(&self, pen: &mut P) {
        for el in self.iter() {
            match el {
                PathEl::MoveTo(p) => pen.move_to(p),
                PathEl::LineTo(p) => pen.line_to(p),
                PathEl::CurveTo(c1, c2, p) => pen.curve_to(c1, c2, p),
                PathEl::ClosePath => pen.close(),
            }
        }
    }

    /// SVG path data for the whole path.
    pub fn to_svg(&self) -> String {
        let mut pen = SvgPen::new();
        self.apply(&mut pen);
        pen.finish()
    }

    /// Drawable segments; zero-length closing lines are skipped.
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut out = Vec::new();
        let mut start = (0usize, Point::zeros());
        let mut cur = (0usize, Point::zeros());
        for (i, el) in self.elements() {
            match el {
                PathEl::MoveTo(p) => {
                    start = (i, p);
                    cur = (i, p);
                }
                PathEl::LineTo(p) => {
                    out.push(PathSegment {
                        id: SegmentId(cur.0),
                        kind: SegmentKind::Line,
                        segment: Segment::Line(Line::new(cur.1, p)),
                        closing: false,
                    });
                    cur = (i, p);
                }
                PathEl::CurveTo(c1, c2, p) => {
                    out.push(PathSegment {
                        id: SegmentId(cur.0),
                        kind: SegmentKind::Curve,
                        segment: Segment::Curve(CubicBez::new(cur.1, c1, c2, p)),
                        closing: false,
                    });
                    cur = (i + 2, p);
                }
                PathEl::ClosePath => {
                    if cur.1 != start.1 {
                        out.push(PathSegment {
                            id: SegmentId(cur.0),
                            kind: SegmentKind::Line,
                            segment: Segment::Line(Line::new(cur.1, start.1)),
                            closing: true,
                        });
                    }
                    cur = start;
                }
            }
        }
        out
    }

    /// Tight bounds of all segments and lone `Move` points, `None` when empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut acc: Option<Rect> = None;
        let mut add = |r: Rect| {
            acc = Some(match acc {
                Some(a) => a.union(&r),
                None => r,
            });
        };
        for el in self.iter() {
            if let PathEl::MoveTo(p) = el {
                add(Rect::from_points(p, p));
            }
        }
        for seg in self.segments() {
            match seg.segment {
                Segment::Line(l) => add(l.bounding_box()),
                Segment::Curve(c) => add(c.bounding_box()),
            }
        }
        acc
    }

    /// Image of the path under `m` (exact for lines and cubics).
    pub fn transform(&self, m: &AffineMatrix) -> VectorPath {
        VectorPath {
            cmds: self.cmds.clone(),
            points: self.points.iter().map(|p| m.map_point(*p)).collect(),
            start: self.start,
        }
    }

    pub fn subpath_count(&self) -> usize {
        self.cmds.iter().filter(|c| **c == PathCmd::Move).count()
    }

    /// Whether subpath `index` (0-based) ends with `Close`.
    pub fn is_closed_subpath(&self, index: usize) -> bool {
        self.subpath_closed_flags().get(index).copied().unwrap_or(false)
    }

    fn subpath_closed_flags(&self) -> Vec<bool> {
        let mut flags = Vec::new();
        for cmd in &self.cmds {
            match cmd {
                PathCmd::Move => flags.push(false),
                PathCmd::Close => {
                    if let Some(f) = flags.last_mut() {
                        *f = true;
                    }
                }
                _ => {}
            }
        }
        flags
    }

    /// One polygon per subpath, curves flattened within `tolerance`.
    pub fn flatten(&self, tolerance: f64) -> Result<Vec<Polygon>> {
        self.flatten_with(tolerance, GeomCfg::default())
    }

    pub fn flatten_with(&self, tolerance: f64, cfg: GeomCfg) -> Result<Vec<Polygon>> {
        check_tolerance(tolerance)?;
        let mut out: Vec<Polygon> = Vec::new();
        let mut pts: Vec<Point> = Vec::new();
        let mut cur = Point::zeros();
        for el in self.iter() {
            match el {
                PathEl::MoveTo(p) => {
                    if !pts.is_empty() {
                        out.push(Polygon::new(std::mem::take(&mut pts)));
                    }
                    pts.push(p);
                    cur = p;
                }
                PathEl::LineTo(p) => {
                    pts.push(p);
                    cur = p;
                }
                PathEl::CurveTo(c1, c2, p) => {
                    CubicBez::new(cur, c1, c2, p).flatten_into(tolerance, cfg.flatten_max_depth, &mut pts);
                    cur = p;
                }
                PathEl::ClosePath => {}
            }
        }
        if !pts.is_empty() {
            out.push(Polygon::new(pts));
        }
        Ok(out)
    }

    /// All intersections between segments of `self` (record end `a`) and `other` (end `b`).
    pub fn intersections(&self, other: &VectorPath, cfg: GeomCfg) -> IntersectionList {
        let mut out = IntersectionList::new();
        let theirs = other.segments();
        for a in self.segments() {
            for b in &theirs {
                if intersects(&a.segment, &b.segment) {
                    intersect(&a.segment, a.id, &b.segment, b.id, cfg, &mut out);
                }
            }
        }
        out
    }

    /// Boolean combination of two single-contour paths, flattened within `tolerance`.
    ///
    /// The result holds one closed polyline subpath per output contour.
    pub fn boolean(&self, other: &VectorPath, op: BooleanOp, tolerance: f64) -> Result<VectorPath> {
        let cfg = GeomCfg::default();
        let a = single_contour(self, tolerance, cfg)?;
        let b = single_contour(other, tolerance, cfg)?;
        let mut out = VectorPath::new();
        for poly in a.boolean(&b, op, cfg)? {
            let sub = VectorPath::from_polyline(&poly.points, true)?;
            out.append(&sub);
        }
        Ok(out)
    }

    /// Append all subpaths of `other`.
    pub fn append(&mut self, other: &VectorPath) {
        other.apply(self);
    }
}

fn single_contour(path: &VectorPath, tolerance: f64, cfg: GeomCfg) -> Result<Polygon> {
    let mut polys = path.flatten_with(tolerance, cfg)?;
    if polys.len() != 1 {
        return Err(GeomError::Unsupported(format!(
            "boolean needs exactly one contour per operand, got {}",
            polys.len()
        )));
    }
    Ok(polys.remove(0))
}

#[cfg(test)]
mod tests;
