//! Basic 2D value types and tolerances.
//!
//! - `GeomCfg`: centralizes epsilons and recursion guards used across the crate.
//! - `Size`, `Rect`: axis-aligned extents; `Rect` keeps non-negative spans.
//! - `Boundary`: a two-corner span with an explicit empty flag.
//!
//! Points are plain `nalgebra::Vector2<f64>` values (`crate::Point`).

use nalgebra::Vector2;

/// A 2D point (or vector). Value type, compared and transformed freely.
pub type Point = Vector2<f64>;

/// Geometry configuration (tolerances and recursion guards).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Determinant threshold for singular 2×2 systems.
    pub eps_det: f64,
    /// Parameter-space tolerance on `u ∈ [0,1]`.
    pub eps_param: f64,
    /// Distance under which two intersection points are the same point.
    pub eps_merge: f64,
    /// Halving depth cap for curve/curve intersection.
    pub max_curve_depth: u32,
    /// Newton-Raphson reparametrization rounds per fitted span.
    pub fit_max_iterations: u32,
    /// Reparametrize only while `max_err < tolerance * fit_reparam_factor`.
    pub fit_reparam_factor: f64,
    /// Split depth cap for curve fitting.
    pub fit_max_depth: u32,
    /// Halving depth cap when flattening cubics.
    pub flatten_max_depth: u32,
    /// Dropped deviation above `tolerance * curve_flat_ratio` counts as curve-like.
    pub curve_flat_ratio: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_param: 1e-6,
            eps_merge: 1e-6,
            max_curve_depth: 40,
            fit_max_iterations: 4,
            fit_reparam_factor: 4.0,
            fit_max_depth: 64,
            flatten_max_depth: 16,
            curve_flat_ratio: 0.1,
        }
    }
}

/// Width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle `{origin, size}` with non-negative size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Build a rectangle; negative spans are flipped so that the size is non-negative.
    pub fn new(origin: Point, size: Size) -> Self {
        let mut r = Rect::default();
        r.set(origin, size);
        r
    }

    /// Reset in place, normalizing negative width/height by moving the origin.
    pub fn set(&mut self, origin: Point, size: Size) {
        let mut o = origin;
        let mut s = size;
        if s.width < 0.0 {
            o.x += s.width;
            s.width = -s.width;
        }
        if s.height < 0.0 {
            o.y += s.height;
            s.height = -s.height;
        }
        self.origin = o;
        self.size = s;
    }

    /// Smallest rectangle containing both corners.
    pub fn from_points(a: Point, b: Point) -> Self {
        Rect::new(a, Size::new(b.x - a.x, b.y - a.y))
    }

    /// Bounding box of a point set, `None` when empty.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut r = Rect::from_points(*first, *first);
        for p in rest {
            r.include_point(*p);
        }
        Some(r)
    }

    #[inline]
    pub fn min(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height,
        )
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + 0.5 * self.size.width,
            self.origin.y + 0.5 * self.size.height,
        )
    }

    /// Zero area (a point or an axis-aligned segment).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }

    /// Closed containment test.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        let hi = self.max();
        p.x >= self.origin.x && p.x <= hi.x && p.y >= self.origin.y && p.y <= hi.y
    }

    pub fn include_point(&mut self, p: Point) {
        let lo = self.min();
        let hi = self.max();
        *self = Rect::from_points(
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        );
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let mut r = *self;
        r.include_point(other.min());
        r.include_point(other.max());
        r
    }

    /// Grow by `d` on every side (shrinks for negative `d`, clamped at zero size).
    pub fn inflate(&self, d: f64) -> Rect {
        let w = (self.size.width + 2.0 * d).max(0.0);
        let h = (self.size.height + 2.0 * d).max(0.0);
        let c = self.center();
        Rect::new(
            Point::new(c.x - 0.5 * w, c.y - 0.5 * h),
            Size::new(w, h),
        )
    }
}

/// Span between two corner points with an explicit degenerate flag.
///
/// An `empty` boundary never intersects anything, even when its corners coincide
/// with another shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub p0: Point,
    pub p1: Point,
    pub empty: bool,
}

impl Boundary {
    #[inline]
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0,
            p1,
            empty: false,
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self {
            p0: Point::zeros(),
            p1: Point::zeros(),
            empty: true,
        }
    }
}

/// z-component of `(b - a) × (c - a)`.
#[inline]
pub(crate) fn cross3(a: Point, b: Point, c: Point) -> f64 {
    cross(b - a, c - a)
}

/// z-component of `u × v`.
#[inline]
pub(crate) fn cross(u: Point, v: Point) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Distance from `p` to the segment `[a, b]` (projection clamped to the segment).
pub(crate) fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Falls back to `|p - a|` when `a == b`.
pub(crate) fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len = ab.norm();
    if len <= 0.0 {
        return (p - a).norm();
    }
    cross(ab, p - a).abs() / len
}
