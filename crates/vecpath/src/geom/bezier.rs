//! Line segments and cubic Bézier curves.
//!
//! - `Line`: two endpoints, parametrized `p0 + u (p1 - p0)`.
//! - `CubicBez`: four control points; evaluation, derivatives, de Casteljau
//!   split, tight bounds (derivative roots) and adaptive flattening.

use super::roots::{solve_quadratic, unit_interval_roots};
use super::types::{perpendicular_distance, Boundary, Point, Rect};

/// Straight segment from `p0` to `p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub p0: Point,
    pub p1: Point,
}

impl Line {
    #[inline]
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    #[inline]
    pub fn eval(&self, u: f64) -> Point {
        self.p0 + (self.p1 - self.p0) * u
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).norm()
    }

    #[inline]
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }

    #[inline]
    pub fn boundary(&self) -> Boundary {
        Boundary::new(self.p0, self.p1)
    }

    /// Piece between `u0` and `u1`.
    #[inline]
    pub fn subsegment(&self, u0: f64, u1: f64) -> Line {
        Line::new(self.eval(u0), self.eval(u1))
    }
}

/// Cubic Bézier `B(u) = Σ Bᵢ(u) pᵢ`, `u ∈ [0,1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBez {
    #[inline]
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Degree-1 cubic: inner controls at the chord thirds.
    pub fn straight(p0: Point, p3: Point) -> Self {
        let d = p3 - p0;
        Self::new(p0, p0 + d / 3.0, p0 + d * (2.0 / 3.0), p3)
    }

    #[inline]
    pub fn eval(&self, u: f64) -> Point {
        let mt = 1.0 - u;
        let mt2 = mt * mt;
        let u2 = u * u;
        self.p0 * (mt2 * mt) + self.p1 * (3.0 * mt2 * u) + self.p2 * (3.0 * mt * u2) + self.p3 * (u2 * u)
    }

    /// First derivative `B'(u)`.
    #[inline]
    pub fn deriv(&self, u: f64) -> Point {
        let mt = 1.0 - u;
        (self.p1 - self.p0) * (3.0 * mt * mt)
            + (self.p2 - self.p1) * (6.0 * mt * u)
            + (self.p3 - self.p2) * (3.0 * u * u)
    }

    /// Second derivative `B''(u)`.
    #[inline]
    pub fn deriv2(&self, u: f64) -> Point {
        let mt = 1.0 - u;
        (self.p2 - self.p1 * 2.0 + self.p0) * (6.0 * mt) + (self.p3 - self.p2 * 2.0 + self.p1) * (6.0 * u)
    }

    /// Power-basis coefficients `[a, b, c, d]` with `B(u) = a u³ + b u² + c u + d`.
    #[inline]
    pub fn power_coeffs(&self) -> [Point; 4] {
        let (p0, p1, p2, p3) = (self.p0, self.p1, self.p2, self.p3);
        [
            p3 - p0 + (p1 - p2) * 3.0,
            (p0 - p1 * 2.0 + p2) * 3.0,
            (p1 - p0) * 3.0,
            p0,
        ]
    }

    /// de Casteljau split at `u`; both halves trace the original curve exactly.
    pub fn split(&self, u: f64) -> (CubicBez, CubicBez) {
        let lerp = |a: Point, b: Point| a + (b - a) * u;
        let p01 = lerp(self.p0, self.p1);
        let p12 = lerp(self.p1, self.p2);
        let p23 = lerp(self.p2, self.p3);
        let p012 = lerp(p01, p12);
        let p123 = lerp(p12, p23);
        let mid = lerp(p012, p123);
        (
            CubicBez::new(self.p0, p01, p012, mid),
            CubicBez::new(mid, p123, p23, self.p3),
        )
    }

    /// Piece between `u0 < u1`, as an exact cubic.
    pub fn subsegment(&self, u0: f64, u1: f64) -> CubicBez {
        if u0 <= 0.0 {
            if u1 >= 1.0 {
                return *self;
            }
            return self.split(u1).0;
        }
        let (_, right) = self.split(u0);
        if u1 >= 1.0 {
            return right;
        }
        let local = (u1 - u0) / (1.0 - u0);
        right.split(local).0
    }

    /// Bounds of the control polygon (contains the curve).
    pub fn control_bounds(&self) -> Rect {
        let mut r = Rect::from_points(self.p0, self.p3);
        r.include_point(self.p1);
        r.include_point(self.p2);
        r
    }

    /// Tight bounds from the endpoints and the derivative roots on each axis.
    pub fn bounding_box(&self) -> Rect {
        let mut r = Rect::from_points(self.p0, self.p3);
        // B'(u)/3 = (1-u)² d0 + 2(1-u)u d1 + u² d2
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        for axis in 0..2 {
            let a = d0[axis] - 2.0 * d1[axis] + d2[axis];
            let b = 2.0 * (d1[axis] - d0[axis]);
            let c = d0[axis];
            for u in unit_interval_roots(solve_quadratic(a, b, c), 0.0) {
                r.include_point(self.eval(u));
            }
        }
        r
    }

    /// Both inner controls within `tol` of the chord line.
    pub fn is_flat(&self, tol: f64) -> bool {
        self.flatness() <= tol
    }

    /// Max distance of the inner controls to the chord line.
    pub fn flatness(&self) -> f64 {
        perpendicular_distance(self.p1, self.p0, self.p3)
            .max(perpendicular_distance(self.p2, self.p0, self.p3))
    }

    /// Append a polyline approximation (excluding `p0`) to `out`.
    ///
    /// Adaptive halving until flat within `tol` or `max_depth` levels deep.
    pub fn flatten_into(&self, tol: f64, max_depth: u32, out: &mut Vec<Point>) {
        if max_depth == 0 || self.is_flat(tol) {
            out.push(self.p3);
            return;
        }
        let (l, r) = self.split(0.5);
        l.flatten_into(tol, max_depth - 1, out);
        r.flatten_into(tol, max_depth - 1, out);
    }

    /// Polyline approximation including both endpoints.
    pub fn flatten(&self, tol: f64, max_depth: u32) -> Vec<Point> {
        let mut out = vec![self.p0];
        self.flatten_into(tol, max_depth, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn arch() -> CubicBez {
        CubicBez::new(
            vector![0.0, 0.0],
            vector![0.0, 10.0],
            vector![10.0, 10.0],
            vector![10.0, 0.0],
        )
    }

    #[test]
    fn split_halves_trace_the_curve() {
        let c = arch();
        let (l, r) = c.split(0.3);
        for k in 0..=10 {
            let s = k as f64 / 10.0;
            assert!((l.eval(s) - c.eval(0.3 * s)).norm() < 1e-12);
            assert!((r.eval(s) - c.eval(0.3 + 0.7 * s)).norm() < 1e-12);
        }
    }

    #[test]
    fn subsegment_matches_reparametrized_curve() {
        let c = arch();
        let sub = c.subsegment(0.2, 0.6);
        assert!((sub.p0 - c.eval(0.2)).norm() < 1e-12);
        assert!((sub.p3 - c.eval(0.6)).norm() < 1e-12);
        assert!((sub.eval(0.5) - c.eval(0.4)).norm() < 1e-12);
    }

    #[test]
    fn tight_bbox_reaches_the_apex() {
        let bb = arch().bounding_box();
        // apex at u=0.5: y = 0.75 * 10
        assert!((bb.max().y - 7.5).abs() < 1e-12);
        assert!((bb.min().x - 0.0).abs() < 1e-12 && (bb.max().x - 10.0).abs() < 1e-12);
        assert!(arch().control_bounds().max().y >= bb.max().y);
    }

    #[test]
    fn power_basis_agrees_with_bernstein() {
        let c = arch();
        let [a, b, cc, d] = c.power_coeffs();
        for u in [0.0, 0.25, 0.7, 1.0] {
            let p = a * (u * u * u) + b * (u * u) + cc * u + d;
            assert!((p - c.eval(u)).norm() < 1e-12);
        }
    }

    #[test]
    fn flatten_stays_close() {
        let c = arch();
        let pts = c.flatten(0.01, 16);
        assert_eq!(pts.first().copied(), Some(c.p0));
        assert_eq!(pts.last().copied(), Some(c.p3));
        assert!(pts.len() > 4);
    }
}
