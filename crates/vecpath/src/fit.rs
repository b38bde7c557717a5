//! Curve fitting: digitized points → cubic Béziers (Schneider).
//!
//! Purpose
//! - Approximate a polyline by a small set of cubic Béziers whose distance to the
//!   input points, measured at each point's parameter, is at most `tolerance`.
//!
//! Algorithm (per span)
//! 1. End tangents from the neighbouring distinct points.
//! 2. Chord-length parameters (uniform when the span has zero length).
//! 3. Least-squares solve for the two tangent-constrained inner controls.
//! 4. Max error at the parameters; accept when `<= tolerance`.
//! 5. Slightly over (`< tolerance * fit_reparam_factor`): Newton-Raphson
//!    reparametrization and refit, at most `fit_max_iterations` rounds.
//! 6. Otherwise split at the worst point with a shared centre tangent and recurse.
//!
//! Degenerate input
//! - Fewer than two distinct points: one straight cubic.
//! - Two-point spans are straight cubics.
//! - Past `fit_max_depth` the remaining span is emitted as straight cubics
//!   through its points, which keeps the error bound.

use nalgebra::matrix;

use crate::error::{check_points, check_tolerance, Result};
use crate::geom::{CubicBez, GeomCfg, Point};

/// One fitted cubic with the input range it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedSpan {
    pub curve: CubicBez,
    /// Index of the first input point covered.
    pub first: usize,
    /// Index of the last input point covered (shared with the next span).
    pub last: usize,
    /// Parameter of each covered point on `curve` (`params.len() == last - first + 1`).
    pub params: Vec<f64>,
    /// Max distance between `curve.eval(params[i])` and the matching input point.
    pub max_error: f64,
}

/// Fit `points` with cubic Béziers within `tolerance`.
pub fn fit_curve(points: &[Point], tolerance: f64, cfg: GeomCfg) -> Result<Vec<CubicBez>> {
    Ok(fit_curve_spans(points, tolerance, cfg)?
        .into_iter()
        .map(|s| s.curve)
        .collect())
}

/// Like `fit_curve`, keeping the per-cubic parameters and errors.
pub fn fit_curve_spans(points: &[Point], tolerance: f64, cfg: GeomCfg) -> Result<Vec<FittedSpan>> {
    check_points(points, 2)?;
    check_tolerance(tolerance)?;
    let last = points.len() - 1;

    let (Some(t_left), Some(t_right)) = (left_tangent(points), right_tangent(points)) else {
        tracing::debug!(n = points.len(), "fit: fewer than 2 distinct points, straight fallback");
        let curve = CubicBez::straight(points[0], points[last]);
        let params = uniform_params(points.len());
        let max_error = span_error(&points[..], &curve, &params).0;
        return Ok(vec![FittedSpan {
            curve,
            first: 0,
            last,
            params,
            max_error,
        }]);
    };

    let mut fitter = Fitter {
        points,
        tolerance,
        cfg,
        out: Vec::new(),
    };
    fitter.fit_span(0, last, t_left, t_right, 0);
    tracing::trace!(n = points.len(), cubics = fitter.out.len(), "fit: done");
    Ok(fitter.out)
}

struct Fitter<'a> {
    points: &'a [Point],
    tolerance: f64,
    cfg: GeomCfg,
    out: Vec<FittedSpan>,
}

impl Fitter<'_> {
    fn fit_span(&mut self, first: usize, last: usize, t1: Point, t2: Point, depth: u32) {
        let points = self.points;
        let pts = &points[first..=last];
        if pts.len() == 2 {
            self.push_straight(first, last);
            return;
        }
        if depth >= self.cfg.fit_max_depth {
            tracing::debug!(first, last, depth, "fit: depth guard, emitting straight pieces");
            for i in first..last {
                self.push_straight(i, i + 1);
            }
            return;
        }

        let mut params = chord_length_params(pts);
        let mut curve = generate_bezier(pts, &params, t1, t2, self.cfg);
        let (mut err, mut split) = span_error(pts, &curve, &params);
        if err <= self.tolerance {
            self.push(curve, first, last, params, err);
            return;
        }

        if err < self.tolerance * self.cfg.fit_reparam_factor {
            for _ in 0..self.cfg.fit_max_iterations {
                params = reparameterize(pts, &params, &curve);
                curve = generate_bezier(pts, &params, t1, t2, self.cfg);
                (err, split) = span_error(pts, &curve, &params);
                if err <= self.tolerance {
                    self.push(curve, first, last, params, err);
                    return;
                }
            }
        }

        let mid = first + split;
        let center = center_tangent(points, mid, t1);
        self.fit_span(first, mid, t1, center, depth + 1);
        self.fit_span(mid, last, -center, t2, depth + 1);
    }

    fn push(&mut self, curve: CubicBez, first: usize, last: usize, params: Vec<f64>, max_error: f64) {
        self.out.push(FittedSpan {
            curve,
            first,
            last,
            params,
            max_error,
        });
    }

    fn push_straight(&mut self, first: usize, last: usize) {
        let curve = CubicBez::straight(self.points[first], self.points[last]);
        self.push(curve, first, last, vec![0.0, 1.0], 0.0);
    }
}

/// Unit vector of `v`, `None` for a zero (or non-finite) vector.
#[inline]
fn unit(v: Point) -> Option<Point> {
    let n = v.norm();
    (n > 0.0 && n.is_finite()).then(|| v / n)
}

/// Forward tangent at the first point, skipping coincident points.
fn left_tangent(points: &[Point]) -> Option<Point> {
    let p0 = points[0];
    points[1..].iter().find_map(|p| unit(*p - p0))
}

/// Backward tangent at the last point, skipping coincident points.
fn right_tangent(points: &[Point]) -> Option<Point> {
    let (last, rest) = points.split_last()?;
    rest.iter().rev().find_map(|p| unit(*p - *last))
}

/// Tangent at interior point `c`, pointing backwards (towards `c - 1`).
fn center_tangent(points: &[Point], c: usize, fallback: Point) -> Point {
    unit(points[c - 1] - points[c + 1])
        .or_else(|| unit(points[c - 1] - points[c]))
        .or_else(|| unit(points[c] - points[c + 1]))
        .unwrap_or(-fallback)
}

fn uniform_params(n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![0.0; n];
    }
    (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
}

/// Cumulative chord length normalized to `[0, 1]`.
fn chord_length_params(pts: &[Point]) -> Vec<f64> {
    let mut u = Vec::with_capacity(pts.len());
    let mut acc = 0.0;
    u.push(0.0);
    for w in pts.windows(2) {
        acc += (w[1] - w[0]).norm();
        u.push(acc);
    }
    if !(acc > 0.0) {
        return uniform_params(pts.len());
    }
    for v in u.iter_mut() {
        *v /= acc;
    }
    if let Some(end) = u.last_mut() {
        *end = 1.0;
    }
    u
}

#[inline]
fn bernstein(u: f64) -> [f64; 4] {
    let mt = 1.0 - u;
    [mt * mt * mt, 3.0 * mt * mt * u, 3.0 * mt * u * u, u * u * u]
}

/// Least-squares cubic with fixed endpoints and end tangent directions.
///
/// Falls back to the Wu/Barsky heuristic (`|p3 - p0| / 3` along the tangents)
/// when the system is singular or yields a non-positive tangent length.
fn generate_bezier(pts: &[Point], params: &[f64], t1: Point, t2: Point, cfg: GeomCfg) -> CubicBez {
    let p0 = pts[0];
    let p3 = pts[pts.len() - 1];
    let (mut c00, mut c01, mut c11, mut x0, mut x1) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (p, &u) in pts.iter().zip(params) {
        let b = bernstein(u);
        let a0 = t1 * b[1];
        let a1 = t2 * b[2];
        c00 += a0.dot(&a0);
        c01 += a0.dot(&a1);
        c11 += a1.dot(&a1);
        let tmp = *p - (p0 * (b[0] + b[1]) + p3 * (b[2] + b[3]));
        x0 += a0.dot(&tmp);
        x1 += a1.dot(&tmp);
    }

    let seg_len = (p3 - p0).norm();
    let eps = cfg.eps_param * seg_len;
    let det = c00 * c11 - c01 * c01;
    let alphas = if det.abs() > cfg.eps_det * (c00 * c11).max(f64::MIN_POSITIVE) {
        matrix![c00, c01; c01, c11]
            .try_inverse()
            .map(|inv| inv * nalgebra::Vector2::new(x0, x1))
    } else {
        None
    };

    match alphas {
        Some(a) if a.x.is_finite() && a.y.is_finite() && a.x >= eps && a.y >= eps && a.x > 0.0 && a.y > 0.0 => {
            CubicBez::new(p0, p0 + t1 * a.x, p3 + t2 * a.y, p3)
        }
        _ => {
            let dist = seg_len / 3.0;
            CubicBez::new(p0, p0 + t1 * dist, p3 + t2 * dist, p3)
        }
    }
}

/// Max point error at the given parameters and the interior index where it occurs.
fn span_error(pts: &[Point], curve: &CubicBez, params: &[f64]) -> (f64, usize) {
    let n = pts.len();
    let mut split = n / 2;
    let mut max = 0.0;
    for i in 1..n.saturating_sub(1) {
        let d = (curve.eval(params[i]) - pts[i]).norm();
        if d > max {
            max = d;
            split = i;
        }
    }
    (max, split)
}

/// One Newton-Raphson step per point towards the closest curve parameter.
fn reparameterize(pts: &[Point], params: &[f64], curve: &CubicBez) -> Vec<f64> {
    pts.iter()
        .zip(params)
        .map(|(p, &u)| newton_root(curve, *p, u))
        .collect()
}

fn newton_root(curve: &CubicBez, p: Point, u: f64) -> f64 {
    let diff = curve.eval(u) - p;
    let d1 = curve.deriv(u);
    let d2 = curve.deriv2(u);
    let numerator = diff.dot(&d1);
    let denominator = d1.dot(&d1) + diff.dot(&d2);
    if !(denominator.abs() > 0.0) {
        return u;
    }
    let next = u - numerator / denominator;
    if next.is_finite() {
        next.clamp(0.0, 1.0)
    } else {
        u
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeomError;
    use crate::sample::{draw_stroke, ReplayToken, StrokeCfg};
    use nalgebra::vector;
    use proptest::prelude::*;

    fn assert_bound(points: &[Point], spans: &[FittedSpan], tol: f64) {
        assert_eq!(spans.first().map(|s| s.first), Some(0));
        assert_eq!(spans.last().map(|s| s.last), Some(points.len() - 1));
        for w in spans.windows(2) {
            assert_eq!(w[0].last, w[1].first);
        }
        for s in spans {
            assert_eq!(s.params.len(), s.last - s.first + 1);
            assert!(s.max_error <= tol);
            for (k, &u) in s.params.iter().enumerate() {
                let d = (s.curve.eval(u) - points[s.first + k]).norm();
                assert!(d <= tol + 1e-9, "span {}..{} point {k}: {d}", s.first, s.last);
            }
        }
    }

    #[test]
    fn rejects_bad_input() {
        let cfg = GeomCfg::default();
        assert_eq!(
            fit_curve(&[vector![0.0, 0.0]], 1.0, cfg),
            Err(GeomError::TooFewPoints { needed: 2, got: 1 })
        );
        assert_eq!(
            fit_curve(&[vector![0.0, 0.0], vector![f64::NAN, 1.0]], 1.0, cfg),
            Err(GeomError::NonFinite { index: 1 })
        );
        assert!(matches!(
            fit_curve(&[vector![0.0, 0.0], vector![1.0, 1.0]], -1.0, cfg),
            Err(GeomError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn two_points_give_a_straight_cubic() {
        let pts = [vector![0.0, 0.0], vector![3.0, 0.0]];
        let out = fit_curve(&pts, 0.1, GeomCfg::default()).unwrap();
        assert_eq!(out, vec![CubicBez::straight(pts[0], pts[1])]);
        assert!((out[0].p1 - vector![1.0, 0.0]).norm() < 1e-12);
    }

    #[test]
    fn coincident_points_fall_back_to_one_straight_cubic() {
        let pts = [vector![2.0, 2.0]; 5];
        let spans = fit_curve_spans(&pts, 0.1, GeomCfg::default()).unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].max_error < 1e-12);
        assert!(spans[0].curve.p0 == pts[0] && spans[0].curve.p3 == pts[4]);
    }

    #[test]
    fn collinear_points_fit_one_cubic() {
        let pts: Vec<Point> = (0..8).map(|i| vector![i as f64, 2.0 * i as f64]).collect();
        let spans = fit_curve_spans(&pts, 0.01, GeomCfg::default()).unwrap();
        assert_eq!(spans.len(), 1);
        assert_bound(&pts, &spans, 0.01);
    }

    #[test]
    fn three_point_bump_is_interpolated_exactly() {
        let pts = [vector![2.0, 0.0], vector![3.0, 0.5], vector![4.0, 0.0]];
        let spans = fit_curve_spans(&pts, 1.0, GeomCfg::default()).unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].max_error < 1e-9);
        assert!((spans[0].curve.eval(0.5) - pts[1]).norm() < 1e-9);
    }

    #[test]
    fn quarter_circle_needs_few_cubics() {
        let pts: Vec<Point> = (0..=30)
            .map(|i| {
                let th = std::f64::consts::FRAC_PI_2 * i as f64 / 30.0;
                vector![10.0 * th.cos(), 10.0 * th.sin()]
            })
            .collect();
        let spans = fit_curve_spans(&pts, 0.01, GeomCfg::default()).unwrap();
        assert!(spans.len() <= 4, "got {} cubics", spans.len());
        assert_bound(&pts, &spans, 0.01);
    }

    #[test]
    fn sharp_zigzag_splits_into_contiguous_spans() {
        let pts: Vec<Point> = (0..9)
            .map(|i| vector![i as f64, if i % 2 == 0 { 0.0 } else { 3.0 }])
            .collect();
        let spans = fit_curve_spans(&pts, 0.05, GeomCfg::default()).unwrap();
        assert!(spans.len() > 1);
        assert_bound(&pts, &spans, 0.05);
    }

    #[test]
    fn depth_guard_keeps_the_bound() {
        let cfg = GeomCfg {
            fit_max_depth: 0,
            ..GeomCfg::default()
        };
        let pts: Vec<Point> = (0..6).map(|i| vector![i as f64, (i * i) as f64]).collect();
        let spans = fit_curve_spans(&pts, 1e-9, cfg).unwrap();
        assert_eq!(spans.len(), 5);
        assert_bound(&pts, &spans, 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn fitted_error_is_within_tolerance(seed in 0u64..1000, tol in 0.05f64..2.0) {
            let pts = draw_stroke(StrokeCfg::default(), ReplayToken { seed, index: 0 });
            let spans = fit_curve_spans(&pts, tol, GeomCfg::default()).unwrap();
            assert_bound(&pts, &spans, tol);
        }
    }
}
