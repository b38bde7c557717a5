//! 2D affine matrix in row-vector convention.
//!
//! Coefficients `(a, b, c, d, tx, ty)` map `[x y] ↦ [x y]·[[a,b],[c,d]] + [tx,ty]`,
//! i.e. `x' = a·x + c·y + tx`, `y' = b·x + d·y + ty`. Internally the linear part
//! is stored as the column-vector matrix `M = [[a, c], [b, d]]` so that
//! `p' = M p + t`.

use nalgebra::{matrix, Matrix2, Vector2};

use super::types::{GeomCfg, Point, Rect};

/// 2D affine map: `p ↦ M p + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMatrix {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMatrix {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    /// From row-vector coefficients `(a, b, c, d, tx, ty)`.
    #[inline]
    pub fn from_coeffs(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self {
            m: matrix![a, c; b, d],
            t: Vector2::new(tx, ty),
        }
    }

    /// Row-vector coefficients `[a, b, c, d, tx, ty]`.
    #[inline]
    pub fn coeffs(&self) -> [f64; 6] {
        [
            self.m[(0, 0)],
            self.m[(1, 0)],
            self.m[(0, 1)],
            self.m[(1, 1)],
            self.t.x,
            self.t.y,
        ]
    }

    #[inline]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_coeffs(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_coeffs(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counterclockwise rotation by `theta` radians about the origin.
    #[inline]
    pub fn rotation(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_coeffs(c, s, -s, c, 0.0, 0.0)
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m.determinant()
    }

    /// Composition `self ∘ other`: `other` is applied first.
    #[inline]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            m: self.m * other.m,
            t: self.m * other.t + self.t,
        }
    }

    /// Inverse map with the default `eps_det`.
    pub fn invert(&self) -> Option<Self> {
        self.invert_with(GeomCfg::default())
    }

    /// Inverse map, `None` when `|det| <= cfg.eps_det`.
    pub fn invert_with(&self, cfg: GeomCfg) -> Option<Self> {
        if !(self.determinant().abs() > cfg.eps_det) {
            return None;
        }
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }

    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        self.m * p + self.t
    }

    /// Linear part only (no translation).
    #[inline]
    pub fn map_vector(&self, v: Vector2<f64>) -> Vector2<f64> {
        self.m * v
    }

    /// Axis-aligned bounds of the four mapped corners.
    pub fn map_rect(&self, r: &Rect) -> Rect {
        let lo = r.min();
        let hi = r.max();
        let corners = [
            self.map_point(lo),
            self.map_point(Point::new(hi.x, lo.y)),
            self.map_point(hi),
            self.map_point(Point::new(lo.x, hi.y)),
        ];
        let mut out = Rect::from_points(corners[0], corners[0]);
        for c in &corners[1..] {
            out.include_point(*c);
        }
        out
    }
}

impl std::ops::Mul for AffineMatrix {
    type Output = AffineMatrix;
    #[inline]
    fn mul(self, rhs: AffineMatrix) -> Self::Output {
        self.compose(&rhs)
    }
}
