//! Real roots of low-degree polynomials.
//!
//! - `solve_quadratic`: numerically stable form (no cancellation in `-b ± √Δ`).
//! - `solve_cubic`: depressed-cubic reduction (Cardano / trigonometric), falls
//!   back to `solve_quadratic` when the leading coefficient vanishes relative to
//!   the others. Roots are polished with two Newton steps.
//!
//! Roots are returned unsorted and may contain near-duplicates for multiple roots.

use std::f64::consts::PI;

/// Relative size under which a leading coefficient is treated as zero.
const EPS_LEADING: f64 = 1e-12;

/// Real roots of `a x² + b x + c = 0`.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 || !scale.is_finite() {
        return Vec::new();
    }
    if a.abs() <= EPS_LEADING * scale {
        if b.abs() <= EPS_LEADING * scale {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        // Tangent roots slightly below zero from rounding.
        if disc > -EPS_LEADING * b * b {
            return vec![-b / (2.0 * a)];
        }
        return Vec::new();
    }
    if disc == 0.0 {
        return vec![-b / (2.0 * a)];
    }
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let q = if q == 0.0 { -0.5 * disc.sqrt() } else { q };
    let mut out = vec![q / a];
    if q != 0.0 {
        out.push(c / q);
    }
    out
}

/// Real roots of `a x³ + b x² + c x + d = 0`.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs()).max(d.abs());
    if scale == 0.0 || !scale.is_finite() {
        return Vec::new();
    }
    if a.abs() <= EPS_LEADING * scale {
        return solve_quadratic(b, c, d);
    }
    // x³ + B x² + C x + D
    let bb = b / a;
    let cc = c / a;
    let dd = d / a;
    // x = y - B/3  →  y³ + p y + q
    let shift = bb / 3.0;
    let p = cc - bb * bb / 3.0;
    let q = 2.0 * bb * bb * bb / 27.0 - bb * cc / 3.0 + dd;
    let disc = q * q / 4.0 + p * p * p / 27.0;

    let mut roots = if p.abs() <= EPS_LEADING && q.abs() <= EPS_LEADING {
        vec![-shift]
    } else if disc > EPS_LEADING {
        let s = disc.sqrt();
        vec![(-q / 2.0 + s).cbrt() + (-q / 2.0 - s).cbrt() - shift]
    } else if disc >= -EPS_LEADING {
        let u = (-q / 2.0).cbrt();
        vec![2.0 * u - shift, -u - shift]
    } else {
        // three distinct real roots, p < 0
        let r = 2.0 * (-p / 3.0).sqrt();
        let arg = (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        (0..3)
            .map(|k| r * (phi - 2.0 * PI * k as f64 / 3.0).cos() - shift)
            .collect()
    };

    for x in roots.iter_mut() {
        *x = polish(a, b, c, d, *x);
    }
    roots
}

/// Two Newton steps on the cubic; keeps the input if a step misbehaves.
fn polish(a: f64, b: f64, c: f64, d: f64, mut x: f64) -> f64 {
    for _ in 0..2 {
        let f = ((a * x + b) * x + c) * x + d;
        let df = (3.0 * a * x + 2.0 * b) * x + c;
        if df == 0.0 {
            break;
        }
        let next = x - f / df;
        if !next.is_finite() {
            break;
        }
        x = next;
    }
    x
}

/// Keep roots inside `[-eps, 1 + eps]`, clamp them to `[0, 1]`, sort and merge near-duplicates.
pub fn unit_interval_roots(mut roots: Vec<f64>, eps: f64) -> Vec<f64> {
    roots.retain(|r| r.is_finite() && *r >= -eps && *r <= 1.0 + eps);
    for r in roots.iter_mut() {
        *r = r.clamp(0.0, 1.0);
    }
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|a, b| (*a - *b).abs() <= eps);
    roots
}
