//! Path-level simplify: runs of straight lines become fewer lines or one cubic.
//!
//! A run is a maximal sequence of at least three consecutive `Line` commands;
//! its polyline is the current point followed by the line endpoints.
//! 1. RDP the run polyline with `tolerance`.
//! 2. Each span between consecutive kept vertices becomes a `Line`, except when
//!    it dropped points in an open subpath and those points deviate from the
//!    span chord by more than `tolerance * curve_flat_ratio`. Such a span is
//!    fitted and replaced by the cubic when the fit is a single cubic within
//!    `tolerance`.
//! 3. A run that RDP collapsed to its two endpoints only takes the cubic when
//!    that saves points (more than three lines).
//!
//! `Move`, `Curve` and `Close` pass through unchanged.

use crate::error::{check_tolerance, Result};
use crate::fit::fit_curve_spans;
use crate::geom::{perpendicular_distance, CubicBez, GeomCfg, Point};
use crate::simplify::rdp_indices;

use super::{PathEl, VectorPath};

/// Shortest run of `Line` commands that is considered for simplification.
const MIN_RUN: usize = 3;

impl VectorPath {
    pub fn simplify(&self, tolerance: f64) -> Result<VectorPath> {
        self.simplify_with(tolerance, GeomCfg::default())
    }

    pub fn simplify_with(&self, tolerance: f64, cfg: GeomCfg) -> Result<VectorPath> {
        check_tolerance(tolerance)?;
        let closed = self.subpath_closed_flags();
        let els: Vec<PathEl> = self.iter().collect();
        let mut out = VectorPath::new();
        let mut subpath = 0usize;
        let mut cur = Point::zeros();
        let mut i = 0;
        while i < els.len() {
            match els[i] {
                PathEl::MoveTo(p) => {
                    if i > 0 {
                        subpath += 1;
                    }
                    out.move_to(p);
                    cur = p;
                    i += 1;
                }
                PathEl::LineTo(_) => {
                    let mut run = vec![cur];
                    while let Some(PathEl::LineTo(p)) = els.get(i) {
                        run.push(*p);
                        i += 1;
                    }
                    let open = !closed.get(subpath).copied().unwrap_or(false);
                    if run.len() > MIN_RUN {
                        emit_run(&run, open, tolerance, cfg, &mut out)?;
                    } else {
                        for p in &run[1..] {
                            out.line_to(*p);
                        }
                    }
                    cur = run[run.len() - 1];
                }
                PathEl::CurveTo(c1, c2, p) => {
                    out.curve_to(c1, c2, p);
                    cur = p;
                    i += 1;
                }
                PathEl::ClosePath => {
                    out.close();
                    i += 1;
                }
            }
        }
        tracing::debug!(
            before = self.points().len(),
            after = out.points().len(),
            tolerance,
            "path simplify"
        );
        Ok(out)
    }
}

fn emit_run(run: &[Point], open: bool, tolerance: f64, cfg: GeomCfg, out: &mut VectorPath) -> Result<()> {
    let keep = rdp_indices(run, tolerance)?;
    let lines = run.len() - 1;
    let collapsed = keep.len() == 2;
    for w in keep.windows(2) {
        let (a, b) = (w[0], w[1]);
        if b > a + 1 && open && (!collapsed || lines > MIN_RUN) {
            let span = &run[a..=b];
            let deviation = span[1..span.len() - 1]
                .iter()
                .map(|p| perpendicular_distance(*p, span[0], span[span.len() - 1]))
                .fold(0.0, f64::max);
            if deviation > tolerance * cfg.curve_flat_ratio {
                if let Some(c) = single_cubic(span, tolerance, cfg)? {
                    out.curve_to(c.p1, c.p2, run[b]);
                    continue;
                }
            }
        }
        out.line_to(run[b]);
    }
    Ok(())
}

fn single_cubic(span: &[Point], tolerance: f64, cfg: GeomCfg) -> Result<Option<CubicBez>> {
    let mut fitted = fit_curve_spans(span, tolerance, cfg)?;
    if fitted.len() == 1 && fitted[0].max_error <= tolerance {
        Ok(Some(fitted.remove(0).curve))
    } else {
        Ok(None)
    }
}
