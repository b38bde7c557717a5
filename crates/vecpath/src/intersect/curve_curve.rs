//! Cubic/cubic intersection by recursive halving.
//!
//! The working tolerance `tol` is `eps_merge`, grown to `REL_TOL` times the
//! extent of both control boxes for large coordinates. A pair of pieces is
//! rejected when their control boxes (padded by `tol`) do not overlap.
//! Surviving pairs are halved until both pieces are flat within `tol / 4`,
//! then their chords are intersected and the chord parameters are refined onto
//! the curves. Pieces that never flatten are tried at their midpoints once both
//! parameter widths drop below `eps_param` or the depth reaches
//! `max_curve_depth`. Every candidate is kept only when the two curve points
//! lie within `ACCEPT_FACTOR * tol` of each other.

use crate::geom::{CubicBez, GeomCfg, Line, Point};
use crate::overlap::intersects;

use super::{line_params, IntersectionList, IntersectionRecord, SegmentEnd, SegmentId, SegmentKind};

/// Bézout bound for two cubics.
const MAX_HITS: usize = 9;

/// Tolerance per unit of extent; below this, coordinates carry rounding noise.
const REL_TOL: f64 = 1e-9;

/// Gap allowed between the two curve points of an accepted pair, in `tol`s.
const ACCEPT_FACTOR: f64 = 4.0;

struct Search<'a> {
    a: &'a CubicBez,
    a_id: SegmentId,
    b: &'a CubicBez,
    b_id: SegmentId,
    cfg: GeomCfg,
    tol: f64,
    out: &'a mut IntersectionList,
    since: usize,
    found: usize,
}

/// Cubic/cubic intersection (at most nine records, `a` end first).
pub fn curve_curve(
    a: &CubicBez,
    a_id: SegmentId,
    b: &CubicBez,
    b_id: SegmentId,
    cfg: GeomCfg,
    out: &mut IntersectionList,
) -> usize {
    let since = out.len();
    let extent = a.control_bounds().union(&b.control_bounds()).size;
    let tol = cfg.eps_merge.max(REL_TOL * extent.width.max(extent.height));
    let mut search = Search {
        a,
        a_id,
        b,
        b_id,
        cfg,
        tol,
        out,
        since,
        found: 0,
    };
    search.descend(*a, (0.0, 1.0), *b, (0.0, 1.0), 0);
    if search.found >= MAX_HITS {
        tracing::debug!(a = a_id.0, b = b_id.0, "curve/curve hit cap reached (overlapping curves?)");
    }
    search.found
}

impl Search<'_> {
    fn descend(&mut self, pa: CubicBez, ra: (f64, f64), pb: CubicBez, rb: (f64, f64), depth: u32) {
        if self.found >= MAX_HITS {
            return;
        }
        if !intersects(&pa.control_bounds().inflate(self.tol), &pb.control_bounds()) {
            return;
        }
        let flat_tol = 0.25 * self.tol;
        let a_flat = pa.is_flat(flat_tol);
        let b_flat = pb.is_flat(flat_tol);
        if a_flat && b_flat {
            self.resolve_flat(&pa, ra, &pb, rb);
            return;
        }
        let narrow = ra.1 - ra.0 <= self.cfg.eps_param && rb.1 - rb.0 <= self.cfg.eps_param;
        if narrow || depth >= self.cfg.max_curve_depth {
            self.accept(ra, 0.5, rb, 0.5);
            return;
        }

        let a_parts = halves(pa, ra, a_flat);
        let b_parts = halves(pb, rb, b_flat);
        for (ca, sa) in a_parts.iter().flatten() {
            for (cb, sb) in b_parts.iter().flatten() {
                self.descend(*ca, *sa, *cb, *sb, depth + 1);
            }
        }
    }

    /// Both pieces are straight within tolerance: intersect the chords.
    fn resolve_flat(&mut self, pa: &CubicBez, ra: (f64, f64), pb: &CubicBez, rb: (f64, f64)) {
        let la = Line::new(pa.p0, pa.p3);
        let lb = Line::new(pb.p0, pb.p3);
        let eps = self.cfg.eps_param;
        match line_params(&la, &lb, self.cfg.eps_det) {
            Some((s, t)) => {
                if s < -eps || s > 1.0 + eps || t < -eps || t > 1.0 + eps {
                    return;
                }
                let s = refine(pa, la.eval(s.clamp(0.0, 1.0)), s.clamp(0.0, 1.0));
                let t = refine(pb, lb.eval(t.clamp(0.0, 1.0)), t.clamp(0.0, 1.0));
                self.accept(ra, s, rb, t);
            }
            None => {
                // Parallel chords: accept a tangential contact if they touch.
                if let Some((s, t)) = closest_endpoints(&la, &lb, self.tol) {
                    self.accept(ra, s, rb, t);
                }
            }
        }
    }

    fn accept(&mut self, ra: (f64, f64), s: f64, rb: (f64, f64), t: f64) {
        let ua = ra.0 + s * (ra.1 - ra.0);
        let ub = rb.0 + t * (rb.1 - rb.0);
        let (pa, pb) = (self.a.eval(ua), self.b.eval(ub));
        if (pa - pb).norm() > ACCEPT_FACTOR * self.tol {
            return;
        }
        let rec = IntersectionRecord {
            a: SegmentEnd {
                kind: SegmentKind::Curve,
                id: self.a_id,
                u: ua,
                point: pa,
            },
            b: SegmentEnd {
                kind: SegmentKind::Curve,
                id: self.b_id,
                u: ub,
                point: pb,
            },
        };
        if self.out.push_unique(rec, self.since, self.tol) {
            self.found += 1;
        }
    }
}

type Piece = (CubicBez, (f64, f64));

/// Split in two unless the piece is already flat.
fn halves(c: CubicBez, r: (f64, f64), flat: bool) -> [Option<Piece>; 2] {
    if flat {
        return [Some((c, r)), None];
    }
    let mid = 0.5 * (r.0 + r.1);
    let (l, h) = c.split(0.5);
    [Some((l, (r.0, mid))), Some((h, (mid, r.1)))]
}

/// Newton projection of `p` onto the piece, starting from the chord parameter.
fn refine(c: &CubicBez, p: Point, mut u: f64) -> f64 {
    for _ in 0..4 {
        let diff = c.eval(u) - p;
        let d1 = c.deriv(u);
        let denom = d1.norm_squared() + diff.dot(&c.deriv2(u));
        if !(denom.abs() > 0.0) {
            break;
        }
        let next = (u - diff.dot(&d1) / denom).clamp(0.0, 1.0);
        if !next.is_finite() {
            break;
        }
        u = next;
    }
    u
}

/// Closest endpoint/segment pair of two parallel chords, if within `tol`.
fn closest_endpoints(a: &Line, b: &Line, tol: f64) -> Option<(f64, f64)> {
    let project = |l: &Line, p: Point| -> f64 {
        let d = l.p1 - l.p0;
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            0.0
        } else {
            ((p - l.p0).dot(&d) / len2).clamp(0.0, 1.0)
        }
    };
    let candidates = [
        (0.0, project(b, a.p0)),
        (1.0, project(b, a.p1)),
        (project(a, b.p0), 0.0),
        (project(a, b.p1), 1.0),
    ];
    candidates
        .into_iter()
        .map(|(s, t)| ((a.eval(s) - b.eval(t)).norm(), s, t))
        .filter(|(d, _, _)| *d <= tol)
        .min_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, s, t)| (s, t))
}
