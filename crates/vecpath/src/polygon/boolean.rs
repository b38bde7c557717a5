//! Boolean operations on simple polygons (Greiner–Hormann clipping).
//!
//! Model
//! - Both operands are simple polygons (no self-intersections), any orientation.
//! - Edge/edge intersections are inserted into both vertex lists, flagged as
//!   entry/exit with the even-odd containment test, and the result contours are
//!   traced by alternating between the lists.
//! - Intersections at a vertex and overlapping collinear edges are degenerate for
//!   Greiner–Hormann; the clip operand is nudged by a small translation and the
//!   operation retried. After `MAX_NUDGES` attempts the call fails with
//!   `GeomError::Degenerate`.
//! - Result contours take the subject's orientation. A contour lying inside an
//!   odd number of the other contours is a hole and takes the opposite one.
//! - XOR is `(A − B) ∪ (B − A)` returned as separate contours.

use crate::error::{check_points, GeomError, Result};
use crate::geom::{perpendicular_distance, GeomCfg, Line, Point, Rect};
use crate::intersect::line_params;

use super::Polygon;

const MAX_NUDGES: u32 = 3;

/// Which boolean combination of two polygons to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BooleanOp {
    Intersection,
    Union,
    Difference,
    Xor,
}

impl Polygon {
    /// Combine `self` with `other`.
    ///
    /// Errors: operands with fewer than 3 distinct vertices or non-finite
    /// coordinates; `Degenerate` when nudging cannot separate touching vertices.
    pub fn boolean(&self, other: &Polygon, op: BooleanOp, cfg: GeomCfg) -> Result<Vec<Polygon>> {
        let a = cleaned(self);
        let b = cleaned(other);
        check_points(&a.points, 3)?;
        check_points(&b.points, 3)?;
        let clockwise = a.is_clockwise();
        let tol = cfg.eps_merge * extent(&a, &b);
        match op {
            BooleanOp::Xor => {
                let mut out = oriented(clip_with_nudges(&a, &b, BooleanOp::Difference, cfg)?, clockwise, tol);
                out.extend(oriented(clip_with_nudges(&b, &a, BooleanOp::Difference, cfg)?, clockwise, tol));
                Ok(out)
            }
            _ => Ok(oriented(clip_with_nudges(&a, &b, op, cfg)?, clockwise, tol)),
        }
    }
}

/// Larger side of the operands' joint bounds, at least 1.
fn extent(s: &Polygon, c: &Polygon) -> f64 {
    match (s.bounding_box(), c.bounding_box()) {
        (Some(a), Some(b)) => {
            let u = a.union(&b);
            u.size.width.max(u.size.height).max(1.0)
        }
        _ => 1.0,
    }
}

/// Orient outer contours as `clockwise` says and holes the other way.
fn oriented(contours: Vec<Polygon>, clockwise: bool, tol: f64) -> Vec<Polygon> {
    let depth: Vec<usize> = contours
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            contours
                .iter()
                .enumerate()
                .filter(|&(j, outer)| j != i && encloses(outer, inner, tol))
                .count()
        })
        .collect();
    contours
        .into_iter()
        .zip(depth)
        .map(|(c, d)| {
            if c.is_clockwise() == (clockwise ^ (d % 2 == 1)) {
                c
            } else {
                c.reversed()
            }
        })
        .collect()
}

/// `inner` lies inside `outer`, judged at its first vertex clear of `outer`'s outline.
fn encloses(outer: &Polygon, inner: &Polygon, tol: f64) -> bool {
    inner
        .points
        .iter()
        .find(|p| outer.distance(**p).is_some_and(|d| d > tol))
        .is_some_and(|p| outer.is_inside(*p))
}

/// Drop repeated consecutive vertices (including a repeated closing vertex).
fn cleaned(p: &Polygon) -> Polygon {
    let mut pts: Vec<Point> = Vec::with_capacity(p.points.len());
    for q in &p.points {
        if pts.last() != Some(q) {
            pts.push(*q);
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    Polygon::new(pts)
}

#[derive(Debug)]
enum Clip {
    Done(Vec<Polygon>),
    Degenerate(&'static str),
}

fn clip_with_nudges(s: &Polygon, c: &Polygon, op: BooleanOp, cfg: GeomCfg) -> Result<Vec<Polygon>> {
    let scale = extent(s, c);
    let mut clip = c.clone();
    let mut reason = "";
    for attempt in 0..=MAX_NUDGES {
        match greiner_hormann(s, &clip, op, cfg, scale)? {
            Clip::Done(out) => return Ok(out),
            Clip::Degenerate(why) => {
                reason = why;
                if attempt == MAX_NUDGES {
                    break;
                }
                let angle = 0.4 + 1.1 * attempt as f64;
                let step = 10.0 * cfg.eps_merge * scale * (attempt + 1) as f64;
                let delta = Point::new(angle.cos(), angle.sin()) * step;
                tracing::debug!(attempt, why, step, "boolean: nudging clip polygon");
                clip = Polygon::new(c.points.iter().map(|p| p + delta).collect());
            }
        }
    }
    Err(GeomError::Degenerate(if reason.is_empty() {
        "boolean operands stay degenerate"
    } else {
        reason
    }))
}

#[derive(Clone, Copy, Debug)]
struct Hit {
    s_edge: usize,
    s_alpha: f64,
    c_edge: usize,
    c_alpha: f64,
    p: Point,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    p: Point,
    next: usize,
    prev: usize,
    neighbor: Option<usize>,
    entry: bool,
    visited: bool,
}

fn find_hits(s: &Polygon, c: &Polygon, cfg: GeomCfg, scale: f64) -> std::result::Result<Vec<Hit>, &'static str> {
    let e = cfg.eps_param;
    let mut hits = Vec::new();
    for (si, (a0, a1)) in s.edges().enumerate() {
        let la = Line::new(a0, a1);
        for (ci, (b0, b1)) in c.edges().enumerate() {
            let lb = Line::new(b0, b1);
            if !crate::overlap::intersects(&la, &lb) {
                continue;
            }
            match line_params(&la, &lb, cfg.eps_det) {
                Some((sa, ca)) => {
                    if sa < -e || sa > 1.0 + e || ca < -e || ca > 1.0 + e {
                        continue;
                    }
                    if sa <= e || sa >= 1.0 - e || ca <= e || ca >= 1.0 - e {
                        return Err("intersection at a vertex");
                    }
                    hits.push(Hit {
                        s_edge: si,
                        s_alpha: sa,
                        c_edge: ci,
                        c_alpha: ca,
                        p: la.eval(sa),
                    });
                }
                None => {
                    if collinear_overlap(&la, &lb, cfg.eps_param * scale) {
                        return Err("overlapping collinear edges");
                    }
                }
            }
        }
    }
    Ok(hits)
}

fn collinear_overlap(a: &Line, b: &Line, tol: f64) -> bool {
    if perpendicular_distance(b.p0, a.p0, a.p1) > tol || perpendicular_distance(b.p1, a.p0, a.p1) > tol {
        return false;
    }
    Rect::from_points(a.p0, a.p1)
        .inflate(tol)
        .contains(b.p0)
        || Rect::from_points(a.p0, a.p1).inflate(tol).contains(b.p1)
        || Rect::from_points(b.p0, b.p1).inflate(tol).contains(a.p0)
}

/// Vertex list with intersections inserted in edge order; returns node index per hit.
fn build_list(poly: &Polygon, hits: &[Hit], subject: bool) -> (Vec<Node>, Vec<usize>) {
    let mut nodes: Vec<Node> = Vec::with_capacity(poly.len() + hits.len());
    let mut at = vec![0usize; hits.len()];
    let mut per_edge: Vec<Vec<(f64, usize)>> = vec![Vec::new(); poly.len()];
    for (k, h) in hits.iter().enumerate() {
        if subject {
            per_edge[h.s_edge].push((h.s_alpha, k));
        } else {
            per_edge[h.c_edge].push((h.c_alpha, k));
        }
    }
    let vertex = |p: Point| Node {
        p,
        next: 0,
        prev: 0,
        neighbor: None,
        entry: false,
        visited: false,
    };
    for (i, list) in per_edge.iter_mut().enumerate() {
        nodes.push(vertex(poly.points[i]));
        list.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));
        for &(_, k) in list.iter() {
            at[k] = nodes.len();
            nodes.push(vertex(hits[k].p));
        }
    }
    let n = nodes.len();
    for (i, node) in nodes.iter_mut().enumerate() {
        node.next = (i + 1) % n;
        node.prev = (i + n - 1) % n;
    }
    (nodes, at)
}

/// Flag intersections alternately as entry/exit along the list.
fn mark_entries(nodes: &mut [Node], first_is_entry: bool) {
    let mut entry = first_is_entry;
    for node in nodes.iter_mut() {
        if node.neighbor.is_some() {
            node.entry = entry;
            entry = !entry;
        }
    }
}

fn greiner_hormann(s: &Polygon, c: &Polygon, op: BooleanOp, cfg: GeomCfg, scale: f64) -> Result<Clip> {
    let hits = match find_hits(s, c, cfg, scale) {
        Ok(h) => h,
        Err(why) => return Ok(Clip::Degenerate(why)),
    };
    if hits.is_empty() {
        return Ok(Clip::Done(disjoint_or_nested(s, c, op)));
    }

    let (mut s_nodes, s_at) = build_list(s, &hits, true);
    let (mut c_nodes, c_at) = build_list(c, &hits, false);
    for k in 0..hits.len() {
        s_nodes[s_at[k]].neighbor = Some(c_at[k]);
        c_nodes[c_at[k]].neighbor = Some(s_at[k]);
    }
    let (flip_s, flip_c) = match op {
        BooleanOp::Intersection => (false, false),
        BooleanOp::Union => (true, true),
        BooleanOp::Difference => (true, false),
        BooleanOp::Xor => return Err(GeomError::Internal("xor reached the clipper".into())),
    };
    mark_entries(&mut s_nodes, !c.is_inside(s.points[0]) ^ flip_s);
    mark_entries(&mut c_nodes, !s.is_inside(c.points[0]) ^ flip_c);

    let mut lists = [s_nodes, c_nodes];
    let budget = 2 * (lists[0].len() + lists[1].len());
    let mut out = Vec::new();
    while let Some(start) = (0..lists[0].len()).find(|&i| lists[0][i].neighbor.is_some() && !lists[0][i].visited) {
        let mut side = 0usize;
        let mut cur = start;
        let mut pts = vec![lists[0][start].p];
        let mut steps = 0usize;
        loop {
            let Some(nb) = lists[side][cur].neighbor else {
                return Err(GeomError::Internal("traversal left an intersection node".into()));
            };
            lists[side][cur].visited = true;
            lists[1 - side][nb].visited = true;
            let forward = lists[side][cur].entry;
            loop {
                cur = if forward {
                    lists[side][cur].next
                } else {
                    lists[side][cur].prev
                };
                pts.push(lists[side][cur].p);
                steps += 1;
                if steps > budget {
                    return Err(GeomError::Internal("boolean traversal did not close".into()));
                }
                if lists[side][cur].neighbor.is_some() {
                    break;
                }
            }
            let Some(nb) = lists[side][cur].neighbor else {
                return Err(GeomError::Internal("traversal stopped off an intersection".into()));
            };
            side = 1 - side;
            cur = nb;
            if lists[side][cur].visited {
                break;
            }
        }
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() >= 3 {
            out.push(Polygon::new(pts));
        }
    }
    Ok(Clip::Done(out))
}

/// Operands whose outlines do not cross.
fn disjoint_or_nested(s: &Polygon, c: &Polygon, op: BooleanOp) -> Vec<Polygon> {
    let s_in_c = c.is_inside(s.points[0]);
    let c_in_s = s.is_inside(c.points[0]);
    match op {
        BooleanOp::Intersection if s_in_c => vec![s.clone()],
        BooleanOp::Intersection if c_in_s => vec![c.clone()],
        BooleanOp::Intersection => Vec::new(),
        BooleanOp::Union if s_in_c => vec![c.clone()],
        BooleanOp::Union if c_in_s => vec![s.clone()],
        BooleanOp::Union => vec![s.clone(), c.clone()],
        BooleanOp::Difference if s_in_c => Vec::new(),
        BooleanOp::Difference if c_in_s => vec![s.clone(), c.clone()],
        BooleanOp::Difference => vec![s.clone()],
        BooleanOp::Xor if s_in_c => vec![c.clone(), s.clone()],
        BooleanOp::Xor if c_in_s => vec![s.clone(), c.clone()],
        BooleanOp::Xor => vec![s.clone(), c.clone()],
    }
}
