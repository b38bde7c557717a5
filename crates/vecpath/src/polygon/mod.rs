//! Polygon queries: containment, distance, bounds, area, boolean operations.
//!
//! Conventions
//! - A `Polygon` is an ordered vertex list, implicitly closed (last → first).
//! - `is_inside` uses the even-odd rule. Non-zero winding is not used.
//! - Boolean operations live in `boolean` (Greiner–Hormann).

mod boolean;

use crate::geom::{cross, point_segment_distance, Point, Rect};

pub use boolean::BooleanOp;

/// Closed polygon given by its vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    #[inline]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges `(p[i], p[i+1])` including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Even-odd containment along a ray towards +x.
    ///
    /// Vertices lying exactly on the ray's line are handled as runs: the walk
    /// starts at a vertex off that line; when the boundary enters the line, the
    /// y of the last vertex off the line is saved (`y_save`); when it leaves, the
    /// run counts as one crossing only if the boundary continues on the opposite
    /// side and the run lies to the right of `p`. Touching runs count zero times.
    ///
    /// Boundary points: left edges read as inside, right edges and the bottom
    /// vertices of a square as outside (`(0,0)` of the unit-10 square is outside).
    pub fn is_inside(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let Some(start) = self.points.iter().position(|v| v.y != p.y) else {
            return false;
        };

        let mut inside = false;
        let mut y_save = self.points[start].y;
        let mut run_x = f64::NEG_INFINITY;
        let mut on_line = false;
        for k in 0..n {
            let a = self.points[(start + k) % n];
            let b = self.points[(start + k + 1) % n];
            let b_on = b.y == p.y;
            if !on_line && !b_on {
                // ordinary edge: both ends off the ray line
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                    if x > p.x {
                        inside = !inside;
                    }
                }
            } else if !on_line && b_on {
                // entering the line
                on_line = true;
                y_save = a.y;
                run_x = b.x;
            } else if on_line && b_on {
                run_x = run_x.min(b.x);
            } else {
                // leaving the line at `a`
                on_line = false;
                let crossed = (b.y > p.y) != (y_save > p.y);
                if crossed && run_x.min(a.x) > p.x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Minimum distance from `p` to the polygon outline, `None` when empty.
    pub fn distance(&self, p: Point) -> Option<f64> {
        match self.points.len() {
            0 => None,
            1 => Some((p - self.points[0]).norm()),
            _ => self
                .edges()
                .map(|(a, b)| point_segment_distance(p, a, b))
                .min_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal)),
        }
    }

    /// Vertex bounds, `None` when empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::bounding(&self.points)
    }

    /// Shoelace area, positive for counterclockwise order.
    pub fn signed_area(&self) -> f64 {
        0.5 * self.edges().map(|(a, b)| cross(a, b)).sum::<f64>()
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn reversed(&self) -> Polygon {
        let mut pts = self.points.clone();
        pts.reverse();
        Polygon::new(pts)
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Polygon::new(points)
    }
}
