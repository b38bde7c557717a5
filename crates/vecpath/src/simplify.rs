//! Polyline simplification (Ramer–Douglas–Peucker).
//!
//! - The deviation metric is the perpendicular distance to the chord between the
//!   range endpoints; a zero-length chord measures plain distance to its start.
//! - A range is split at the first point of maximum deviation when that
//!   deviation exceeds `epsilon`, otherwise it collapses to its endpoints.
//! - The divide step runs on an explicit work stack, so input size never turns
//!   into call-stack depth.
//!
//! The result always contains the first and the last input point.

use crate::error::{check_points, check_tolerance, GeomError, Result};
use crate::geom::{perpendicular_distance, Point};

/// Simplify `points` with tolerance `epsilon`.
///
/// Errors: fewer than 2 points, non-finite coordinates, or an invalid `epsilon`.
pub fn simplify_polyline(points: &[Point], epsilon: f64) -> Result<Vec<Point>> {
    let keep = rdp_indices(points, epsilon)?;
    Ok(keep.into_iter().map(|i| points[i]).collect())
}

/// Indices of the points kept by RDP, ascending, always `0` and `len - 1`.
pub fn rdp_indices(points: &[Point], epsilon: f64) -> Result<Vec<usize>> {
    check_points(points, 2)?;
    check_tolerance(epsilon)?;
    let last = points.len() - 1;
    let mut mask = vec![false; points.len()];
    mask[0] = true;
    mask[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (points[start], points[end]);
        let mut max_idx = start;
        let mut max_dist = -1.0;
        for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = perpendicular_distance(*p, a, b);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > epsilon {
            mask[max_idx] = true;
            stack.push((max_idx, end));
            stack.push((start, max_idx));
        }
    }

    let keep: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect();
    if keep.len() < 2 || keep.first() != Some(&0) || keep.last() != Some(&last) {
        return Err(GeomError::Internal(format!(
            "RDP kept {} of {} points without both endpoints",
            keep.len(),
            points.len()
        )));
    }
    Ok(keep)
}
