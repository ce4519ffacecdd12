//! Convex hull and fan triangulation over indexed point sets.
//!
//! Purpose
//! - Deterministic triangulation policy: Andrew's monotone chain over the
//!   point indices, then a fan from the hull's first vertex.
//!
//! Conventions
//! - `cross(o, a, b)` is the single orientation primitive; positive means
//!   `b` lies strictly left of the directed line `o → a` (CCW turn). Both the
//!   colinearity test and the chain build key off this sign.
//! - Chains pop on `cross <= 0`, so only strictly convex corners survive:
//!   collinear boundary points are folded out of the hull. They still appear
//!   in the encoded vertex block, just never in a triangle.
//! - Interior points are likewise excluded from the output triangles; the
//!   algorithm only guarantees coverage on convex inputs.
//!
//! Determinism: for a fixed input order the triangle list is identical across
//! runs and platforms, so fixtures can be compared exactly.

use std::collections::HashMap;
use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Point, Triangle};

/// Triangulation precondition failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriangulateError {
    /// Two points in the set are exactly equal, which makes hull orientation
    /// ambiguous. Indices are in input order.
    #[error("points {first} and {second} are exactly equal; triangulation is ambiguous")]
    DuplicatePoints { first: usize, second: usize },
}

/// Triangulate a point set: convex hull, then a fan from the hull's first
/// vertex (lowest `(x, y)` in lexicographic order).
///
/// Degenerate inputs (fewer than 3 points, or all points exactly colinear)
/// yield an empty triangle list, not an error. Exact duplicates are rejected
/// before any geometric computation.
pub fn triangulate(points: &[Point]) -> Result<Vec<Triangle>, TriangulateError> {
    reject_duplicates(points)?;
    if points.len() < 3 || all_colinear(points) {
        return Ok(Vec::new());
    }
    let hull = convex_hull_indices(points);
    if hull.len() < 3 {
        return Ok(Vec::new());
    }
    let h0 = hull[0];
    Ok(hull[1..]
        .windows(2)
        .map(|w| Triangle::new(h0, w[0], w[1]))
        .collect())
}

fn reject_duplicates(points: &[Point]) -> Result<(), TriangulateError> {
    let mut seen: HashMap<(u32, u32), usize> = HashMap::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if let Some(&first) = seen.get(&coord_key(p)) {
            return Err(TriangulateError::DuplicatePoints { first, second: i });
        }
        seen.insert(coord_key(p), i);
    }
    Ok(())
}

/// Bit key for exact coordinate equality; folds `-0.0` into `+0.0` so the
/// key agrees with value equality.
#[inline]
fn coord_key(p: &Point) -> (u32, u32) {
    let fold = |v: f32| if v == 0.0 { 0u32 } else { v.to_bits() };
    (fold(p.x), fold(p.y))
}

/// All points on one line through the fixed reference pair `(p0, p1)`?
///
/// Exact zero test on the f64-widened cross product; near-colinear inputs
/// with a nonzero cross are not degenerate and go through the hull build.
fn all_colinear(points: &[Point]) -> bool {
    // Duplicates were rejected, so points[0] and points[1] are distinct.
    let o = points[0];
    let a = points[1];
    points[2..].iter().all(|&b| cross(o, a, b) == 0.0)
}

/// Signed cross product of `(o → a, o → b)`, widened to f64.
#[inline]
fn cross(o: Point, a: Point, b: Point) -> f64 {
    let (ox, oy) = (f64::from(o.x), f64::from(o.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));
    (ax - ox) * (by - oy) - (ay - oy) * (bx - ox)
}

/// Andrew's monotone chain over indices: CCW hull of strictly convex corners,
/// starting from the lexicographically smallest point.
fn convex_hull_indices(points: &[Point]) -> Vec<u32> {
    let mut order: Vec<u32> = (0..points.len() as u32).collect();
    order.sort_by(|&i, &j| {
        let (p, q) = (points[i as usize], points[j as usize]);
        match p.x.partial_cmp(&q.x).unwrap_or(std::cmp::Ordering::Equal) {
            std::cmp::Ordering::Equal => {
                p.y.partial_cmp(&q.y).unwrap_or(std::cmp::Ordering::Equal)
            }
            o => o,
        }
    });

    let mut lower: Vec<u32> = Vec::with_capacity(order.len());
    for &i in &order {
        while lower.len() >= 2
            && cross(
                points[lower[lower.len() - 2] as usize],
                points[lower[lower.len() - 1] as usize],
                points[i as usize],
            ) <= 0.0
        {
            lower.pop();
        }
        lower.push(i);
    }
    let mut upper: Vec<u32> = Vec::with_capacity(order.len());
    for &i in order.iter().rev() {
        while upper.len() >= 2
            && cross(
                points[upper[upper.len() - 2] as usize],
                points[upper[upper.len() - 1] as usize],
                points[i as usize],
            ) <= 0.0
        {
            upper.pop();
        }
        upper.push(i);
    }

    // Each chain ends on the other's first point; drop both to avoid
    // duplicating the shared endpoints.
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);

    // Collinear runs at the chain seams can still repeat an index; keep the
    // first occurrence only.
    let mut seen: HashSet<u32> = HashSet::with_capacity(hull.len());
    hull.retain(|&i| seen.insert(i));
    hull
}
