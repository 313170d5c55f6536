//! Hilbert distance and points at prescribed distance along a chord.
//!
//! For `p ≠ q` inside Ω let the line `pq` meet ∂Ω in `i_p` (beyond `p`) and `i_q`
//! (beyond `q`). Then
//!
//! `d(p, q) = ½ · ln( |p i_q| · |q i_p| / (|q i_q| · |p i_p|) )`.
//!
//! The pairing of boundary points to sites is chosen by minimizing
//! `|i_p p| + |i_q q|` over the two assignments.

use crate::error::{HilbertError, HilbertResult};
use crate::geom2::{points_equal, ConvexRegion, GeomCfg, Point, Segment};

/// Boundary points of the chord through `p` and `q`, ordered `(i_p, i_q)`.
///
/// With more than two crossings (numerical duplicates near vertices) the
/// farthest-apart pair is used.
pub fn chord_endpoints(
    p: Point,
    q: Point,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
) -> HilbertResult<(Point, Point)> {
    let hits = omega.intersect_with_line(&Segment::new(p, q), cfg);
    if hits.len() < 2 {
        return Err(HilbertError::TangentLine);
    }
    let (mut i1, mut i2) = (hits[0], hits[1]);
    if hits.len() > 2 {
        let mut best = -1.0;
        for (k, a) in hits.iter().enumerate() {
            for b in &hits[k + 1..] {
                let d = (a - b).norm();
                if d > best {
                    best = d;
                    i1 = *a;
                    i2 = *b;
                }
            }
        }
    }
    if (i1 - p).norm() + (i2 - q).norm() < (i2 - p).norm() + (i1 - q).norm() {
        Ok((i1, i2))
    } else {
        Ok((i2, i1))
    }
}

/// Hilbert distance between two interior points.
///
/// Errors: `TangentLine` if the chord does not cross Ω twice, `NotInterior` if a
/// point coincides with a boundary crossing.
pub fn hilbert_distance(
    p: Point,
    q: Point,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
) -> HilbertResult<f64> {
    if points_equal(p, q, cfg.eps_equal) {
        return Ok(0.0);
    }
    let (ip, iq) = chord_endpoints(p, q, omega, cfg)?;
    let den = (q - iq).norm() * (p - ip).norm();
    if den == 0.0 {
        return Err(HilbertError::NotInterior);
    }
    let d = 0.5 * ((p - iq).norm() * (q - ip).norm() / den).ln();
    if d.is_finite() {
        Ok(d.max(0.0))
    } else {
        Err(HilbertError::NotInterior)
    }
}

/// For collinear `a, c, d` (boundary, center, boundary), the point between `a`
/// and `c` at Hilbert distance `r` from `c`:
/// `a + (d − a) / (1 + |cd|/|ac| · e^{2r})`.
#[inline]
pub fn point_on_spoke(a: Point, c: Point, d: Point, r: f64) -> Point {
    let scalar = 1.0 / (1.0 + ((d - c).norm() / (c - a).norm()) * (2.0 * r).exp());
    a + (d - a) * scalar
}

/// The point of segment `pq` at Hilbert distance `d(p, q) / 2` from both ends.
pub fn hilbert_midpoint(
    p: Point,
    q: Point,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
) -> HilbertResult<Point> {
    if points_equal(p, q, cfg.eps_equal) {
        return Ok(p);
    }
    let r = hilbert_distance(p, q, omega, cfg)?;
    let (ip, iq) = chord_endpoints(p, q, omega, cfg)?;
    Ok(point_on_spoke(ip, q, iq, r / 2.0))
}
