use super::types::Point;

/// Twice the signed area of triangle `(a, b, c)`.
/// Positive when `c` lies left of `a → b` (counterclockwise turn).
#[inline]
pub fn orient(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Gift-wrapping (Jarvis march) convex hull, counterclockwise, starting at the
/// lowest (then leftmost) point.
///
/// Near-duplicates (1e-12) are merged and points on hull edges are dropped, so
/// `convex_hull(&convex_hull(p)) == convex_hull(p)`. Fewer than three distinct
/// points are returned as-is (deduplicated).
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !(p.x.is_finite() && p.y.is_finite()) {
            continue;
        }
        if !pts.iter().any(|q| (q - p).norm() < 1e-12) {
            pts.push(*p);
        }
    }
    let n = pts.len();
    if n < 3 {
        return pts;
    }
    let mut start = 0usize;
    for (i, p) in pts.iter().enumerate().skip(1) {
        let s = pts[start];
        if p.y < s.y || (p.y == s.y && p.x < s.x) {
            start = i;
        }
    }

    let mut hull: Vec<Point> = Vec::with_capacity(n);
    let mut cur = start;
    loop {
        hull.push(pts[cur]);
        let mut next = if cur == 0 { 1 } else { 0 };
        for i in 0..n {
            if i == cur || i == next {
                continue;
            }
            let a = pts[cur];
            let to_next = pts[next] - a;
            let to_i = pts[i] - a;
            let o = orient(a, pts[next], pts[i]);
            let tol = 1e-12 * to_next.norm() * to_i.norm();
            if o < -tol {
                next = i;
            } else if o.abs() <= tol && to_i.dot(&to_next) > 0.0 && to_i.norm() > to_next.norm() {
                next = i;
            }
        }
        cur = next;
        if cur == start || hull.len() > n {
            break;
        }
    }
    hull
}

/// Vertex average (the "centroid" the bisector tracer uses to probe a sector).
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f64)
}

/// Real roots of `a t² + b t + c = 0`.
///
/// Falls back to the linear root when `a` is negligible; a discriminant within
/// rounding of zero yields the double root once.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = b.abs().max(c.abs());
    if a.abs() <= 1e-14 * scale || a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc.abs() <= 1e-14 * b * b.max(1e-300) || disc == 0.0 {
        return vec![-b / (2.0 * a)];
    }
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    // q avoids cancellation between -b and sqrt(disc)
    let q = -0.5 * (b + b.signum() * sq);
    if q == 0.0 {
        return vec![sq / (2.0 * a), -sq / (2.0 * a)];
    }
    vec![q / a, c / q]
}

/// Push `p` unless a point within `eps` (coordinate-wise) is already present.
#[inline]
pub(crate) fn push_unique(out: &mut Vec<Point>, p: Point, eps: f64) {
    if !out
        .iter()
        .any(|q| (q.x - p.x).abs() < eps && (q.y - p.y).abs() < eps)
    {
        out.push(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_roots_and_linear_fallback() {
        let mut r = solve_quadratic(1.0, -3.0, 2.0);
        r.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(r.len(), 2);
        assert!((r[0] - 1.0).abs() < 1e-12 && (r[1] - 2.0).abs() < 1e-12);
        let lin = solve_quadratic(0.0, 2.0, -1.0);
        assert_eq!(lin.len(), 1);
        assert!((lin[0] - 0.5).abs() < 1e-12);
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
        let double = solve_quadratic(1.0, -2.0, 1.0);
        assert_eq!(double.len(), 1);
        assert!((double[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hull_drops_interior_and_collinear() {
        let pts = vec![
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.5, 0.5),
            Point::new(0.0, 1.0),
        ];
        let h = convex_hull(&pts);
        assert_eq!(h.len(), 4);
        assert_eq!(h[0], Point::new(0.0, 0.0));
        assert_eq!(h[1], Point::new(1.0, 0.0));
        assert_eq!(h[2], Point::new(1.0, 1.0));
        assert_eq!(h[3], Point::new(0.0, 1.0));
    }

    #[test]
    fn hull_of_collinear_points_is_a_chord() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(1.0, 1.0),
        ];
        let h = convex_hull(&pts);
        assert_eq!(h.len(), 2);
    }
}
