//! Basic 2D types and tolerances used by every region and site operation.
//!
//! - `GeomCfg`: centralizes epsilons for equality, dedup, conic parameters and
//!   line-intersection determinants.
//! - `Point`: plain `Vector2<f64>`; equality is always eps-aware.
//! - `Segment`: ordered pair of points, doubling as the infinite line through them.
//!
//! References
//! - Code cross-refs: `region::ConvexRegion`, `util::{convex_hull, solve_quadratic}`

use nalgebra::{Matrix2, Vector2};

/// A point (or vector) in the plane.
pub type Point = Vector2<f64>;

/// Geometry configuration (tolerances).
///
/// Defaults are tuned for coordinates of order 1–1000.
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Point equality and point-on-segment distance.
    pub eps_equal: f64,
    /// Dedup of line/boundary intersection points.
    pub eps_dedup: f64,
    /// Slack on the edge parameter `t ∈ [0, 1]` for conic/edge intersections.
    pub eps_param: f64,
    /// Determinant below which two lines count as parallel.
    pub eps_det: f64,
    /// Minimum distance between consecutive bisector endpoints.
    pub eps_step: f64,
    /// Slope difference below which two segments count as parallel.
    pub eps_parallel: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_equal: 1e-9,
            eps_dedup: 1e-10,
            eps_param: 1e-10,
            eps_det: 1e-12,
            eps_step: 1e-8,
            eps_parallel: 1e-9,
        }
    }
}

/// Coordinate-wise equality within `eps`.
#[inline]
pub fn points_equal(a: Point, b: Point, eps: f64) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}

/// Ordered segment `start → end`; also the infinite line through both.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Implicit line `a x + b y + c = 0` through `start` and `end`.
    ///
    /// Interior points of a counter-clockwise polygon give a negative value for
    /// every edge, so ratios of these values are ratios of Euclidean distances.
    #[inline]
    pub fn line_coeffs(&self) -> (f64, f64, f64) {
        let (x1, y1) = (self.start.x, self.start.y);
        let (x2, y2) = (self.end.x, self.end.y);
        (y2 - y1, x1 - x2, x2 * y1 - x1 * y2)
    }

    /// Evaluate the implicit line at `p`.
    #[inline]
    pub fn line_value(&self, p: Point) -> f64 {
        let (a, b, c) = self.line_coeffs();
        a * p.x + b * p.y + c
    }

    /// Whether `p` lies on the finite segment (bounding box plus distance to the line).
    pub fn contains_point(&self, p: Point, eps: f64) -> bool {
        let lo_x = self.start.x.min(self.end.x) - eps;
        let hi_x = self.start.x.max(self.end.x) + eps;
        let lo_y = self.start.y.min(self.end.y) - eps;
        let hi_y = self.start.y.max(self.end.y) + eps;
        if p.x < lo_x || p.x > hi_x || p.y < lo_y || p.y > hi_y {
            return false;
        }
        let d = self.direction();
        let len = d.norm();
        if len <= eps {
            return points_equal(p, self.start, eps);
        }
        let cross = d.x * (p.y - self.start.y) - d.y * (p.x - self.start.x);
        (cross / len).abs() < eps
    }

    /// Euclidean distance from `p` to the finite segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        let d = self.direction();
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return (p - self.start).norm();
        }
        let t = ((p - self.start).dot(&d) / len2).clamp(0.0, 1.0);
        (p - (self.start + d * t)).norm()
    }

    /// Intersection of the two infinite lines; `None` when parallel.
    pub fn line_intersection(&self, other: &Segment, eps_det: f64) -> Option<Point> {
        let d1 = self.direction();
        let d2 = other.direction();
        // start + u d1 = other.start + v d2
        let m = Matrix2::new(d1.x, -d2.x, d1.y, -d2.y);
        let det = m.determinant();
        let scale = d1.norm() * d2.norm();
        if scale == 0.0 || det.abs() <= eps_det * scale {
            return None;
        }
        let rhs = other.start - self.start;
        let u = (rhs.x * (-d2.y) + d2.x * rhs.y) / det;
        Some(self.start + d1 * u)
    }

    /// Intersection of the two finite segments (both must contain the point).
    pub fn segment_intersection(&self, other: &Segment, cfg: &GeomCfg) -> Option<Point> {
        let p = self.line_intersection(other, cfg.eps_det)?;
        if self.contains_point(p, cfg.eps_equal) && other.contains_point(p, cfg.eps_equal) {
            Some(p)
        } else {
            None
        }
    }

    /// Parallel test on the sine of the angle between the two directions.
    pub fn is_parallel(&self, other: &Segment, eps: f64) -> bool {
        let d1 = self.direction();
        let d2 = other.direction();
        let scale = d1.norm() * d2.norm();
        if scale == 0.0 {
            return false;
        }
        ((d1.x * d2.y - d1.y * d2.x) / scale).abs() < eps
    }
}
