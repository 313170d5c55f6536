//! General conics `A x² + B xy + C y² + D x + E y + F = 0`.
//!
//! Bisector pieces are arcs of such conics. Given a site pair `(s, t)` and the four
//! boundary edges their rays hit (`E1` behind `s`, `E2` beyond the probe point for
//! `s`, `E3` behind `t`, `E4` beyond for `t`), the equidistance condition
//! `d(p, s) = d(p, t)` becomes
//!
//! `E2(p) E3(p) − k E1(p) E4(p) = 0`, with `k = E2(s) E3(t) / (E4(t) E1(s))`,
//!
//! where `Ei(p)` is the implicit line value of edge `i` (proportional to the signed
//! distance). Distances along a chord are proportional to these values, which is
//! all the Hilbert cross-ratio needs.
//!
//! References
//! - Bisector formula: arXiv:2112.03056 (Voronoi diagrams in the Hilbert metric)

use super::types::{Point, Segment};
use super::util::solve_quadratic;
use crate::error::{HilbertError, HilbertResult};
use nalgebra::Matrix3;

/// Coefficients `(A, B, C, D, E, F)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConicEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

/// Classification by the discriminant `B² − 4AC`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConicKind {
    Ellipse,
    Parabola,
    Hyperbola,
    /// No quadratic terms at all (`A = C = 0`, and `B = 0`).
    Degenerate,
}

/// Center, semi-axes and rotation of an ellipse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseParams {
    pub center: Point,
    pub semi_a: f64,
    pub semi_b: f64,
    pub rotation: f64,
}

impl ConicEquation {
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Equidistance conic of sites `s`, `t` for the subtending edges `e1..e4`.
    ///
    /// Product form `b(p) c(p) − k a(p) d(p)` with `a = e1`, `b = e2`, `c = e3`,
    /// `d = e4`.
    pub fn bisector(
        s: Point,
        t: Point,
        e1: &Segment,
        e2: &Segment,
        e3: &Segment,
        e4: &Segment,
    ) -> Self {
        let (a1, a2, a3) = e1.line_coeffs();
        let (b1, b2, b3) = e2.line_coeffs();
        let (c1, c2, c3) = e3.line_coeffs();
        let (d1, d2, d3) = e4.line_coeffs();
        let k = (e2.line_value(s) * e3.line_value(t)) / (e4.line_value(t) * e1.line_value(s));
        Self {
            a: b1 * c1 - a1 * d1 * k,
            b: b2 * c1 + b1 * c2 - a1 * d2 * k - a2 * d1 * k,
            c: b2 * c2 - a2 * d2 * k,
            d: b3 * c1 + b1 * c3 - a3 * d1 * k - a1 * d3 * k,
            e: b3 * c2 + b2 * c3 - a2 * d3 * k - a3 * d2 * k,
            f: b3 * c3 - a3 * d3 * k,
        }
    }

    #[inline]
    pub fn eval(&self, p: Point) -> f64 {
        let (x, y) = (p.x, p.y);
        self.a * x * x + self.b * x * y + self.c * y * y + self.d * x + self.e * y + self.f
    }

    /// `∇` of the quadratic form at `p`.
    #[inline]
    pub fn gradient(&self, p: Point) -> Point {
        Point::new(
            2.0 * self.a * p.x + self.b * p.y + self.d,
            self.b * p.x + 2.0 * self.c * p.y + self.e,
        )
    }

    #[inline]
    pub fn discriminant(&self) -> f64 {
        self.b * self.b - 4.0 * self.a * self.c
    }

    pub fn classify(&self) -> ConicKind {
        let scale = self.a.abs().max(self.b.abs()).max(self.c.abs());
        if scale == 0.0 || (self.a == 0.0 && self.c == 0.0 && self.b == 0.0) {
            return ConicKind::Degenerate;
        }
        let disc = self.discriminant();
        if disc.abs() <= 1e-12 * scale * scale {
            ConicKind::Parabola
        } else if disc < 0.0 {
            ConicKind::Ellipse
        } else {
            ConicKind::Hyperbola
        }
    }

    /// Same conic in local coordinates `p = origin + scale·u`.
    pub fn localized(&self, origin: Point, scale: f64) -> Self {
        let (x0, y0) = (origin.x, origin.y);
        let s2 = scale * scale;
        Self {
            a: self.a * s2,
            b: self.b * s2,
            c: self.c * s2,
            d: scale * (2.0 * self.a * x0 + self.b * y0 + self.d),
            e: scale * (self.b * x0 + 2.0 * self.c * y0 + self.e),
            f: self.eval(origin),
        }
    }

    /// Whether the conic splits into two lines (or one), judged in local
    /// coordinates around `origin` at length `scale`.
    pub fn is_line_pair_near(&self, origin: Point, scale: f64) -> bool {
        let q = self.localized(origin, scale);
        let m = Matrix3::new(
            q.a,
            0.5 * q.b,
            0.5 * q.d,
            0.5 * q.b,
            q.c,
            0.5 * q.e,
            0.5 * q.d,
            0.5 * q.e,
            q.f,
        );
        let norm = [q.a, q.b, q.c, q.d, q.e, q.f]
            .iter()
            .fold(0.0f64, |acc, x| acc.max(x.abs()));
        if norm == 0.0 {
            return true;
        }
        (m.determinant() / (norm * norm * norm)).abs() < 1e-9
    }

    /// Parameters `s` with `eval(origin + s·dir) = 0`.
    pub fn line_params(&self, origin: Point, dir: Point) -> Vec<f64> {
        let (x1, y1) = (origin.x, origin.y);
        let (al, be) = (dir.x, dir.y);
        let qa = self.a * al * al + self.b * al * be + self.c * be * be;
        let qb = al * (2.0 * self.a * x1 + self.b * y1 + self.d)
            + be * (self.b * x1 + 2.0 * self.c * y1 + self.e);
        solve_quadratic(qa, qb, self.eval(origin))
    }

    /// Whether the whole segment lies on the conic, i.e. its line is a component
    /// of a degenerate conic. Judged relative to the conic's size at the
    /// segment's scale.
    pub fn vanishes_on(&self, seg: &Segment, tol: f64) -> bool {
        let len = seg.length();
        if len == 0.0 {
            return false;
        }
        let q = self.localized(seg.start, len);
        let norm = [q.a, q.b, q.c, q.d, q.e, q.f]
            .iter()
            .fold(0.0f64, |acc, x| acc.max(x.abs()));
        if norm == 0.0 {
            return true;
        }
        let u = seg.direction() / len;
        let quad = q.a * u.x * u.x + q.b * u.x * u.y + q.c * u.y * u.y;
        let lin = q.d * u.x + q.e * u.y;
        quad.abs().max(lin.abs()).max(q.f.abs()) <= tol * norm
    }

    /// Roots `y` at a fixed `x`.
    pub fn roots_at_x(&self, x: f64) -> Vec<f64> {
        solve_quadratic(
            self.c,
            self.b * x + self.e,
            self.a * x * x + self.d * x + self.f,
        )
    }

    /// Center of a central conic (intersection point for a crossing line pair).
    ///
    /// `h = (2CD − BE)/(B² − 4AC)`, `k = (2AE − BD)/(B² − 4AC)`. Parabolas and
    /// parallel line pairs have no center.
    pub fn center(&self) -> HilbertResult<Point> {
        let den = self.discriminant();
        let scale = self.a.abs().max(self.b.abs()).max(self.c.abs());
        if !(den.abs() > 1e-10 * scale * scale) {
            return Err(HilbertError::NoConicCenter);
        }
        let h = (2.0 * self.c * self.d - self.b * self.e) / den;
        let k = (2.0 * self.a * self.e - self.b * self.d) / den;
        if h.is_finite() && k.is_finite() {
            Ok(Point::new(h, k))
        } else {
            Err(HilbertError::NoConicCenter)
        }
    }

    /// Axis-aligned form of an ellipse; `None` for other kinds.
    pub fn ellipse_params(&self) -> Option<EllipseParams> {
        if self.classify() != ConicKind::Ellipse {
            return None;
        }
        let theta = 0.5 * self.b.atan2(self.a - self.c);
        let (s, c) = theta.sin_cos();
        let ap = self.a * c * c + self.b * c * s + self.c * s * s;
        let cp = self.a * s * s - self.b * c * s + self.c * c * c;
        let dp = self.d * c + self.e * s;
        let ep = -self.d * s + self.e * c;
        let x0 = -dp / (2.0 * ap);
        let y0 = -ep / (2.0 * cp);
        let common = -4.0 * self.f * ap * cp + cp * dp * dp + ap * ep * ep;
        let a2 = common / (4.0 * ap * ap * cp);
        let b2 = common / (4.0 * ap * cp * cp);
        Some(EllipseParams {
            center: Point::new(x0 * c - y0 * s, x0 * s + y0 * c),
            semi_a: a2.abs().sqrt(),
            semi_b: b2.abs().sqrt(),
            rotation: theta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_circle_is_an_ellipse_at_origin() {
        let circle = ConicEquation::new(1.0, 0.0, 1.0, 0.0, 0.0, -1.0);
        assert_eq!(circle.classify(), ConicKind::Ellipse);
        let p = circle.ellipse_params().unwrap();
        assert!(p.center.norm() < 1e-12);
        assert!((p.semi_a - 1.0).abs() < 1e-12 && (p.semi_b - 1.0).abs() < 1e-12);
        assert!(circle.eval(Point::new(0.6, 0.8)).abs() < 1e-12);
    }

    #[test]
    fn shifted_ellipse_params() {
        // ((x-2)/3)^2 + ((y+1)/2)^2 = 1  →  4x² + 9y² - 16x + 18y - 11 = 0
        let eq = ConicEquation::new(4.0, 0.0, 9.0, -16.0, 18.0, -11.0);
        let p = eq.ellipse_params().unwrap();
        assert!((p.center - Point::new(2.0, -1.0)).norm() < 1e-9);
        let (big, small) = (p.semi_a.max(p.semi_b), p.semi_a.min(p.semi_b));
        assert!((big - 3.0).abs() < 1e-9 && (small - 2.0).abs() < 1e-9);
    }

    #[test]
    fn hyperbola_center_and_parallel_pair() {
        // (x-1)(y-2) = 1  →  xy - 2x - y + 1 = 0
        let h = ConicEquation::new(0.0, 1.0, 0.0, -2.0, -1.0, 1.0);
        assert_eq!(h.classify(), ConicKind::Hyperbola);
        let c = h.center().unwrap();
        assert!((c - Point::new(1.0, 2.0)).norm() < 1e-12);
        // x² - 1 = 0: two parallel lines, no center
        let pair = ConicEquation::new(1.0, 0.0, 0.0, 0.0, 0.0, -1.0);
        assert_eq!(pair.classify(), ConicKind::Parabola);
        assert!(matches!(pair.center(), Err(HilbertError::NoConicCenter)));
    }

    #[test]
    fn line_pair_detection_is_scale_free() {
        // (x-1)(y-2) = 0
        let pair = ConicEquation::new(0.0, 1.0, 0.0, -2.0, -1.0, 2.0);
        assert!(pair.is_line_pair_near(Point::new(1.5, 2.5), 1.0));
        let hyp = ConicEquation::new(0.0, 1.0, 0.0, -2.0, -1.0, 1.0);
        assert!(!hyp.is_line_pair_near(Point::new(1.5, 2.5), 1.0));
        // same hyperbola blown up by 1000: still not a line pair at its own scale
        let big = ConicEquation::new(0.0, 1.0, 0.0, -2000.0, -1000.0, 1.0e6);
        assert!(!big.is_line_pair_near(Point::new(1500.0, 2500.0), 1000.0));
    }

    #[test]
    fn component_lines_vanish_along_segments() {
        // (y - 1)(x - 0.3) = 0: the line y = 1 is a component
        let pair = ConicEquation::new(0.0, 1.0, 0.0, -1.0, -0.3, 0.3);
        let top = Segment::new(Point::new(1.0, 1.0), Point::new(0.0, 1.0));
        assert!(pair.vanishes_on(&top, 1e-9));
        let side = Segment::new(Point::new(1.0, 0.0), Point::new(1.0, 1.0));
        assert!(!pair.vanishes_on(&side, 1e-9));
        let circle = ConicEquation::new(1.0, 0.0, 1.0, 0.0, 0.0, -1.0);
        let chord = Segment::new(Point::new(-1.0, 0.0), Point::new(0.0, 1.0));
        assert!(!circle.vanishes_on(&chord, 1e-9));
        // the crossing of the two components is the center
        assert!((pair.center().unwrap() - Point::new(0.3, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn line_params_hits_circle_twice() {
        let circle = ConicEquation::new(1.0, 0.0, 1.0, 0.0, 0.0, -1.0);
        let mut s = circle.line_params(Point::new(-2.0, 0.0), Point::new(1.0, 0.0));
        s.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(s.len(), 2);
        assert!((s[0] - 1.0).abs() < 1e-12 && (s[1] - 3.0).abs() < 1e-12);
        let ys = circle.roots_at_x(0.0);
        assert_eq!(ys.len(), 2);
    }
}
