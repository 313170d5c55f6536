//! Minimum enclosing Hilbert ball (randomized incremental, Welzl style).
//!
//! Purpose
//! - Smallest Hilbert ball containing a finite point set inside Ω.
//!
//! Structure
//! - Three nested loops, one per support state: no boundary point fixed
//!   (`make_ball`), one fixed (`one_support`), two fixed (`two_support`).
//! - Two-point balls are centered at the bottom-left endpoint of the bisector
//!   chord in the pair's middle sector (the chord lies in the geodesic region,
//!   so the radius is half the pair distance). Three-point balls are circumballs.
//! - With two points fixed, each outside point `r` yields a candidate (circumball
//!   of `p, q, r`, or a two-point ball when `r` sits in the Z-region of `p, q`).
//!   Candidates are split by the side of line `pq` that `r` is on; the leftmost
//!   left-candidate and rightmost right-candidate are kept and the smaller wins.
//!
//! Numerical failures (no circumcenter, degenerate sectors) skip the offending
//! candidate. A final pass grows the radius to cover any point left outside;
//! the support then names the point that set the new radius.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::ball::HilbertBall;
use crate::bisector::middle_sector;
use crate::circumcenter::{find_circumcenter, CircumCfg};
use crate::distance::{hilbert_distance, hilbert_midpoint};
use crate::error::{HilbertError, HilbertResult};
use crate::geom2::{orient, ConvexRegion, GeomCfg, Point};
use crate::site::Site;

/// Solver knobs.
#[derive(Clone, Copy, Debug)]
pub struct MebCfg {
    /// Containment slack: `d(center, x) ≤ radius + contain_eps`.
    pub contain_eps: f64,
    pub circum: CircumCfg,
}

impl Default for MebCfg {
    fn default() -> Self {
        Self {
            contain_eps: 1e-9,
            circum: CircumCfg::default(),
        }
    }
}

/// Input points that pin the ball.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Support {
    /// Radius 0 at the point.
    Center(Point),
    /// Two-point ball.
    Pair(Point, Point),
    /// Circumball.
    Triple(Point, Point, Point),
    /// Radius grown to reach this point after the solver left it outside.
    Covering(Point),
}

#[derive(Clone, Debug)]
pub struct EnclosingBall {
    pub ball: HilbertBall,
    pub support: Support,
}

/// Minimum enclosing ball with a caller-provided RNG (shuffle and circumcenter jitter).
///
/// `Ok(None)` for empty input; `Err(NotInterior)` if a point is not strictly inside Ω.
pub fn minimum_enclosing_ball<R: Rng + ?Sized>(
    points: &[Point],
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    mcfg: &MebCfg,
    rng: &mut R,
) -> HilbertResult<Option<EnclosingBall>> {
    if points.is_empty() {
        return Ok(None);
    }
    if !omega.is_polygon() {
        return Err(HilbertError::TooFewVertices(omega.len()));
    }
    if points
        .iter()
        .any(|p| !omega.contains(*p) || omega.on_boundary(*p, cfg))
    {
        return Err(HilbertError::NotInterior);
    }
    let mut shuffled = points.to_vec();
    shuffled.shuffle(rng);

    let mut solver = Solver {
        omega,
        cfg: *cfg,
        mcfg: *mcfg,
        rng,
    };
    let Some(best) = solver.make_ball(&shuffled) else {
        return Ok(None);
    };
    let best = solver.cover_all(best, points);
    debug!(
        x = best.center.x,
        y = best.center.y,
        radius = best.radius,
        "minimum enclosing ball"
    );
    let ball = HilbertBall::around(best.center, best.radius, omega, cfg)?;
    Ok(Some(EnclosingBall {
        ball,
        support: best.support,
    }))
}

/// Seeded convenience wrapper.
pub fn minimum_enclosing_ball_seeded(
    points: &[Point],
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    mcfg: &MebCfg,
    seed: u64,
) -> HilbertResult<Option<EnclosingBall>> {
    let mut rng = StdRng::seed_from_u64(seed);
    minimum_enclosing_ball(points, omega, cfg, mcfg, &mut rng)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    center: Point,
    radius: f64,
    support: Support,
}

struct Solver<'a, R: ?Sized> {
    omega: &'a ConvexRegion,
    cfg: GeomCfg,
    mcfg: MebCfg,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Solver<'a, R> {
    fn contains(&self, ball: &Candidate, x: Point) -> bool {
        hilbert_distance(ball.center, x, self.omega, &self.cfg)
            .map(|d| d <= ball.radius + self.mcfg.contain_eps)
            .unwrap_or(false)
    }

    /// Grow `ball` to the farthest point it misses; the center stays.
    fn cover_all(&self, ball: Candidate, points: &[Point]) -> Candidate {
        let far = points
            .iter()
            .filter_map(|x| {
                hilbert_distance(ball.center, *x, self.omega, &self.cfg)
                    .ok()
                    .map(|d| (d, *x))
            })
            .max_by(|a, b| a.0.total_cmp(&b.0));
        match far {
            Some((d, x)) if d > ball.radius + self.mcfg.contain_eps => {
                debug!(radius = ball.radius, far = d, "enclosing radius grown to cover stragglers");
                Candidate {
                    center: ball.center,
                    radius: d,
                    support: Support::Covering(x),
                }
            }
            _ => ball,
        }
    }

    fn interior(&self, p: Point) -> bool {
        self.omega.contains(p) && !self.omega.on_boundary(p, &self.cfg)
    }

    fn make_ball(&mut self, shuffled: &[Point]) -> Option<Candidate> {
        let mut ball: Option<Candidate> = None;
        for (i, &p) in shuffled.iter().enumerate() {
            if ball.as_ref().map_or(true, |b| !self.contains(b, p)) {
                ball = Some(self.one_support(&shuffled[..i], p));
            }
        }
        ball
    }

    fn one_support(&mut self, points: &[Point], p: Point) -> Candidate {
        let mut ball = Candidate {
            center: p,
            radius: 0.0,
            support: Support::Center(p),
        };
        for (i, &q) in points.iter().enumerate() {
            if self.contains(&ball, q) {
                continue;
            }
            let next = if ball.radius == 0.0 {
                self.bottom_left(p, q)
            } else {
                self.two_support(&points[..i], p, q)
            };
            match next {
                Some(b) => ball = b,
                None => debug!(?p, ?q, "no ball through pair; keeping previous"),
            }
        }
        ball
    }

    fn two_support(&mut self, points: &[Point], p: Point, q: Point) -> Option<Candidate> {
        let base = self.bottom_left(p, q)?;
        let mut left: Option<Candidate> = None;
        let mut right: Option<Candidate> = None;
        for &r in points {
            if self.contains(&base, r) {
                continue;
            }
            let cross = orient(p, q, r);
            let Some(circ) = self.circumball(p, q, r).or_else(|| self.z_region_ball(p, q, r)) else {
                debug!(?r, "no candidate ball for point; skipped");
                continue;
            };
            let score = orient(p, q, circ.center);
            if cross > 0.0 && left.map_or(true, |l| score > orient(p, q, l.center)) {
                left = Some(circ);
            } else if cross < 0.0 && right.map_or(true, |rt| score < orient(p, q, rt.center)) {
                right = Some(circ);
            }
        }
        Some(match (left, right) {
            (None, None) => base,
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (Some(l), Some(r)) => {
                if l.radius <= r.radius {
                    l
                } else {
                    r
                }
            }
        })
    }

    /// `r` in the Z-region of `p, q`: a two-point ball through `r` and one of
    /// them already covers the other.
    fn z_region_ball(&self, p: Point, q: Point, r: Point) -> Option<Candidate> {
        if let Some(b) = self.bottom_left(p, r) {
            if self.contains(&b, q) {
                return Some(b);
            }
        }
        let b = self.bottom_left(q, r)?;
        self.contains(&b, p).then_some(b)
    }

    /// Two-point ball: center at the lowest (then leftmost) endpoint of the
    /// middle-sector chord; the Hilbert midpoint when that is unavailable.
    fn bottom_left(&self, p: Point, q: Point) -> Option<Candidate> {
        let chord_end = Site::new(p, self.omega, &self.cfg)
            .and_then(|sp| {
                let sq = Site::new(q, self.omega, &self.cfg)?;
                middle_sector(&sp, &sq, self.omega, &self.cfg)
            })
            .map(|ms| {
                let [a, b] = ms.endpoints;
                if a.y < b.y || (a.y == b.y && a.x < b.x) {
                    a
                } else {
                    b
                }
            });
        let center = match chord_end {
            Ok(c) if self.interior(c) => c,
            Ok(_) => hilbert_midpoint(p, q, self.omega, &self.cfg).ok()?,
            Err(err) => {
                debug!(%err, "middle sector unavailable; using the midpoint");
                hilbert_midpoint(p, q, self.omega, &self.cfg).ok()?
            }
        };
        let radius = hilbert_distance(center, p, self.omega, &self.cfg).ok()?;
        Some(Candidate {
            center,
            radius,
            support: Support::Pair(p, q),
        })
    }

    fn circumball(&mut self, p: Point, q: Point, r: Point) -> Option<Candidate> {
        let center = find_circumcenter(p, q, r, self.omega, &self.cfg, &self.mcfg.circum, &mut *self.rng)?;
        let radius = hilbert_distance(center, p, self.omega, &self.cfg).ok()?;
        Some(Candidate {
            center,
            radius,
            support: Support::Triple(p, q, r),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::rand::{draw_region_radial, sample_interior, RadialCfg, ReplayToken};
    use nalgebra::vector;

    fn unit_square() -> ConvexRegion {
        ConvexRegion::from_points(&[
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
        ])
    }

    #[test]
    fn empty_and_single_point() {
        let cfg = GeomCfg::default();
        let sq = unit_square();
        let none = minimum_enclosing_ball_seeded(&[], &sq, &cfg, &MebCfg::default(), 0).unwrap();
        assert!(none.is_none());
        let one = minimum_enclosing_ball_seeded(&[vector![0.4, 0.4]], &sq, &cfg, &MebCfg::default(), 0)
            .unwrap()
            .unwrap();
        assert_eq!(one.ball.radius(), 0.0);
        assert_eq!(one.support, Support::Center(vector![0.4, 0.4]));
    }

    #[test]
    fn two_points_give_half_the_distance() {
        let cfg = GeomCfg::default();
        let sq = unit_square();
        let (p, q) = (vector![0.25, 0.5], vector![0.75, 0.5]);
        let meb = minimum_enclosing_ball_seeded(&[p, q], &sq, &cfg, &MebCfg::default(), 3)
            .unwrap()
            .unwrap();
        let d = hilbert_distance(p, q, &sq, &cfg).unwrap();
        assert!((meb.ball.radius() - d / 2.0).abs() < 1e-9);
        // lower endpoint of the middle chord
        assert!((meb.ball.center() - vector![0.5, 1.0 / 3.0]).norm() < 1e-9);
        assert!(matches!(meb.support, Support::Pair(..)));
    }

    #[test]
    fn outside_point_is_rejected() {
        let cfg = GeomCfg::default();
        let sq = unit_square();
        let r = minimum_enclosing_ball_seeded(&[vector![0.5, 0.5], vector![1.5, 0.5]], &sq, &cfg, &MebCfg::default(), 0);
        assert!(matches!(r, Err(HilbertError::NotInterior)));
    }

    #[test]
    fn covering_pass_reports_the_far_point() {
        let cfg = GeomCfg::default();
        let sq = unit_square();
        let mut rng = StdRng::seed_from_u64(1);
        let solver = Solver {
            omega: &sq,
            cfg,
            mcfg: MebCfg::default(),
            rng: &mut rng,
        };
        let (p, q, far) = (vector![0.5, 0.5], vector![0.55, 0.5], vector![0.9, 0.5]);
        let small = Candidate {
            center: p,
            radius: hilbert_distance(p, q, &sq, &cfg).unwrap(),
            support: Support::Pair(p, q),
        };
        let grown = solver.cover_all(small, &[p, q, far]);
        assert_eq!(grown.center, p);
        assert!((grown.radius - hilbert_distance(p, far, &sq, &cfg).unwrap()).abs() < 1e-12);
        assert_eq!(grown.support, Support::Covering(far));
        // nothing outside: unchanged
        let kept = solver.cover_all(small, &[p, q]);
        assert_eq!(kept.support, Support::Pair(p, q));
        assert_eq!(kept.radius, small.radius);
    }

    #[test]
    fn no_pair_or_triple_ball_is_smaller() {
        let cfg = GeomCfg::default();
        let mcfg = MebCfg::default();
        let mut rng = StdRng::seed_from_u64(99);
        for index in 0..3 {
            let omega = draw_region_radial(RadialCfg::default(), ReplayToken { seed: 8, index }).unwrap();
            let pts: Vec<Point> = (0..5)
                .map(|_| sample_interior(&omega, 0.3, &mut rng).unwrap())
                .collect();
            let meb = minimum_enclosing_ball(&pts, &omega, &cfg, &mcfg, &mut rng)
                .unwrap()
                .unwrap();

            let mut solver = Solver {
                omega: &omega,
                cfg,
                mcfg,
                rng: &mut rng,
            };
            let mut best = f64::INFINITY;
            for i in 0..pts.len() {
                for j in i + 1..pts.len() {
                    let mut balls: Vec<Candidate> = solver.bottom_left(pts[i], pts[j]).into_iter().collect();
                    for k in j + 1..pts.len() {
                        balls.extend(solver.circumball(pts[i], pts[j], pts[k]));
                    }
                    for b in balls {
                        if pts.iter().all(|x| solver.contains(&b, *x)) {
                            best = best.min(b.radius);
                        }
                    }
                }
            }
            assert!(best.is_finite(), "domain {index}: no enclosing candidate");
            assert!(
                meb.ball.radius() <= best + 1e-6,
                "domain {index}: meb {} vs best candidate {best}",
                meb.ball.radius()
            );
        }
    }

    #[test]
    fn random_sets_are_enclosed() {
        let cfg = GeomCfg::default();
        let mcfg = MebCfg::default();
        let mut rng = StdRng::seed_from_u64(2024);
        for index in 0..4 {
            let omega = draw_region_radial(RadialCfg::default(), ReplayToken { seed: 6, index }).unwrap();
            let pts: Vec<Point> = (0..5)
                .map(|_| sample_interior(&omega, 0.3, &mut rng).unwrap())
                .collect();
            let meb = minimum_enclosing_ball(&pts, &omega, &cfg, &mcfg, &mut rng)
                .unwrap()
                .unwrap();
            let mut max_pair: f64 = 0.0;
            for (i, a) in pts.iter().enumerate() {
                assert!(meb.ball.encloses(*a, &omega, &cfg, 1e-7).unwrap());
                for b in &pts[i + 1..] {
                    max_pair = max_pair.max(hilbert_distance(*a, *b, &omega, &cfg).unwrap());
                }
            }
            assert!(meb.ball.radius() >= max_pair / 2.0 - 1e-9);
        }
    }
}
