//! Hilbert circumcenter of three sites.
//!
//! Candidates come from the sampled bisectors: crossings of the polylines of
//! `bisector(s1, s2)` and `bisector(s1, s3)`, plus the best sample of the first
//! that matches samples of the other two within `match_tol`. Each candidate is
//! then polished by a damped Newton solve of `d(p, s1) = d(p, s2) = d(p, s3)`
//! with a finite-difference Jacobian. If nothing converges, the sites are
//! jittered and the candidate search repeated; the Newton target stays the
//! unperturbed sites.

use nalgebra::{Matrix2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::bisector::{bisector_of, TraceCfg};
use crate::distance::hilbert_distance;
use crate::geom2::{points_equal, ConvexRegion, GeomCfg, Point, Segment};

/// Circumcenter search knobs.
#[derive(Clone, Copy, Debug)]
pub struct CircumCfg {
    /// Absolute distance for matching samples of the three bisectors.
    pub match_tol: f64,
    /// Uniform per-coordinate jitter for retries.
    pub jitter: f64,
    pub max_attempts: usize,
    /// Bisector sampling step.
    pub resolution: f64,
    pub newton_iters: usize,
    /// Accepted `max |d(p, s1) − d(p, sᵢ)|`.
    pub tol: f64,
    pub trace: TraceCfg,
}

impl Default for CircumCfg {
    fn default() -> Self {
        Self {
            match_tol: 1.0,
            jitter: 0.05,
            max_attempts: 10,
            resolution: 0.01,
            newton_iters: 40,
            tol: 1e-9,
            trace: TraceCfg::default(),
        }
    }
}

/// Point equidistant from `s1`, `s2`, `s3`, if one is found.
pub fn find_circumcenter<R: Rng + ?Sized>(
    s1: Point,
    s2: Point,
    s3: Point,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    ccfg: &CircumCfg,
    rng: &mut R,
) -> Option<Point> {
    let sites = [s1, s2, s3];
    if points_equal(s1, s2, cfg.eps_equal)
        || points_equal(s1, s3, cfg.eps_equal)
        || points_equal(s2, s3, cfg.eps_equal)
    {
        return None;
    }
    for attempt in 0..ccfg.max_attempts.max(1) {
        let probe = if attempt == 0 {
            sites
        } else {
            let j = ccfg.jitter.abs();
            sites.map(|s| s + Vector2::new(rng.gen_range(-j..=j), rng.gen_range(-j..=j)))
        };
        if probe
            .iter()
            .any(|p| !omega.contains(*p) || omega.on_boundary(*p, cfg))
        {
            continue;
        }
        for cand in candidates(probe, omega, cfg, ccfg) {
            if let Some(p) = refine(cand, sites, omega, cfg, ccfg) {
                debug!(attempt, x = p.x, y = p.y, "circumcenter found");
                return Some(p);
            }
        }
        debug!(attempt, "circumcenter attempt failed");
    }
    None
}

/// Seeded convenience wrapper.
pub fn find_circumcenter_seeded(
    s1: Point,
    s2: Point,
    s3: Point,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    ccfg: &CircumCfg,
    seed: u64,
) -> Option<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    find_circumcenter(s1, s2, s3, omega, cfg, ccfg, &mut rng)
}

fn candidates(sites: [Point; 3], omega: &ConvexRegion, cfg: &GeomCfg, ccfg: &CircumCfg) -> Vec<Point> {
    let [s1, s2, s3] = sites;
    let line12 = match bisector_of(s1, s2, omega, cfg, ccfg.trace) {
        Ok(b) => b.polyline(ccfg.resolution),
        Err(err) => {
            debug!(%err, "bisector(s1, s2) unavailable");
            return Vec::new();
        }
    };
    let line13 = match bisector_of(s1, s3, omega, cfg, ccfg.trace) {
        Ok(b) => b.polyline(ccfg.resolution),
        Err(err) => {
            debug!(%err, "bisector(s1, s3) unavailable");
            return Vec::new();
        }
    };
    let mut out = polyline_crossings(&line12, &line13, cfg);
    if let Ok(b23) = bisector_of(s2, s3, omega, cfg, ccfg.trace) {
        let line23 = b23.polyline(ccfg.resolution);
        if let Some(m) = best_match(&line12, &line13, &line23, ccfg.match_tol) {
            out.push(m);
        }
    }
    out
}

fn polyline_crossings(a: &[Point], b: &[Point], cfg: &GeomCfg) -> Vec<Point> {
    let mut out = Vec::new();
    for sa in a.windows(2) {
        let ea = Segment::new(sa[0], sa[1]);
        for sb in b.windows(2) {
            let eb = Segment::new(sb[0], sb[1]);
            if let Some(p) = ea.segment_intersection(&eb, cfg) {
                if !out.iter().any(|q: &Point| points_equal(*q, p, cfg.eps_equal)) {
                    out.push(p);
                }
            }
        }
    }
    out
}

fn nearest(p: Point, line: &[Point]) -> Option<(f64, Point)> {
    line.iter()
        .map(|q| ((q - p).norm(), *q))
        .min_by(|x, y| x.0.total_cmp(&y.0))
}

/// Sample of `a` best matched by samples of `b` and `c` (all within `tol`),
/// returned as the average of the three.
fn best_match(a: &[Point], b: &[Point], c: &[Point], tol: f64) -> Option<Point> {
    let mut best: Option<(f64, Point)> = None;
    for p in a {
        let (db, qb) = nearest(*p, b)?;
        let (dc, qc) = nearest(*p, c)?;
        let score = db.max(dc);
        if score <= tol && best.map_or(true, |(s, _)| score < s) {
            best = Some((score, (p + qb + qc) / 3.0));
        }
    }
    best.map(|(_, p)| p)
}

fn residual(p: Point, sites: [Point; 3], omega: &ConvexRegion, cfg: &GeomCfg) -> Option<Vector2<f64>> {
    let d1 = hilbert_distance(p, sites[0], omega, cfg).ok()?;
    let d2 = hilbert_distance(p, sites[1], omega, cfg).ok()?;
    let d3 = hilbert_distance(p, sites[2], omega, cfg).ok()?;
    Some(Vector2::new(d1 - d2, d1 - d3))
}

fn refine(
    start: Point,
    sites: [Point; 3],
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    ccfg: &CircumCfg,
) -> Option<Point> {
    let inside = |p: Point| omega.contains(p) && !omega.on_boundary(p, cfg);
    if !inside(start) {
        return None;
    }
    let (lo, hi) = omega.bounding_box()?;
    let h = 1e-7 * (hi - lo).norm();
    let mut p = start;
    let mut f = residual(p, sites, omega, cfg)?;
    for _ in 0..ccfg.newton_iters {
        if f.amax() < ccfg.tol {
            return Some(p);
        }
        let fx = residual(p + Vector2::new(h, 0.0), sites, omega, cfg)?;
        let fy = residual(p + Vector2::new(0.0, h), sites, omega, cfg)?;
        let jac = Matrix2::from_columns(&[(fx - f) / h, (fy - f) / h]);
        let step = -(jac.try_inverse()? * f);
        let mut lambda = 1.0;
        loop {
            let cand = p + step * lambda;
            if inside(cand) {
                if let Some(fc) = residual(cand, sites, omega, cfg) {
                    if fc.norm() < f.norm() {
                        p = cand;
                        f = fc;
                        break;
                    }
                }
            }
            lambda *= 0.5;
            if lambda < 1e-8 {
                return (f.amax() < ccfg.tol).then_some(p);
            }
        }
    }
    (f.amax() < ccfg.tol).then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn pentagon() -> ConvexRegion {
        let pts: Vec<Point> = (0..5)
            .map(|k| {
                let th = std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::TAU / 5.0;
                vector![th.cos(), th.sin()]
            })
            .collect();
        ConvexRegion::from_points(&pts)
    }

    #[test]
    fn pentagon_circumcenter_is_equidistant() {
        let cfg = GeomCfg::default();
        let omega = pentagon();
        let (a, b, c) = (vector![-0.3, 0.0], vector![0.3, 0.05], vector![0.0, 0.35]);
        let p = find_circumcenter_seeded(a, b, c, &omega, &cfg, &CircumCfg::default(), 1)
            .expect("circumcenter");
        assert!(omega.contains(p));
        let da = hilbert_distance(p, a, &omega, &cfg).unwrap();
        let db = hilbert_distance(p, b, &omega, &cfg).unwrap();
        let dc = hilbert_distance(p, c, &omega, &cfg).unwrap();
        assert!((da - db).abs() < 1e-8 && (da - dc).abs() < 1e-8, "{da} {db} {dc}");
    }

    #[test]
    fn square_symmetric_triangle_center_on_axis() {
        let cfg = GeomCfg::default();
        let sq = ConvexRegion::from_points(&[
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
        ]);
        let (a, b, c) = (vector![0.3, 0.35], vector![0.7, 0.35], vector![0.5, 0.7]);
        let p = find_circumcenter_seeded(a, b, c, &sq, &cfg, &CircumCfg::default(), 5)
            .expect("circumcenter");
        assert!((p.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn coincident_sites_have_no_circumcenter() {
        let cfg = GeomCfg::default();
        let omega = pentagon();
        let a = vector![0.1, 0.1];
        let r = find_circumcenter_seeded(a, a, vector![0.2, -0.1], &omega, &cfg, &CircumCfg::default(), 0);
        assert!(r.is_none());
    }

    #[test]
    fn newton_polishes_a_rough_guess() {
        let cfg = GeomCfg::default();
        let omega = pentagon();
        let sites = [vector![-0.3, 0.0], vector![0.3, 0.05], vector![0.0, 0.35]];
        let rough = find_circumcenter_seeded(sites[0], sites[1], sites[2], &omega, &cfg, &CircumCfg::default(), 3)
            .unwrap()
            + vector![0.01, -0.01];
        let p = refine(rough, sites, &omega, &cfg, &CircumCfg::default()).unwrap();
        let f = residual(p, sites, &omega, &cfg).unwrap();
        assert!(f.amax() < 1e-9);
    }
}
