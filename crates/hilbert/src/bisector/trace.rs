//! Piecewise-conic bisector tracing across cone intersections.

use tracing::{debug, trace};

use crate::distance::chord_endpoints;
use crate::error::{HilbertError, HilbertResult};
use crate::geom2::{ConicEquation, ConvexRegion, GeomCfg, Point, Segment};
use crate::site::Site;

use super::types::{Bisector, BisectorPiece, ConePair, MiddleSector, PieceKind, TraceCfg};

/// Boundary edges hit by the line `site → c`: `(behind site, beyond c)`.
pub fn omega_edges(
    site: Point,
    c: Point,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
) -> HilbertResult<(Segment, Segment)> {
    let (behind, beyond) = chord_endpoints(site, c, omega, cfg)?;
    let e1 = omega
        .find_segment(behind, cfg)
        .ok_or(HilbertError::MissingIntersection { expected: 2, found: 0 })?;
    let e2 = omega
        .find_segment(beyond, cfg)
        .ok_or(HilbertError::MissingIntersection { expected: 2, found: 1 })?;
    Ok((e1, e2))
}

/// Middle sector of two sites and the straight bisector chord through it.
///
/// `CollinearSites` when either site lies on a spoke of the other: the two cones
/// then meet in a segment.
pub fn middle_sector(s1: &Site, s2: &Site, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<MiddleSector> {
    let (p1, p2) = (s1.point(), s2.point());
    if (p1 - p2).norm() < cfg.eps_equal || s1.lies_on_spoke(p2, cfg) || s2.lies_on_spoke(p1, cfg) {
        return Err(HilbertError::CollinearSites);
    }
    let bc1 = s1.bounded_cone_of(p2, cfg).ok_or(HilbertError::EmptySector)?;
    let bc2 = s2.bounded_cone_of(p1, cfg).ok_or(HilbertError::EmptySector)?;
    let sector = bc1
        .region
        .create_polygon_intersection(&bc2.region, cfg)
        .ok_or(HilbertError::EmptySector)?;
    let c = sector.centroid().ok_or(HilbertError::EmptySector)?;
    let (e1, e2) = omega_edges(p1, c, omega, cfg)?;
    let equation = ConicEquation::bisector(p1, p2, &e1, &e2, &e2, &e1);
    let hits = sector.intersect_with_conic(&equation, cfg);
    let endpoints = farthest_pair(&hits).ok_or(HilbertError::MissingIntersection {
        expected: 2,
        found: hits.len(),
    })?;
    Ok(MiddleSector {
        sector,
        equation,
        endpoints,
        cones: ConePair {
            c1: bc1.index,
            c2: bc2.index,
        },
    })
}

fn farthest_pair(pts: &[Point]) -> Option<[Point; 2]> {
    let mut best: Option<(f64, [Point; 2])> = None;
    for (i, a) in pts.iter().enumerate() {
        for b in &pts[i + 1..] {
            let d = (a - b).norm();
            if best.map_or(true, |(bd, _)| d > bd) {
                best = Some((d, [*a, *b]));
            }
        }
    }
    best.map(|(_, pair)| pair)
}

/// Trace the full bisector of `s1` and `s2`.
///
/// Only the middle sector can fail; an error while tracing outward ends that
/// direction and keeps the pieces found so far.
pub fn trace_bisector(
    s1: &Site,
    s2: &Site,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    tcfg: TraceCfg,
) -> HilbertResult<Bisector> {
    let middle = middle_sector(s1, s2, omega, cfg)?;
    let middle_piece = BisectorPiece {
        start: middle.endpoints[0],
        end: middle.endpoints[1],
        equation: middle.equation,
        sector: middle.sector.clone(),
        kind: PieceKind::Middle,
    };
    let tracer = Tracer {
        s1,
        s2,
        omega,
        cfg: *cfg,
        budget: tcfg.piece_budget(omega.len()),
    };
    let dir1 = tracer.trace_from(middle.endpoints[0], middle.cones);
    let dir2 = tracer.trace_from(middle.endpoints[1], middle.cones);
    debug!(
        dir1 = dir1.len(),
        dir2 = dir2.len(),
        "bisector traced"
    );
    Ok(Bisector {
        s1: s1.point(),
        s2: s2.point(),
        middle,
        middle_piece,
        dir1,
        dir2,
    })
}

/// Result of one tracing step.
struct Step {
    piece: BisectorPiece,
    cones: ConePair,
    terminal: bool,
}

/// Shared context for tracing both directions.
struct Tracer<'a> {
    s1: &'a Site,
    s2: &'a Site,
    omega: &'a ConvexRegion,
    cfg: GeomCfg,
    budget: usize,
}

impl<'a> Tracer<'a> {
    fn trace_from(&self, start: Point, cones: ConePair) -> Vec<BisectorPiece> {
        let mut pieces = Vec::new();
        let mut endpoint = start;
        let mut cones = cones;
        while !self.omega.on_boundary(endpoint, &self.cfg) {
            if pieces.len() >= self.budget {
                debug!(budget = self.budget, "piece budget exhausted");
                break;
            }
            match self.step(endpoint, cones) {
                Ok(Step {
                    piece,
                    cones: next,
                    terminal,
                }) => {
                    trace!(start = ?piece.start, end = ?piece.end, kind = ?piece.kind, "piece");
                    endpoint = piece.end;
                    cones = next;
                    pieces.push(piece);
                    if terminal {
                        break;
                    }
                }
                Err(err) => {
                    debug!(%err, at = ?endpoint, "bisector branch aborted");
                    break;
                }
            }
        }
        pieces
    }

    /// Cones on the far side of `endpoint`. A site keeps its cone unless the
    /// endpoint sits on one of its spokes; at a crossing of two spokes both switch.
    fn next_cones(&self, endpoint: Point, cur: ConePair) -> HilbertResult<ConePair> {
        let n1 = self.s1.boundary_bounded_cone_of(endpoint, cur.c1, &self.cfg);
        let n2 = self.s2.boundary_bounded_cone_of(endpoint, cur.c2, &self.cfg);
        match (n1, n2) {
            (Some(a), Some(b)) => Ok(ConePair {
                c1: a.index,
                c2: b.index,
            }),
            (Some(a), None) => Ok(ConePair {
                c1: a.index,
                c2: cur.c2,
            }),
            (None, Some(b)) => Ok(ConePair {
                c1: cur.c1,
                c2: b.index,
            }),
            (None, None) => Err(HilbertError::EmptySector),
        }
    }

    fn step(&self, endpoint: Point, cur: ConePair) -> HilbertResult<Step> {
        let cfg = &self.cfg;
        let cones = self.next_cones(endpoint, cur)?;
        let r1 = &self.s1.cone(cones.c1).ok_or(HilbertError::EmptySector)?.region;
        let r2 = &self.s2.cone(cones.c2).ok_or(HilbertError::EmptySector)?.region;
        let sector = r1
            .create_polygon_intersection(r2, cfg)
            .ok_or(HilbertError::EmptySector)?;
        let c = sector.centroid().ok_or(HilbertError::EmptySector)?;
        let (p1, p2) = (self.s1.point(), self.s2.point());
        let (e1, e2) = omega_edges(p1, c, self.omega, cfg)?;
        let (e3, e4) = omega_edges(p2, c, self.omega, cfg)?;
        let equation = ConicEquation::bisector(p1, p2, &e1, &e2, &e3, &e4);
        let par1 = e1.is_parallel(&e2, cfg.eps_parallel);
        let par2 = e3.is_parallel(&e4, cfg.eps_parallel);

        let scale = sector
            .vertices()
            .iter()
            .map(|v| (v - c).norm())
            .fold(0.0, f64::max);
        let kind = if equation.is_line_pair_near(c, scale) {
            PieceKind::Line
        } else {
            PieceKind::Conic
        };

        let next = self
            .crossings(&sector, &equation)
            .into_iter()
            .filter(|p| (p - endpoint).norm() > cfg.eps_step)
            .min_by(|a, b| (a - endpoint).norm().total_cmp(&(b - endpoint).norm()));

        if let Some(end) = next {
            return Ok(Step {
                piece: BisectorPiece {
                    start: endpoint,
                    end,
                    equation,
                    sector,
                    kind,
                },
                cones,
                terminal: false,
            });
        }
        if par1 || par2 {
            // the arc runs into the asymptote crossing instead of the sector boundary
            if let Some(piece) = center_piece(endpoint, equation, sector, cfg)? {
                return Ok(Step {
                    piece,
                    cones,
                    terminal: true,
                });
            }
        }
        Err(HilbertError::MissingIntersection {
            expected: 1,
            found: 0,
        })
    }

    /// Conic/sector crossings that belong to the bisector.
    ///
    /// When the conic splits off the line of an Ω edge, every point of that edge
    /// solves the equation, but none of them is at finite distance. Crossings on
    /// such an edge are dropped; the other component reaches ∂Ω at the
    /// crossing of the two lines, which is kept when it lies in the sector.
    fn crossings(&self, sector: &ConvexRegion, equation: &ConicEquation) -> Vec<Point> {
        let cfg = &self.cfg;
        let dead: Vec<&Segment> = self
            .omega
            .edges()
            .iter()
            .filter(|e| equation.vanishes_on(e, COMPONENT_TOL))
            .collect();
        let on_dead = |p: &Point| dead.iter().any(|e| e.contains_point(*p, cfg.eps_equal));
        let mut hits: Vec<Point> = sector
            .intersect_with_conic(equation, cfg)
            .into_iter()
            .filter(|p| !on_dead(p))
            .collect();
        if !dead.is_empty() {
            match equation.center() {
                Ok(c) if on_dead(&c) && sector.contains_eps(c, cfg.eps_equal) => hits.push(c),
                Ok(_) => {}
                Err(err) => trace!(%err, "boundary component without a crossing"),
            }
        }
        hits
    }
}

/// Relative size below which a conic counts as vanishing along an edge.
const COMPONENT_TOL: f64 = 1e-9;

/// Straight piece from `endpoint` to the conic center, if the center is a
/// distinct point inside the sector.
pub(super) fn center_piece(
    endpoint: Point,
    equation: ConicEquation,
    sector: ConvexRegion,
    cfg: &GeomCfg,
) -> HilbertResult<Option<BisectorPiece>> {
    let center = equation.center()?;
    if !sector.contains_eps(center, cfg.eps_equal) || (center - endpoint).norm() <= cfg.eps_step {
        return Ok(None);
    }
    Ok(Some(BisectorPiece {
        start: endpoint,
        end: center,
        equation,
        sector,
        kind: PieceKind::Line,
    }))
}

/// Build both sites in `omega` and trace their bisector.
pub fn bisector_of(
    p1: Point,
    p2: Point,
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    tcfg: TraceCfg,
) -> HilbertResult<Bisector> {
    let s1 = Site::new(p1, omega, cfg)?;
    let s2 = Site::new(p2, omega, cfg)?;
    trace_bisector(&s1, &s2, omega, cfg, tcfg)
}
