//! Sites and their spoke/cone decomposition of Ω.
//!
//! A spoke of site `c` is the chord of Ω through `c` and a vertex `a` of Ω, ending at
//! the opposite boundary point `d`. Halving every spoke at `c` gives the partial
//! spokes; sorted by angle around `c` they fan Ω into triangular bounded cones
//! `(c, pᵢ, pᵢ₊₁)`. Inside one cone the rays from `c` all leave through the same
//! boundary edge, which is what makes the Hilbert distance to `c` a single
//! closed-form expression per cone.
//!
//! A `Site` is an immutable snapshot for one domain. Moving it or changing Ω means
//! building a new one (`Site::moved_to`, `Site::recompute`).

use crate::error::{HilbertError, HilbertResult};
use crate::geom2::{points_equal, ConvexRegion, GeomCfg, Point, Segment};
use std::cmp::Ordering;

/// Chord through the site `c` from vertex `a` to the opposite boundary point `d`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spoke {
    pub a: Point,
    pub c: Point,
    pub d: Point,
}

/// Half of a spoke, from the site to the boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartialSpoke {
    pub start: Point,
    pub end: Point,
    /// Index of the spoke this half belongs to.
    pub spoke: usize,
}

impl PartialSpoke {
    #[inline]
    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }
}

/// Triangle between two consecutive partial spokes.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedCone {
    pub region: ConvexRegion,
    pub index: usize,
    pub site: Point,
    /// Piece of ∂Ω closing the triangle.
    pub outer: Segment,
}

impl BoundedCone {
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.region.contains(p)
    }

    #[inline]
    pub fn on_boundary(&self, p: Point, cfg: &GeomCfg) -> bool {
        self.region.on_boundary(p, cfg)
    }
}

#[derive(Clone, Debug)]
pub struct Site {
    point: Point,
    spokes: Vec<Spoke>,
    partial_spokes: Vec<PartialSpoke>,
    cones: Vec<BoundedCone>,
}

impl Site {
    /// Build the spoke structure of `point` in `omega`.
    ///
    /// Errors: `TooFewVertices` for a degenerate domain, `NotInterior` unless
    /// `point` is strictly inside.
    pub fn new(point: Point, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<Self> {
        if !omega.is_polygon() {
            return Err(HilbertError::TooFewVertices(omega.len()));
        }
        if !omega.contains(point) || omega.on_boundary(point, cfg) {
            return Err(HilbertError::NotInterior);
        }
        let spokes = spokes_of(point, omega, cfg);
        let partial_spokes = partial_spokes_of(point, &spokes, cfg);
        let cones = cones_of(point, &partial_spokes);
        Ok(Self {
            point,
            spokes,
            partial_spokes,
            cones,
        })
    }

    /// Same location, new domain.
    pub fn recompute(&self, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<Self> {
        Self::new(self.point, omega, cfg)
    }

    /// Same domain, new location.
    pub fn moved_to(&self, point: Point, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<Self> {
        Self::new(point, omega, cfg)
    }

    #[inline]
    pub fn point(&self) -> Point {
        self.point
    }

    #[inline]
    pub fn spokes(&self) -> &[Spoke] {
        &self.spokes
    }

    #[inline]
    pub fn partial_spokes(&self) -> &[PartialSpoke] {
        &self.partial_spokes
    }

    #[inline]
    pub fn cones(&self) -> &[BoundedCone] {
        &self.cones
    }

    /// Cone containing `p`: strict interior first, then boundary.
    pub fn bounded_cone_of(&self, p: Point, cfg: &GeomCfg) -> Option<&BoundedCone> {
        self.cones
            .iter()
            .find(|bc| bc.contains(p) && !bc.on_boundary(p, cfg))
            .or_else(|| self.cones.iter().find(|bc| bc.on_boundary(p, cfg)))
    }

    /// First cone whose boundary holds `p`, other than the cone `exclude`.
    pub fn boundary_bounded_cone_of(
        &self,
        p: Point,
        exclude: usize,
        cfg: &GeomCfg,
    ) -> Option<&BoundedCone> {
        self.cones
            .iter()
            .find(|bc| bc.index != exclude && bc.on_boundary(p, cfg))
    }

    #[inline]
    pub fn cone(&self, index: usize) -> Option<&BoundedCone> {
        self.cones.get(index)
    }

    /// Whether `p` lies on one of the partial spokes.
    pub fn lies_on_spoke(&self, p: Point, cfg: &GeomCfg) -> bool {
        self.partial_spokes
            .iter()
            .any(|ps| ps.segment().contains_point(p, cfg.eps_equal))
    }
}

fn spokes_of(site: Point, omega: &ConvexRegion, cfg: &GeomCfg) -> Vec<Spoke> {
    let mut spokes = Vec::with_capacity(omega.len());
    for &a in omega.vertices() {
        let ray = Segment::new(a, site);
        let mut best: Option<(f64, Point)> = None;
        for edge in omega.edges() {
            let Some(p) = edge.line_intersection(&ray, cfg.eps_det) else {
                continue;
            };
            if points_equal(p, a, cfg.eps_equal) || !edge.contains_point(p, cfg.eps_equal) {
                continue;
            }
            let dist = (p - site).norm();
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, p));
            }
        }
        if let Some((_, d)) = best {
            spokes.push(Spoke { a, c: site, d });
        }
    }
    spokes
}

fn partial_spokes_of(site: Point, spokes: &[Spoke], cfg: &GeomCfg) -> Vec<PartialSpoke> {
    let angle = |p: Point| (p.y - site.y).atan2(p.x - site.x);
    let mut halves: Vec<PartialSpoke> = spokes
        .iter()
        .enumerate()
        .flat_map(|(i, s)| {
            [
                PartialSpoke { start: site, end: s.a, spoke: i },
                PartialSpoke { start: site, end: s.d, spoke: i },
            ]
        })
        .collect();
    halves.sort_by(|x, y| {
        angle(x.end)
            .partial_cmp(&angle(y.end))
            .unwrap_or(Ordering::Equal)
    });
    // a spoke ending at a vertex duplicates that vertex's own spoke half
    let mut merged: Vec<PartialSpoke> = Vec::with_capacity(halves.len());
    for h in halves {
        if !merged.iter().any(|m| points_equal(m.end, h.end, cfg.eps_equal)) {
            merged.push(h);
        }
    }
    merged
}

fn cones_of(site: Point, partial: &[PartialSpoke]) -> Vec<BoundedCone> {
    let n = partial.len();
    (0..n)
        .map(|i| {
            let (p, q) = (partial[i].end, partial[(i + 1) % n].end);
            BoundedCone {
                region: ConvexRegion::from_points(&[site, p, q]),
                index: i,
                site,
                outer: Segment::new(p, q),
            }
        })
        .collect()
}
