//! Convex polygonal regions: the domain Ω, bounded cones, sectors and ball boundaries.
//!
//! Purpose
//! - One vertex-list polygon type for every region the engine builds. Vertices are
//!   kept in counterclockwise hull order; every constructor runs the hull, so the
//!   convexity invariant holds by construction.
//! - Queries are linear scans over the edges. Polygons here have tens of
//!   vertices at most, so nothing is indexed.
//!
//! Degenerate regions
//! - 0–2 vertex regions exist only as intermediate or empty states. Containment
//!   and intersection queries on them return `false`/empty.
//!
//! Code cross-refs: `util::convex_hull`, `conic::ConicEquation`, `crate::site::BoundedCone`

use super::conic::ConicEquation;
use super::types::{points_equal, GeomCfg, Point, Segment};
use super::util::{centroid, convex_hull, push_unique};

/// Convex polygon in counterclockwise hull order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvexRegion {
    vertices: Vec<Point>,
    edges: Vec<Segment>,
}

fn edges_of(vertices: &[Point]) -> Vec<Segment> {
    match vertices.len() {
        0 | 1 => Vec::new(),
        2 => vec![Segment::new(vertices[0], vertices[1])],
        n => (0..n)
            .map(|i| Segment::new(vertices[i], vertices[(i + 1) % n]))
            .collect(),
    }
}

impl ConvexRegion {
    /// Convex hull of an arbitrary point set.
    pub fn from_points(points: &[Point]) -> Self {
        let vertices = convex_hull(points);
        let edges = edges_of(&vertices);
        Self { vertices, edges }
    }

    /// Insert a vertex and restore hull order.
    pub fn add_vertex(&mut self, p: Point) {
        self.vertices.push(p);
        self.vertices = convex_hull(&self.vertices);
        self.edges = edges_of(&self.vertices);
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[Segment] {
        &self.edges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// At least three hull vertices.
    #[inline]
    pub fn is_polygon(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Even-odd ray casting. Points on the boundary may land on either side.
    pub fn contains(&self, p: Point) -> bool {
        let v = &self.vertices;
        if v.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = v.len() - 1;
        for i in 0..v.len() {
            let (vi, vj) = (v[i], v[j]);
            if (vi.y > p.y) != (vj.y > p.y)
                && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// On some edge or equal to some vertex (within `eps_equal`).
    pub fn on_boundary(&self, p: Point, cfg: &GeomCfg) -> bool {
        self.edges.iter().any(|e| e.contains_point(p, cfg.eps_equal))
            || self
                .vertices
                .iter()
                .any(|v| points_equal(*v, p, cfg.eps_equal))
    }

    /// Inside, or within `eps` of the boundary.
    pub fn contains_eps(&self, p: Point, eps: f64) -> bool {
        self.contains(p) || self.edges.iter().any(|e| e.distance_to(p) <= eps)
    }

    /// Points where the infinite line through `line` meets the boundary.
    ///
    /// Lines through the interior give two points; a line touching a vertex gives one.
    pub fn intersect_with_line(&self, line: &Segment, cfg: &GeomCfg) -> Vec<Point> {
        let mut out = Vec::with_capacity(2);
        for edge in &self.edges {
            if let Some(p) = edge.line_intersection(line, cfg.eps_det) {
                if edge.contains_point(p, cfg.eps_equal) {
                    push_unique(&mut out, p, cfg.eps_dedup);
                }
            }
        }
        out
    }

    /// Pairwise edge crossings with `other`, skipping parallel pairs.
    pub fn intersect_with_polygon(&self, other: &ConvexRegion, cfg: &GeomCfg) -> Vec<Point> {
        let mut out = Vec::new();
        for e1 in &self.edges {
            for e2 in &other.edges {
                if e1.is_parallel(e2, cfg.eps_parallel) {
                    continue;
                }
                if let Some(p) = e1.segment_intersection(e2, cfg) {
                    push_unique(&mut out, p, cfg.eps_equal);
                }
            }
        }
        out
    }

    /// The intersection region, or `None` if it has fewer than three hull vertices.
    pub fn create_polygon_intersection(
        &self,
        other: &ConvexRegion,
        cfg: &GeomCfg,
    ) -> Option<ConvexRegion> {
        if !self.is_polygon() || !other.is_polygon() {
            return None;
        }
        let mut pts = self.intersect_with_polygon(other, cfg);
        for v in &self.vertices {
            if other.contains(*v) || other.on_boundary(*v, cfg) {
                push_unique(&mut pts, *v, cfg.eps_equal);
            }
        }
        for v in &other.vertices {
            if self.contains(*v) || self.on_boundary(*v, cfg) {
                push_unique(&mut pts, *v, cfg.eps_equal);
            }
        }
        let region = ConvexRegion::from_points(&pts);
        if region.is_polygon() {
            Some(region)
        } else {
            None
        }
    }

    /// Points where the conic crosses the boundary.
    ///
    /// Each edge `start + t (end − start)` is substituted into the conic and the
    /// resulting quadratic solved for `t ∈ [−eps_param, 1 + eps_param]`.
    pub fn intersect_with_conic(&self, eq: &ConicEquation, cfg: &GeomCfg) -> Vec<Point> {
        let mut out = Vec::new();
        if !self.is_polygon() {
            return out;
        }
        for edge in &self.edges {
            let dir = edge.direction();
            for t in eq.line_params(edge.start, dir) {
                if t >= -cfg.eps_param && t <= 1.0 + cfg.eps_param {
                    let t = t.clamp(0.0, 1.0);
                    push_unique(&mut out, edge.start + dir * t, cfg.eps_dedup);
                }
            }
        }
        out
    }

    /// First edge containing `p`.
    pub fn find_segment(&self, p: Point, cfg: &GeomCfg) -> Option<Segment> {
        self.edges
            .iter()
            .find(|e| e.contains_point(p, cfg.eps_equal))
            .copied()
    }

    /// Whether two edges are parallel.
    #[inline]
    pub fn are_parallel(e1: &Segment, e2: &Segment, cfg: &GeomCfg) -> bool {
        e1.is_parallel(e2, cfg.eps_parallel)
    }

    /// Whether any edge of `self` is parallel to any edge of `other`.
    pub fn any_edges_parallel(&self, other: &ConvexRegion, cfg: &GeomCfg) -> bool {
        self.edges
            .iter()
            .any(|e1| other.edges.iter().any(|e2| Self::are_parallel(e1, e2, cfg)))
    }

    /// Vertex average.
    pub fn centroid(&self) -> Option<Point> {
        centroid(&self.vertices)
    }

    /// Shoelace area (non-negative for hull order).
    pub fn area(&self) -> f64 {
        let v = &self.vertices;
        if v.len() < 3 {
            return 0.0;
        }
        let mut s = 0.0;
        for i in 0..v.len() {
            let (p, q) = (v[i], v[(i + 1) % v.len()]);
            s += p.x * q.y - q.x * p.y;
        }
        0.5 * s
    }

    /// Polar dual about `center`: for every edge half-plane `n·(x − center) ≤ c`
    /// (unit outward `n`), the dual vertex `center + n / c`.
    ///
    /// `None` unless `center` is strictly inside.
    pub fn polar(&self, center: Point) -> Option<ConvexRegion> {
        if !self.is_polygon() {
            return None;
        }
        let mut pts = Vec::with_capacity(self.edges.len());
        for e in &self.edges {
            let d = e.direction();
            let len = d.norm();
            if len == 0.0 {
                continue;
            }
            let n = Point::new(d.y, -d.x) / len;
            let c = n.dot(&(e.start - center));
            if !(c > 0.0) || !c.is_finite() {
                return None;
            }
            pts.push(center + n / c);
        }
        let dual = ConvexRegion::from_points(&pts);
        dual.is_polygon().then_some(dual)
    }

    /// Axis-aligned bounding box `(min, max)`.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}
