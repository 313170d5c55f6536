//! Hilbert balls.
//!
//! In a polygonal domain the ball of radius `r` around `c` is itself a polygon: its
//! vertices are the points at distance `r` from `c` along every partial spoke,
//! and between consecutive spokes the sphere is straight.

use crate::distance::{hilbert_distance, point_on_spoke};
use crate::error::HilbertResult;
use crate::geom2::{ConvexRegion, GeomCfg, Point};
use crate::site::Site;

#[derive(Clone, Debug)]
pub struct HilbertBall {
    site: Site,
    radius: f64,
    boundary: ConvexRegion,
}

impl HilbertBall {
    /// Ball of `radius` (clamped at 0) around an existing site.
    pub fn new(site: Site, radius: f64) -> Self {
        let radius = radius.max(0.0);
        let boundary = if radius == 0.0 {
            ConvexRegion::from_points(&[site.point()])
        } else {
            let pts: Vec<Point> = site
                .spokes()
                .iter()
                .flat_map(|s| {
                    [
                        point_on_spoke(s.a, s.c, s.d, radius),
                        point_on_spoke(s.d, s.c, s.a, radius),
                    ]
                })
                .collect();
            ConvexRegion::from_points(&pts)
        };
        Self {
            site,
            radius,
            boundary,
        }
    }

    /// Build the site and the ball in one go.
    pub fn around(center: Point, radius: f64, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<Self> {
        Ok(Self::new(Site::new(center, omega, cfg)?, radius))
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.site.point()
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn site(&self) -> &Site {
        &self.site
    }

    #[inline]
    pub fn boundary(&self) -> &ConvexRegion {
        &self.boundary
    }

    /// Hilbert lengths of the boundary edges, in boundary order.
    pub fn side_lengths(&self, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<Vec<f64>> {
        if !self.boundary.is_polygon() {
            return Ok(Vec::new());
        }
        self.boundary
            .edges()
            .iter()
            .map(|e| hilbert_distance(e.start, e.end, omega, cfg))
            .collect()
    }

    /// Hilbert perimeter (0 for a degenerate ball).
    pub fn perimeter(&self, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<f64> {
        Ok(self.side_lengths(omega, cfg)?.iter().sum())
    }

    pub fn max_side_length(&self, omega: &ConvexRegion, cfg: &GeomCfg) -> HilbertResult<f64> {
        Ok(self
            .side_lengths(omega, cfg)?
            .into_iter()
            .fold(0.0, f64::max))
    }

    /// Polar dual of the boundary polygon about the center.
    pub fn polar_body(&self) -> Option<ConvexRegion> {
        self.boundary.polar(self.center())
    }

    /// `d(center, p) ≤ radius + eps`.
    pub fn encloses(&self, p: Point, omega: &ConvexRegion, cfg: &GeomCfg, eps: f64) -> HilbertResult<bool> {
        Ok(hilbert_distance(self.center(), p, omega, cfg)? <= self.radius + eps)
    }

    pub fn boundary_contains(&self, p: Point, cfg: &GeomCfg) -> bool {
        self.boundary.on_boundary(p, cfg)
    }
}
