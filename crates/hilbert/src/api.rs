//! Curated internal API (UNSTABLE).
//!
//! One flat surface over the modules, used by the CLI and benches. Not a public
//! API; breaking changes are allowed.

// Planar primitives and regions
pub use crate::geom2::{
    centroid, convex_hull, orient, points_equal, solve_quadratic, ConicEquation, ConicKind,
    ConvexRegion, EllipseParams, GeomCfg, Point, Segment,
};
// Random regions
pub use crate::geom2::rand::{
    draw_region_radial, recenter_rescale, sample_interior, RadialCfg, ReplayToken as RegionReplay,
    VertexCount,
};
// Sites and metric
pub use crate::distance::{chord_endpoints, hilbert_distance, hilbert_midpoint, point_on_spoke};
pub use crate::error::{HilbertError, HilbertResult};
pub use crate::site::{BoundedCone, PartialSpoke, Site, Spoke};
// Balls
pub use crate::ball::HilbertBall;
pub use crate::meb::{
    minimum_enclosing_ball, minimum_enclosing_ball_seeded, EnclosingBall, MebCfg, Support,
};
pub use crate::pimap::{pi_field, PiField, PiFieldCfg};
// Bisectors and circumcenters
pub use crate::bisector::{
    bisector_of, middle_sector, omega_edges, trace_bisector, Bisector, BisectorPiece, ConePair,
    MiddleSector, PieceKind, PieceSamples, TraceCfg,
};
pub use crate::circumcenter::{find_circumcenter, find_circumcenter_seeded, CircumCfg};

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn flat_surface_composes() {
        let cfg = GeomCfg::default();
        let omega = draw_region_radial(RadialCfg::default(), RegionReplay { seed: 1, index: 0 })
            .expect("region");
        let c = omega.centroid().expect("centroid");
        let d = hilbert_distance(c, c + vector![0.01, 0.0], &omega, &cfg).unwrap();
        assert!(d > 0.0);
        let ball = HilbertBall::around(c, d, &omega, &cfg).unwrap();
        assert!(ball.encloses(c + vector![0.01, 0.0], &omega, &cfg, 1e-9).unwrap());
    }
}
