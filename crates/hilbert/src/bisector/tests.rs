use super::*;
use crate::distance::hilbert_distance;
use crate::error::HilbertError;
use crate::geom2::rand::{draw_region_radial, sample_interior, RadialCfg, ReplayToken};
use crate::geom2::{ConicEquation, ConvexRegion, GeomCfg, Point};
use crate::site::Site;
use nalgebra::vector;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn unit_square() -> ConvexRegion {
    ConvexRegion::from_points(&[
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ])
}

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
fn omega_edges_orders_behind_then_beyond() {
    let cfg = GeomCfg::default();
    let sq = unit_square();
    let (behind, beyond) = omega_edges(vector![0.25, 0.5], vector![0.75, 0.5], &sq, &cfg).unwrap();
    assert!(behind.contains_point(vector![0.0, 0.5], 1e-12));
    assert!(beyond.contains_point(vector![1.0, 0.5], 1e-12));
}

#[test]
fn symmetric_sites_in_square_bisect_along_midline() {
    let cfg = GeomCfg::default();
    let sq = unit_square();
    let b = bisector_of(vector![0.25, 0.5], vector![0.75, 0.5], &sq, &cfg, TraceCfg::default()).unwrap();

    let mut ends = b.middle.endpoints;
    ends.sort_by(|p, q| p.y.total_cmp(&q.y));
    assert!((ends[0] - vector![0.5, 1.0 / 3.0]).norm() < 1e-9);
    assert!((ends[1] - vector![0.5, 2.0 / 3.0]).norm() < 1e-9);
    assert_eq!(b.middle_piece.kind, PieceKind::Middle);

    // one straight piece per direction, ending on the square
    assert_eq!(b.dir1.len(), 1);
    assert_eq!(b.dir2.len(), 1);
    let (a, z) = b.ends();
    let mut outer = [a, z];
    outer.sort_by(|p, q| p.y.total_cmp(&q.y));
    assert!((outer[0] - vector![0.5, 0.0]).norm() < 1e-9);
    assert!((outer[1] - vector![0.5, 1.0]).norm() < 1e-9);
    for piece in b.pieces() {
        assert!(piece.is_straight());
    }
    for p in b.polyline(0.05) {
        assert!((p.x - 0.5).abs() < 1e-9);
    }
}

#[test]
fn collinear_or_equal_sites_are_rejected() {
    let cfg = GeomCfg::default();
    let sq = unit_square();
    let s1 = Site::new(vector![0.5, 0.5], &sq, &cfg).unwrap();
    let on_diagonal = Site::new(vector![0.25, 0.25], &sq, &cfg).unwrap();
    let r = trace_bisector(&s1, &on_diagonal, &sq, &cfg, TraceCfg::default());
    assert!(matches!(r, Err(HilbertError::CollinearSites)));
    let same = trace_bisector(&s1, &s1, &sq, &cfg, TraceCfg::default());
    assert!(matches!(same, Err(HilbertError::CollinearSites)));
}

#[test]
fn piece_budget_limits_tracing() {
    let cfg = GeomCfg::default();
    let sq = unit_square();
    let tcfg = TraceCfg { max_pieces: Some(0) };
    let b = bisector_of(vector![0.25, 0.5], vector![0.75, 0.5], &sq, &cfg, tcfg).unwrap();
    assert!(b.dir1.is_empty() && b.dir2.is_empty());
    assert_eq!(b.piece_count(), 1);
    assert_eq!(tcfg.piece_budget(4), 0);
    assert_eq!(TraceCfg::default().piece_budget(5), 28);
}

#[test]
fn samples_are_ordered_and_restartable() {
    let cfg = GeomCfg::default();
    let b = bisector_of(
        vector![-0.2, 0.1],
        vector![0.3, -0.25],
        &pentagon(),
        &cfg,
        TraceCfg::default(),
    )
    .unwrap();
    for piece in b.pieces() {
        let it = piece.sample(0.01);
        let n = it.len();
        let pts: Vec<Point> = it.collect();
        assert_eq!(pts.len(), n);
        assert!(pts.len() >= 2);
        assert_eq!(pts[0], piece.start);
        assert_eq!(pts[pts.len() - 1], piece.end);
        let again: Vec<Point> = piece.sample(0.01).collect();
        assert_eq!(pts, again);
        // degenerate resolution: endpoints only
        assert_eq!(piece.sample(0.0).count(), 2);
    }
    let all = b.points(0.01);
    let per_piece: usize = b.pieces().map(|p| p.sample(0.01).len()).sum();
    assert_eq!(all.len(), per_piece);
}

#[test]
fn sampled_points_are_equidistant() {
    let cfg = GeomCfg::default();
    let mut rng = StdRng::seed_from_u64(77);
    let mut traced = 0;
    for index in 0..12 {
        let omega = draw_region_radial(RadialCfg::default(), ReplayToken { seed: 19, index }).unwrap();
        let p1 = sample_interior(&omega, 0.2, &mut rng).unwrap();
        let p2 = sample_interior(&omega, 0.2, &mut rng).unwrap();
        let b = match bisector_of(p1, p2, &omega, &cfg, TraceCfg::default()) {
            Ok(b) => b,
            Err(HilbertError::CollinearSites) => continue,
            Err(e) => panic!("unexpected error {e}"),
        };
        traced += 1;
        for p in b.points(0.02) {
            if !omega.contains(p) || omega.on_boundary(p, &cfg) {
                continue;
            }
            let d1 = hilbert_distance(p, p1, &omega, &cfg).unwrap();
            let d2 = hilbert_distance(p, p2, &omega, &cfg).unwrap();
            assert!(
                (d1 - d2).abs() < 1e-6 * (1.0 + d1),
                "domain {index}: d1={d1} d2={d2} at {p:?}"
            );
        }
    }
    assert!(traced >= 10);
}

#[test]
fn bisector_reaches_the_boundary_in_a_pentagon() {
    let cfg = GeomCfg::default();
    let omega = pentagon();
    let b = bisector_of(
        vector![-0.2, 0.1],
        vector![0.3, -0.25],
        &omega,
        &cfg,
        TraceCfg::default(),
    )
    .unwrap();
    let (a, z) = b.ends();
    assert!(omega.on_boundary(a, &cfg));
    assert!(omega.on_boundary(z, &cfg));
    let line = b.polyline(0.01);
    assert_eq!(line.first().copied(), Some(a));
    assert_eq!(line.last().copied(), Some(z));
}

#[test]
fn line_pieces_stay_on_the_bisector() {
    // both sites see the top (and bottom) edge beyond them: the sector conics
    // split off the edge line and the pieces are straight
    let cfg = GeomCfg::default();
    let sq = unit_square();
    let (p1, p2) = (vector![0.1, 0.5], vector![0.9, 0.52]);
    let b = bisector_of(p1, p2, &sq, &cfg, TraceCfg::default()).unwrap();
    assert!(b.pieces().any(|p| p.kind == PieceKind::Line));
    let (a, z) = b.ends();
    assert!(sq.on_boundary(a, &cfg));
    assert!(sq.on_boundary(z, &cfg));
    for piece in b.pieces() {
        for p in piece.sample(0.005) {
            if !sq.contains(p) || sq.on_boundary(p, &cfg) {
                continue;
            }
            let d1 = hilbert_distance(p, p1, &sq, &cfg).unwrap();
            let d2 = hilbert_distance(p, p2, &sq, &cfg).unwrap();
            assert!(
                (d1 - d2).abs() < 1e-6 * (1.0 + d1),
                "{:?} piece: d1={d1} d2={d2} at {p:?}",
                piece.kind
            );
        }
    }
}

#[test]
fn asymptote_fallback_is_a_line_piece() {
    let cfg = GeomCfg::default();
    // (x - 1)(y - 2) = 1, center (1, 2)
    let hyp = ConicEquation::new(0.0, 1.0, 0.0, -2.0, -1.0, 1.0);
    let sector = ConvexRegion::from_points(&[
        vector![0.0, 1.0],
        vector![2.0, 1.0],
        vector![2.0, 3.0],
        vector![0.0, 3.0],
    ]);
    let piece = super::trace::center_piece(vector![0.5, 1.0], hyp, sector.clone(), &cfg)
        .unwrap()
        .unwrap();
    assert_eq!(piece.kind, PieceKind::Line);
    assert!((piece.end - vector![1.0, 2.0]).norm() < 1e-12);
    let far = ConvexRegion::from_points(&[vector![3.0, 3.0], vector![4.0, 3.0], vector![4.0, 4.0]]);
    assert!(super::trace::center_piece(vector![3.5, 3.0], hyp, far, &cfg).unwrap().is_none());
    let parallel = ConicEquation::new(1.0, 0.0, 0.0, 0.0, 0.0, -1.0);
    assert_eq!(
        super::trace::center_piece(vector![0.5, 1.0], parallel, sector, &cfg).unwrap_err(),
        HilbertError::NoConicCenter
    );
}
