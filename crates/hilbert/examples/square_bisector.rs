//! Bisector timing probe in the unit square and a random 12-gon.
//!
//! Purpose
//! - Reproducible data point for "how many pieces, and how long, for one
//!   bisector trace?" in a symmetric and a generic domain.
//!
//! Code: crates/hilbert/src/bisector/trace.rs::trace_bisector

use std::time::Instant;

use hilbert::api::{
    bisector_of, draw_region_radial, hilbert_distance, ConvexRegion, GeomCfg, Point, RadialCfg,
    RegionReplay, TraceCfg, VertexCount,
};

fn probe(label: &str, omega: &ConvexRegion, p1: Point, p2: Point) {
    let cfg = GeomCfg::default();
    let start = Instant::now();
    let bis = bisector_of(p1, p2, omega, &cfg, TraceCfg::default()).expect("bisector");
    let elapsed = start.elapsed().as_secs_f64() * 1e3;
    let line = bis.polyline(0.01);
    let worst = line
        .iter()
        .filter(|p| omega.contains(**p) && !omega.on_boundary(**p, &cfg))
        .filter_map(|p| {
            let d1 = hilbert_distance(*p, p1, omega, &cfg).ok()?;
            let d2 = hilbert_distance(*p, p2, omega, &cfg).ok()?;
            Some((d1 - d2).abs())
        })
        .fold(0.0, f64::max);
    println!(
        "domain={label} vertices={} pieces={} samples={}",
        omega.len(),
        bis.piece_count(),
        line.len()
    );
    println!("max_equidistance_error={worst:.3e}");
    println!("trace_time_ms={elapsed:.3}");
}

fn main() {
    let square = ConvexRegion::from_points(&[
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ]);
    probe("unit_square", &square, Point::new(0.25, 0.5), Point::new(0.75, 0.5));

    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(12),
        ..RadialCfg::default()
    };
    let gon = draw_region_radial(cfg, RegionReplay { seed: 3, index: 0 }).expect("region");
    probe("random_12gon", &gon, Point::new(-0.3, 0.1), Point::new(0.25, -0.2));
}
