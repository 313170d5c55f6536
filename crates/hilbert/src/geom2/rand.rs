//! Random convex domains and interior points (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic sampler for the domains Ω used by property tests, benches and
//!   the CLI `--random` switch. Reproducible from a `(seed, index)` token.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, take the convex hull, then recenter/scale as requested.
//! - Interior points are random convex combinations of the vertices, pulled
//!   toward the area centroid so they stay off the boundary.
//!
//! Code cross-refs: `ConvexRegion`, `util::convex_hull`

use super::region::ConvexRegion;
use super::types::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub random_phase: bool,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Uniform { min: 4, max: 9 },
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    /// Independent `StdRng` per token.
    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random convex domain around the origin.
///
/// `None` only if the hull degenerates (fewer than three vertices).
pub fn draw_region_radial(cfg: RadialCfg, tok: ReplayToken) -> Option<ConvexRegion> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let pts: Vec<Point> = (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            Point::new(th.cos() * r, th.sin() * r)
        })
        .collect();
    let region = ConvexRegion::from_points(&pts);
    region.is_polygon().then_some(region)
}

/// Translate the area centroid to `center` and scale so the farthest vertex
/// sits at `r_out` from it.
pub fn recenter_rescale(region: &ConvexRegion, center: Point, r_out: f64) -> Option<ConvexRegion> {
    let c = area_centroid(region.vertices())?;
    let r0 = region
        .vertices()
        .iter()
        .map(|p| (p - c).norm())
        .fold(0.0, f64::max);
    if !(r0 > 0.0) || !(r_out > 0.0) {
        return None;
    }
    let s = r_out / r0;
    let pts: Vec<Point> = region
        .vertices()
        .iter()
        .map(|p| center + (p - c) * s)
        .collect();
    Some(ConvexRegion::from_points(&pts))
}

/// Random point strictly inside `region`.
///
/// Convex combination of the vertices with weights `u_i + 0.05`, then shrunk
/// toward the area centroid by `1 − margin` (`margin` clamped to [0, 0.9]).
pub fn sample_interior<R: Rng>(region: &ConvexRegion, margin: f64, rng: &mut R) -> Option<Point> {
    let v = region.vertices();
    let c = area_centroid(v)?;
    let w: Vec<f64> = v.iter().map(|_| rng.gen::<f64>() + 0.05).collect();
    let total: f64 = w.iter().sum();
    let p = v
        .iter()
        .zip(&w)
        .fold(Point::zeros(), |acc, (q, wi)| acc + q * (*wi / total));
    let shrink = 1.0 - margin.clamp(0.0, 0.9);
    Some(c + (p - c) * shrink)
}

/// Area centroid of a counterclockwise polygon.
pub fn area_centroid(verts: &[Point]) -> Option<Point> {
    if verts.len() < 3 {
        return None;
    }
    let mut a: f64 = 0.0;
    let mut cx: f64 = 0.0;
    let mut cy: f64 = 0.0;
    for i in 0..verts.len() {
        let p = verts[i];
        let q = verts[(i + 1) % verts.len()];
        let cross = p.x * q.y - q.x * p.y;
        a += cross;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    a *= 0.5;
    if a.abs() < 1e-18 {
        return None;
    }
    Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
}
