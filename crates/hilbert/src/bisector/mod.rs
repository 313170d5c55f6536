//! Bisectors of two sites in the Hilbert metric: conic pieces traced sector by sector.
//!
//! Purpose
//! - Compute `{ p : d(p, s1) = d(p, s2) }` exactly, as a chain of conic arcs, one
//!   per sector (intersection of a cone of `s1` with a cone of `s2`).
//!
//! Algorithm
//! - The middle sector (cone of `s1` containing `s2` ∩ cone of `s2` containing
//!   `s1`) carries a straight piece. From each of its two endpoints the tracer
//!   crosses into the neighbouring sector (switching the cone of whichever site
//!   owns the spoke the endpoint sits on), rebuilds the sector conic from the
//!   four subtending boundary edges, and walks to the nearest conic/sector
//!   crossing, until it reaches ∂Ω.
//! - A failing step ends that direction only; pieces found so far are kept.
//!
//! References
//! - Bisector conic and sector structure: arXiv:2112.03056
//! - Code cross-refs: `site::{Site, BoundedCone}`, `geom2::ConicEquation`,
//!   `geom2::ConvexRegion::intersect_with_conic`

mod sample;
mod trace;
mod types;

pub use sample::PieceSamples;
pub use trace::{bisector_of, middle_sector, omega_edges, trace_bisector};
pub use types::{Bisector, BisectorPiece, ConePair, MiddleSector, PieceKind, TraceCfg};

#[cfg(test)]
mod tests;
