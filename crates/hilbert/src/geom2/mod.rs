//! Planar geometry for convex domains (vertex representation).
//!
//! Purpose
//! - Points, segments, convex regions and conics: everything the Hilbert-metric
//!   constructions (`site`, `distance`, `bisector`, `meb`) are built from.
//! - Numerically explicit: every comparison goes through a `GeomCfg` tolerance.
//!
//! Why vertex lists
//! - Cones, sectors and ball boundaries are all built from points (spoke
//!   endpoints, conic crossings), and the queries (ray casting, edge/conic
//!   crossings) walk edges. A hull pass at construction keeps them convex.
//!
//! Code cross-refs: `ConvexRegion`, `ConicEquation`, `GeomCfg`, `Segment`

pub mod conic;
pub mod rand;
pub mod region;
mod types;
mod util;

pub use conic::{ConicEquation, ConicKind, EllipseParams};
pub use region::ConvexRegion;
pub use types::{points_equal, GeomCfg, Point, Segment};
pub use util::{centroid, convex_hull, orient, solve_quadratic};
pub(crate) use util::push_unique;
