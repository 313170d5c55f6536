//! Hilbert-metric geometry inside convex polygons.
//!
//! Distances, balls, bisectors (traced as chains of conic arcs), circumcenters,
//! minimum enclosing balls and the pi field, all relative to a convex polygon Ω.
//!
//! Cross-refs live in doc comments; the bisector construction follows
//! arXiv:2112.03056.
//!
//! API Policy
//! - Internal to this workspace. Breaking changes are fine when they improve
//!   the design; the CLI is the only downstream caller.

pub mod api;
pub mod ball;
pub mod bisector;
pub mod circumcenter;
pub mod distance;
pub mod error;
pub mod geom2;
pub mod meb;
pub mod pimap;
pub mod site;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{HilbertError, HilbertResult};
pub use geom2::{ConvexRegion, GeomCfg, Point};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::ball::HilbertBall;
    pub use crate::bisector::{bisector_of, Bisector, BisectorPiece, PieceKind, TraceCfg};
    pub use crate::distance::hilbert_distance;
    pub use crate::error::{HilbertError, HilbertResult};
    pub use crate::geom2::rand::{draw_region_radial, RadialCfg, ReplayToken, VertexCount};
    pub use crate::geom2::{ConvexRegion, GeomCfg, Point, Segment};
    pub use crate::site::Site;
    pub use nalgebra::Vector2 as Vec2;
}
