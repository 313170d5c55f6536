use thiserror::Error;

/// Failures of Hilbert-geometry constructions.
///
/// Lookups that may legitimately find nothing (cone of a point, circumcenter,
/// polygon intersection) return `Option` instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HilbertError {
    #[error("region needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("line meets the boundary in fewer than two points")]
    TangentLine,

    #[error("point is not strictly inside the region")]
    NotInterior,

    #[error("sites lie on a common spoke; the middle sector is degenerate")]
    CollinearSites,

    #[error("sector is empty or degenerate")]
    EmptySector,

    #[error("expected {expected} conic/boundary intersections, found {found}")]
    MissingIntersection { expected: usize, found: usize },

    #[error("conic has no finite center")]
    NoConicCenter,
}

pub type HilbertResult<T> = Result<T, HilbertError>;
