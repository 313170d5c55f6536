//! Data types for bisector pieces and the tracing state.

use crate::geom2::{ConicEquation, ConvexRegion, Point};

/// How a piece is drawn and sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    /// Chord through the middle sector (the conic there is a line pair).
    Middle,
    /// Straight piece: the sector conic degenerates to lines.
    Line,
    /// Proper conic arc.
    Conic,
}

/// One maximal arc of the bisector inside one sector.
#[derive(Clone, Debug)]
pub struct BisectorPiece {
    pub start: Point,
    pub end: Point,
    pub equation: ConicEquation,
    pub sector: ConvexRegion,
    pub kind: PieceKind,
}

impl BisectorPiece {
    #[inline]
    pub fn is_straight(&self) -> bool {
        !matches!(self.kind, PieceKind::Conic)
    }

    /// Same arc walked from `end` to `start`.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            ..self.clone()
        }
    }
}

/// Indices of the bounded cones (one per site) whose intersection is the
/// current sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConePair {
    pub c1: usize,
    pub c2: usize,
}

/// Intersection of the cone of `s1` containing `s2` with the cone of `s2`
/// containing `s1`, the conic there and its two boundary crossings.
#[derive(Clone, Debug)]
pub struct MiddleSector {
    pub sector: ConvexRegion,
    pub equation: ConicEquation,
    pub endpoints: [Point; 2],
    pub cones: ConePair,
}

/// Tracing configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceCfg {
    /// Per-direction piece budget; `None` means `4·n + 8` for an `n`-gon.
    pub max_pieces: Option<usize>,
}

impl TraceCfg {
    #[inline]
    pub fn piece_budget(&self, n_vertices: usize) -> usize {
        self.max_pieces.unwrap_or(4 * n_vertices + 8)
    }
}

/// Bisector of two sites: the middle piece plus the pieces traced outward from
/// each middle endpoint (`dir1` from `endpoints[0]`, `dir2` from `endpoints[1]`).
#[derive(Clone, Debug)]
pub struct Bisector {
    pub s1: Point,
    pub s2: Point,
    pub middle: MiddleSector,
    pub middle_piece: BisectorPiece,
    pub dir1: Vec<BisectorPiece>,
    pub dir2: Vec<BisectorPiece>,
}

impl Bisector {
    /// Middle piece first, then direction 1, then direction 2.
    pub fn pieces(&self) -> impl Iterator<Item = &BisectorPiece> {
        std::iter::once(&self.middle_piece)
            .chain(self.dir1.iter())
            .chain(self.dir2.iter())
    }

    #[inline]
    pub fn piece_count(&self) -> usize {
        1 + self.dir1.len() + self.dir2.len()
    }

    /// Outer ends of the traced bisector (`dir1` end, `dir2` end).
    pub fn ends(&self) -> (Point, Point) {
        let a = self.dir1.last().map_or(self.middle_piece.start, |p| p.end);
        let b = self.dir2.last().map_or(self.middle_piece.end, |p| p.end);
        (a, b)
    }
}
