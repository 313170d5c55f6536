//! Sampling bisector pieces into ordered point sequences.
//!
//! The middle piece is sampled on its chord. Every other piece samples the chord
//! and pushes each sample along the chord normal onto the conic, keeping the
//! root inside the sector that is closest to the chord; without such a root the
//! chord point itself is used. For a `Line` piece the chord lies on one
//! component of the line pair, so the nearest root is the chord point.

use crate::geom2::{points_equal, Point};

use super::types::{Bisector, BisectorPiece, PieceKind};

/// Finite, ordered (start → end) sample iterator over one piece.
/// Calling `sample` again starts over.
#[derive(Clone, Debug)]
pub struct PieceSamples<'a> {
    piece: &'a BisectorPiece,
    steps: usize,
    next: usize,
}

impl BisectorPiece {
    /// Samples spaced at most `resolution` apart along the chord, endpoints included.
    /// A non-positive resolution gives just the two endpoints.
    pub fn sample(&self, resolution: f64) -> PieceSamples<'_> {
        let len = (self.end - self.start).norm();
        let steps = if resolution > 0.0 && resolution.is_finite() {
            ((len / resolution).ceil() as usize).max(1)
        } else {
            1
        };
        PieceSamples {
            piece: self,
            steps,
            next: 0,
        }
    }

    fn point_at(&self, t: f64) -> Point {
        let chord = self.end - self.start;
        let q = self.start + chord * t;
        if self.kind == PieceKind::Middle {
            return q;
        }
        let len = chord.norm();
        if len == 0.0 {
            return q;
        }
        let normal = Point::new(-chord.y, chord.x) / len;
        self.equation
            .line_params(q, normal)
            .into_iter()
            .map(|s| q + normal * s)
            .filter(|p| self.sector.contains_eps(*p, 1e-9 * len.max(1.0)))
            .min_by(|a, b| (a - q).norm().total_cmp(&(b - q).norm()))
            .unwrap_or(q)
    }
}

impl<'a> Iterator for PieceSamples<'a> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next > self.steps {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(if i == 0 {
            self.piece.start
        } else if i == self.steps {
            self.piece.end
        } else {
            self.piece.point_at(i as f64 / self.steps as f64)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps + 1).saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for PieceSamples<'_> {}

impl Bisector {
    /// Samples of every piece, concatenated in `pieces()` order.
    pub fn points(&self, resolution: f64) -> Vec<Point> {
        self.pieces().flat_map(|p| p.sample(resolution)).collect()
    }

    /// One connected polyline from the direction-1 end through the middle piece
    /// to the direction-2 end.
    pub fn polyline(&self, resolution: f64) -> Vec<Point> {
        let mut out: Vec<Point> = Vec::new();
        let mut push = |p: Point| {
            if out.last().map_or(true, |q| !points_equal(*q, p, 1e-12)) {
                out.push(p);
            }
        };
        for piece in self.dir1.iter().rev() {
            piece.reversed().sample(resolution).for_each(&mut push);
        }
        self.middle_piece.sample(resolution).for_each(&mut push);
        for piece in &self.dir2 {
            piece.sample(resolution).for_each(&mut push);
        }
        out
    }
}
