//! Pi field: the ball-perimeter ratio `perimeter / (2 r)` sampled over Ω.
//!
//! Each grid point strictly inside Ω gets the Hilbert ball of a fixed radius;
//! the ratio and the Hilbert length of the ball's first side are recorded.
//! Cells where the ball fails, or the ratio drops below 3, are filled from the
//! nearest valid 8-neighbour.

use nalgebra::Vector2;
use tracing::debug;

use crate::ball::HilbertBall;
use crate::distance::hilbert_distance;
use crate::error::HilbertResult;
use crate::geom2::{ConvexRegion, GeomCfg, Point};

#[derive(Clone, Copy, Debug)]
pub struct PiFieldCfg {
    /// Grid spacing.
    pub resolution: f64,
    /// Hilbert radius of the probe balls.
    pub radius: f64,
}

impl Default for PiFieldCfg {
    fn default() -> Self {
        Self {
            resolution: 0.05,
            radius: 1.0,
        }
    }
}

/// Row-major grid; cell `(x, y)` sits at `origin + resolution·(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PiField {
    pub origin: Point,
    pub resolution: f64,
    pub width: usize,
    pub height: usize,
    pub pi: Vec<Option<f64>>,
    pub side: Vec<Option<f64>>,
}

enum Cell {
    Outside,
    Failed,
    Value { pi: f64, side: f64 },
}

/// Evaluate the pi field over the bounding box of Ω grown by one cell.
/// Empty field when Ω is not a polygon or the resolution is not positive.
pub fn pi_field(omega: &ConvexRegion, cfg: &GeomCfg, pcfg: &PiFieldCfg) -> PiField {
    let res = pcfg.resolution;
    let Some((lo, hi)) = omega.bounding_box().filter(|_| omega.is_polygon() && res > 0.0) else {
        return PiField {
            origin: Point::zeros(),
            resolution: res,
            width: 0,
            height: 0,
            pi: Vec::new(),
            side: Vec::new(),
        };
    };
    let origin = lo - Vector2::new(res, res);
    let span = hi - lo + Vector2::new(2.0 * res, 2.0 * res);
    let width = (span.x / res).ceil() as usize;
    let height = (span.y / res).ceil() as usize;

    let cells: Vec<Cell> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let p = origin + Vector2::new(x as f64 * res, y as f64 * res);
            if !omega.contains(p) || omega.on_boundary(p, cfg) {
                return Cell::Outside;
            }
            match probe(p, omega, cfg, pcfg.radius) {
                Ok((pi, side)) if pi >= 3.0 => Cell::Value { pi, side },
                Ok((pi, _)) => {
                    debug!(x = p.x, y = p.y, pi, "pi below 3; filling");
                    Cell::Failed
                }
                Err(err) => {
                    debug!(x = p.x, y = p.y, %err, "probe ball failed; filling");
                    Cell::Failed
                }
            }
        })
        .collect();

    let mut pi = vec![None; cells.len()];
    let mut side = vec![None; cells.len()];
    for (i, c) in cells.iter().enumerate() {
        if let Cell::Value { pi: v, side: s } = c {
            pi[i] = Some(*v);
            side[i] = Some(*s);
        }
    }
    let valid = pi.clone();
    let valid_side = side.clone();
    for (i, c) in cells.iter().enumerate() {
        if matches!(c, Cell::Failed) {
            if let Some(j) = nearest_valid(&valid, width, height, i) {
                pi[i] = valid[j];
                side[i] = valid_side[j];
            }
        }
    }
    PiField {
        origin,
        resolution: res,
        width,
        height,
        pi,
        side,
    }
}

fn probe(p: Point, omega: &ConvexRegion, cfg: &GeomCfg, radius: f64) -> HilbertResult<(f64, f64)> {
    let ball = HilbertBall::around(p, radius, omega, cfg)?;
    let per = ball.perimeter(omega, cfg)?;
    let side = match ball.boundary().edges().first() {
        Some(e) => hilbert_distance(e.start, e.end, omega, cfg)?,
        None => 0.0,
    };
    Ok((per / (2.0 * radius), side))
}

/// Valid 8-neighbour of cell `i`, edge neighbours before diagonals.
fn nearest_valid(vals: &[Option<f64>], width: usize, height: usize, i: usize) -> Option<usize> {
    const DIRS: [(isize, isize); 8] = [(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 1), (1, -1), (1, 1)];
    let (x, y) = ((i % width) as isize, (i / width) as isize);
    DIRS.iter().find_map(|(dx, dy)| {
        let (nx, ny) = (x + dx, y + dy);
        if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
            return None;
        }
        let j = ny as usize * width + nx as usize;
        vals[j].map(|_| j)
    })
}

impl PiField {
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    pub fn point(&self, x: usize, y: usize) -> Point {
        self.origin + Vector2::new(x as f64 * self.resolution, y as f64 * self.resolution)
    }

    pub fn pi_at(&self, x: usize, y: usize) -> Option<f64> {
        self.index(x, y).and_then(|i| self.pi[i])
    }

    pub fn side_at(&self, x: usize, y: usize) -> Option<f64> {
        self.index(x, y).and_then(|i| self.side[i])
    }

    /// `(min, max)` over defined cells.
    pub fn pi_range(&self) -> Option<(f64, f64)> {
        self.pi.iter().flatten().fold(None, |acc, v| match acc {
            None => Some((*v, *v)),
            Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
        })
    }

    /// Central-difference gradient of pi, normalized to unit length (zero
    /// gradients stay zero). `None` on the grid rim and wherever a neighbour
    /// is undefined.
    pub fn gradient(&self) -> Vec<Option<Vector2<f64>>> {
        let mut out = vec![None; self.pi.len()];
        if self.width < 3 || self.height < 3 {
            return out;
        }
        let h2 = 2.0 * self.resolution;
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let (Some(l), Some(r), Some(d), Some(u)) = (
                    self.pi_at(x - 1, y),
                    self.pi_at(x + 1, y),
                    self.pi_at(x, y - 1),
                    self.pi_at(x, y + 1),
                ) else {
                    continue;
                };
                let g = Vector2::new((r - l) / h2, (u - d) / h2);
                let n = g.norm();
                out[y * self.width + x] = Some(if n > 0.0 { g / n } else { g });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn centered_square() -> ConvexRegion {
        ConvexRegion::from_points(&[
            vector![-1.0, -1.0],
            vector![1.0, -1.0],
            vector![1.0, 1.0],
            vector![-1.0, 1.0],
        ])
    }

    #[test]
    fn square_center_has_pi_four() {
        // ball around the center is the square with corners (±tanh r, ±tanh r)
        let cfg = GeomCfg::default();
        let (pi, side) = probe(vector![0.0, 0.0], &centered_square(), &cfg, 0.5).unwrap();
        assert!((pi - 4.0).abs() < 1e-9, "{pi}");
        assert!((side - 1.0).abs() < 1e-9, "{side}");
    }

    #[test]
    fn field_covers_interior_only() {
        let cfg = GeomCfg::default();
        let omega = centered_square();
        let pcfg = PiFieldCfg {
            resolution: 0.25,
            radius: 0.3,
        };
        let field = pi_field(&omega, &cfg, &pcfg);
        assert_eq!(field.width, 10);
        assert_eq!(field.height, 10);
        assert_eq!(field.pi.len(), 100);
        let mut defined = 0;
        for y in 0..field.height {
            for x in 0..field.width {
                let p = field.point(x, y);
                let inside = omega.contains(p) && !omega.on_boundary(p, &cfg);
                match field.pi_at(x, y) {
                    Some(v) => {
                        assert!(inside);
                        assert!(v >= 3.0);
                        defined += 1;
                    }
                    None => assert!(!inside || field.side_at(x, y).is_none()),
                }
            }
        }
        assert!(defined > 0);
        let (lo, hi) = field.pi_range().unwrap();
        assert!(lo >= 3.0 && hi >= lo);
        // the center cell (x = y = 5 -> (0.0, 0.0)) is pi = 4
        assert!((field.pi_at(5, 5).unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn gradient_is_unit_or_zero() {
        let cfg = GeomCfg::default();
        let omega = ConvexRegion::from_points(&[
            vector![0.0, 0.0],
            vector![2.0, 0.0],
            vector![1.5, 1.5],
            vector![0.0, 1.0],
        ]);
        let field = pi_field(
            &omega,
            &cfg,
            &PiFieldCfg {
                resolution: 0.2,
                radius: 0.4,
            },
        );
        let grad = field.gradient();
        assert_eq!(grad.len(), field.pi.len());
        for g in grad.into_iter().flatten() {
            let n = g.norm();
            assert!(n == 0.0 || (n - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_inputs_give_empty_fields() {
        let cfg = GeomCfg::default();
        let bad = pi_field(&centered_square(), &cfg, &PiFieldCfg { resolution: 0.0, radius: 1.0 });
        assert_eq!(bad.width * bad.height, 0);
        let seg = ConvexRegion::from_points(&[vector![0.0, 0.0], vector![1.0, 0.0]]);
        assert!(pi_field(&seg, &cfg, &PiFieldCfg::default()).pi.is_empty());
        assert!(bad.gradient().is_empty());
    }
}
