//! Clip regions
//!
//! A [`ClipRegion`] is either unbounded, an axis-aligned rectangle, or a path.
//! Intersections never lose geometry: a path clip keeps every piece that
//! narrowed it, each with its own fill rule, and the effective area is the
//! intersection of all pieces.

use smallvec::SmallVec;

use crate::geometry::Rect;
use crate::matrix::Matrix;
use crate::path::Path;

/// Rule deciding which areas a path encloses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// One path of a clip, with the fill rule it was introduced with
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPiece {
    pub path: Path,
    pub fill_rule: FillRule,
}

/// Path clip: the intersection of one or more pieces
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPath {
    pieces: SmallVec<[ClipPiece; 2]>,
}

impl ClipPath {
    pub fn new(path: Path, fill_rule: FillRule) -> Self {
        let mut pieces = SmallVec::new();
        pieces.push(ClipPiece { path, fill_rule });
        Self { pieces }
    }

    pub fn pieces(&self) -> &[ClipPiece] {
        &self.pieces
    }

    /// Fill rule of the piece that introduced this path
    pub fn fill_rule(&self) -> FillRule {
        self.pieces
            .first()
            .map(|p| p.fill_rule)
            .unwrap_or_default()
    }

    /// Intersection of the piece bounds
    ///
    /// A piece without points contributes an empty rectangle.
    pub fn bounds(&self) -> Rect {
        self.pieces
            .iter()
            .map(|p| p.path.bounds().unwrap_or(Rect::ZERO))
            .reduce(|acc, b| acc.intersect(&b))
            .unwrap_or(Rect::ZERO)
    }

    fn transform(&self, matrix: &Matrix) -> ClipPath {
        ClipPath {
            pieces: self
                .pieces
                .iter()
                .map(|p| ClipPiece {
                    path: p.path.transform(matrix),
                    fill_rule: p.fill_rule,
                })
                .collect(),
        }
    }

    fn concat(&self, other: &ClipPath) -> ClipPath {
        let mut pieces = self.pieces.clone();
        pieces.extend(other.pieces.iter().cloned());
        ClipPath { pieces }
    }
}

/// Area eligible to receive paint
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ClipRegion {
    /// No clipping
    #[default]
    None,
    Rect(Rect),
    Path(ClipPath),
}

impl From<Rect> for ClipRegion {
    fn from(rect: Rect) -> Self {
        ClipRegion::Rect(rect)
    }
}

impl From<ClipPath> for ClipRegion {
    fn from(path: ClipPath) -> Self {
        ClipRegion::Path(path)
    }
}

impl ClipRegion {
    pub fn path(path: Path, fill_rule: FillRule) -> Self {
        ClipRegion::Path(ClipPath::new(path, fill_rule))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ClipRegion::None)
    }

    /// Intersect two regions
    ///
    /// - `None` is the identity element.
    /// - Two rectangles intersect to a rectangle.
    /// - Anything involving a path yields a path; a rectangle operand becomes a
    ///   piece carrying the fill rule of the path operand.
    pub fn intersect(&self, other: &ClipRegion) -> ClipRegion {
        match (self, other) {
            (ClipRegion::None, r) | (r, ClipRegion::None) => r.clone(),
            (ClipRegion::Rect(a), ClipRegion::Rect(b)) => ClipRegion::Rect(a.intersect(b)),
            (ClipRegion::Rect(r), ClipRegion::Path(p)) => {
                ClipRegion::Path(ClipPath::new(Path::from_rect(r), p.fill_rule()).concat(p))
            }
            (ClipRegion::Path(p), ClipRegion::Rect(r)) => {
                ClipRegion::Path(p.concat(&ClipPath::new(Path::from_rect(r), p.fill_rule())))
            }
            (ClipRegion::Path(a), ClipRegion::Path(b)) => ClipRegion::Path(a.concat(b)),
        }
    }

    /// Map the region into another coordinate space
    ///
    /// Rectangles stay rectangles when the matrix keeps them axis-aligned and
    /// become non-zero path clips otherwise.
    pub fn transform(&self, matrix: &Matrix) -> ClipRegion {
        match self {
            ClipRegion::None => ClipRegion::None,
            ClipRegion::Rect(r) if matrix.is_axis_aligned() => {
                ClipRegion::Rect(matrix.transform_rect(r))
            }
            ClipRegion::Rect(r) => {
                ClipRegion::path(Path::from_rect(r).transform(matrix), FillRule::NonZero)
            }
            ClipRegion::Path(p) => ClipRegion::Path(p.transform(matrix)),
        }
    }

    /// Bounding rectangle of the region, `None` when unclipped
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            ClipRegion::None => None,
            ClipRegion::Rect(r) => Some(*r),
            ClipRegion::Path(p) => Some(p.bounds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathBuilder;

    fn triangle() -> Path {
        PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(40.0, 0.0)
            .line_to(0.0, 40.0)
            .close()
            .build()
    }

    #[test]
    fn test_none_is_identity() {
        let r = ClipRegion::from(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(ClipRegion::None.intersect(&r), r);
        assert_eq!(r.intersect(&ClipRegion::None), r);
        assert_eq!(ClipRegion::None.intersect(&ClipRegion::None), ClipRegion::None);
    }

    #[test]
    fn test_rect_rect_stays_rect() {
        let a = ClipRegion::from(Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = ClipRegion::from(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(
            a.intersect(&b),
            ClipRegion::Rect(Rect::new(50.0, 50.0, 50.0, 50.0))
        );
    }

    #[test]
    fn test_rect_path_becomes_path_with_path_fill_rule() {
        let rect = ClipRegion::from(Rect::new(10.0, 10.0, 100.0, 100.0));
        let path = ClipRegion::path(triangle(), FillRule::EvenOdd);

        for combined in [rect.intersect(&path), path.intersect(&rect)] {
            let ClipRegion::Path(p) = combined else {
                panic!("expected a path clip");
            };
            assert_eq!(p.pieces().len(), 2);
            assert_eq!(p.fill_rule(), FillRule::EvenOdd);
            assert!(p.pieces().iter().all(|pc| pc.fill_rule == FillRule::EvenOdd));
            assert_eq!(p.bounds(), Rect::new(10.0, 10.0, 30.0, 30.0));
        }
    }

    #[test]
    fn test_path_path_keeps_left_fill_rule() {
        let a = ClipRegion::path(triangle(), FillRule::NonZero);
        let b = ClipRegion::path(triangle(), FillRule::EvenOdd);
        let ClipRegion::Path(p) = a.intersect(&b) else {
            panic!("expected a path clip");
        };
        assert_eq!(p.fill_rule(), FillRule::NonZero);
        assert_eq!(p.pieces()[1].fill_rule, FillRule::EvenOdd);
    }

    #[test]
    fn test_transform_rect() {
        let r = ClipRegion::from(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(
            r.transform(&Matrix::scale(2.0, 3.0)),
            ClipRegion::Rect(Rect::new(0.0, 0.0, 20.0, 30.0))
        );

        let rotated = r.transform(&Matrix::rotate(0.5));
        assert!(matches!(rotated, ClipRegion::Path(_)));
        assert_eq!(ClipRegion::None.transform(&Matrix::rotate(0.5)), ClipRegion::None);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(ClipRegion::None.bounds(), None);
        let path = ClipRegion::path(triangle(), FillRule::NonZero);
        assert_eq!(path.bounds(), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
    }
}
