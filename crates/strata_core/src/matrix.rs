//! 2D affine matrix
//!
//! ```text
//! | a  c  tx |
//! | b  d  ty |
//! | 0  0   1 |
//! ```
//!
//! Composition follows one rule across the workspace: `current.multiply(&incoming)`
//! prepends `incoming`, so it is applied first, in the more local coordinate
//! space. This is the order every drawing context uses for `translate`,
//! `rotate` and `scale` calls.

use crate::error::GeometryError;
use crate::geometry::{Point, Rect};

/// Determinant magnitude below which a matrix is treated as singular
pub const SINGULAR_TOLERANCE: f64 = 1e-9;

const AXIS_TOLERANCE: f64 = 1e-12;

/// 2D affine transformation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians (clockwise on screen, since Y grows downward)
    pub fn rotate(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Compose `incoming` into this matrix: the result applies `incoming` first, then `self`
    pub fn multiply(&self, incoming: &Matrix) -> Matrix {
        let l = self;
        let r = incoming;
        Matrix {
            a: l.a * r.a + l.c * r.b,
            b: l.b * r.a + l.d * r.b,
            c: l.a * r.c + l.c * r.d,
            d: l.b * r.c + l.d * r.d,
            tx: l.a * r.tx + l.c * r.ty + l.tx,
            ty: l.b * r.tx + l.d * r.ty + l.ty,
        }
    }

    /// Outer composition: the result applies `self` first, then `outer`
    pub fn then(&self, outer: &Matrix) -> Matrix {
        outer.multiply(self)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn invert(&self) -> Result<Matrix, GeometryError> {
        let det = self.determinant();
        if det.abs() < SINGULAR_TOLERANCE || !det.is_finite() {
            return Err(GeometryError::SingularMatrix { determinant: det });
        }
        let inv = 1.0 / det;
        Ok(Matrix {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            tx: (self.c * self.ty - self.d * self.tx) * inv,
            ty: (self.b * self.tx - self.a * self.ty) * inv,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Whether axis-aligned rectangles stay axis-aligned under this matrix
    ///
    /// True for translations, scales and quarter-turn rotations.
    pub fn is_axis_aligned(&self) -> bool {
        (self.b.abs() < AXIS_TOLERANCE && self.c.abs() < AXIS_TOLERANCE)
            || (self.a.abs() < AXIS_TOLERANCE && self.d.abs() < AXIS_TOLERANCE)
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Axis-aligned bounding box of the four transformed corners
    ///
    /// Under rotation or skew the result is larger than the rotated rectangle.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let [p0, p1, p2, p3] = rect.corners().map(|p| self.transform_point(p));
        let min = Point::new(
            p0.x.min(p1.x).min(p2.x).min(p3.x),
            p0.y.min(p1.y).min(p2.y).min(p3.y),
        );
        let max = Point::new(
            p0.x.max(p1.x).max(p2.x).max(p3.x),
            p0.y.max(p1.y).max(p2.y).max(p3.y),
        );
        Rect::from_corners(min, max)
    }

    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        (self.a - other.a).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.c - other.c).abs() <= eps
            && (self.d - other.d).abs() <= eps
            && (self.tx - other.tx).abs() <= eps
            && (self.ty - other.ty).abs() <= eps
    }
}
