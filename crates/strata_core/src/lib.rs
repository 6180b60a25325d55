//! Strata Core
//!
//! Leaf value types shared by every Strata drawing backend:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`]
//! - **Paths**: [`Path`] and [`PathBuilder`]
//! - **Transforms**: [`Matrix`], a 2x3 affine matrix with `incoming ∘ current` composition
//! - **Clipping**: [`ClipRegion`], intersectable rectangle or path clips
//!
//! # Example
//!
//! ```rust
//! use strata_core::{ClipRegion, Matrix, Point, Rect};
//!
//! let m = Matrix::translate(10.0, 10.0).multiply(&Matrix::scale(2.0, 2.0));
//! assert_eq!(m.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 12.0));
//!
//! let clip = ClipRegion::from(Rect::new(0.0, 0.0, 50.0, 50.0)).transform(&m);
//! assert_eq!(clip.bounds(), Some(Rect::new(10.0, 10.0, 100.0, 100.0)));
//! ```

pub mod clip;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod path;

pub use clip::{ClipPath, ClipPiece, ClipRegion, FillRule};
pub use error::GeometryError;
pub use geometry::{Point, Rect, Size};
pub use matrix::{Matrix, SINGULAR_TOLERANCE};
pub use path::{Path, PathBuilder, PathCommand};
