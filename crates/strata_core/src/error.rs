//! Geometry error types

use thiserror::Error;

/// Geometry-related errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Matrix cannot be inverted
    #[error("Matrix is singular (determinant {determinant:e})")]
    SingularMatrix { determinant: f64 },
}
