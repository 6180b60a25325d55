//! Paint error types

use strata_core::GeometryError;
use thiserror::Error;

/// Errors reported to drawing callers
///
/// Native push/pop mismatches are not represented here: they mean the native
/// state is corrupted and abort instead of returning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    /// `restore_transform` without a matching `save_transform`
    #[error("Restore called with no open save frame")]
    UnbalancedRestore,

    /// Numeric failure, e.g. querying clip bounds under a degenerate transform
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Result type for paint state operations
pub type Result<T> = std::result::Result<T, PaintError>;
