//! Error types for tdm-grid.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid cell sizes and block counts are mutually exclusive; supply only one")]
    SizingConflict,

    #[error("incomplete sizing parameters: both {what} must be supplied together")]
    IncompleteSizing { what: &'static str },

    #[error("cannot partition a network with no interior (non-boundary) nodes")]
    NoInteriorNodes,
}

/// Alias for `Result<T, GridError>`.
pub type GridResult<T> = Result<T, GridError>;
