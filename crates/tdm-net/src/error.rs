//! Error types for tdm-net.

use thiserror::Error;

/// Errors raised while ingesting the node and POI tables.
///
/// Row numbers are 1-based positions within the data rows of the offending
/// file (the header is row 0).
#[derive(Debug, Error)]
pub enum NetError {
    #[error("required field `{field}` is missing on row {row}")]
    MissingField { field: &'static str, row: usize },

    #[error("row {row}: cannot parse field `{field}` from {value:?}")]
    Parse {
        field: &'static str,
        row: usize,
        value: String,
    },

    #[error("row {row}: malformed point geometry {value:?}")]
    Geometry { row: usize, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, NetError>`.
pub type NetResult<T> = Result<T, NetError>;
