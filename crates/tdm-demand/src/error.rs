//! Error types for tdm-demand.

use thiserror::Error;

use tdm_core::ZoneId;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error(
        "no demand-bearing node (poi, residential, or boundary) holds a zone \
         assignment; nothing to distribute"
    )]
    NoDemandSource,

    #[error("zone {0} has no member nodes to sample trip endpoints from")]
    EmptyZone(ZoneId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, DemandError>`.
pub type DemandResult<T> = Result<T, DemandError>;
