//! Pipeline-level error type.

use thiserror::Error;

use tdm_demand::DemandError;
use tdm_grid::GridError;
use tdm_net::NetError;

/// Any failure from the pipeline stages, in stage order.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("network ingestion failed: {0}")]
    Net(#[from] NetError),

    #[error("grid partitioning failed: {0}")]
    Grid(#[from] GridError),

    #[error("demand computation failed: {0}")]
    Demand(#[from] DemandError),
}

/// Alias for `Result<T, PipelineError>`.
pub type PipelineResult<T> = Result<T, PipelineError>;
