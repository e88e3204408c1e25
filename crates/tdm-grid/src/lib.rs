//! `tdm-grid` — spatial partitioning of a network into analysis zones.
//!
//! The partitioner bins interior nodes and POIs into a rectangular grid of
//! real zones, rings the study area with virtual gate zones that absorb
//! boundary-flagged nodes, and emits a synthetic centroid node plus
//! last-mile connector links per zone.
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`config`]    | `GridConfig`, `GridSizing` tagged sizing variant  |
//! | [`zone`]      | `Zone`, `Connector`, land-use bucket counts       |
//! | [`partition`] | `GridPartitioner`, `ZoneSystem`                   |
//! | [`error`]     | `GridError`, `GridResult`                         |

pub mod config;
pub mod error;
pub mod partition;
pub mod zone;

#[cfg(test)]
mod tests;

pub use config::{GridConfig, GridSizing, DEFAULT_CELL_DEG};
pub use error::{GridError, GridResult};
pub use partition::{GridPartitioner, ZoneSystem};
pub use zone::{Connector, LandUseCounts, Zone, CENTROID_NODE_ID_BASE, MAX_CONNECTORS_PER_ZONE};
