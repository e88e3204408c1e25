//! `tdm-net` — in-memory network model and delimited-file ingestion.
//!
//! The model holds the geocoded nodes and points of interest consumed by the
//! rest of the pipeline.  Nodes carry an activity classification that is
//! immutable after ingestion; the only `Centroid` nodes in a run are the
//! synthetics created later by the grid partitioner.
//!
//! | Module     | Contents                                       |
//! |------------|------------------------------------------------|
//! | [`model`]  | `Node`, `Poi`, `ActivityKind`, `NetworkModel`  |
//! | [`loader`] | CSV ingestion of the node and POI tables       |
//! | [`error`]  | `NetError`, `NetResult`                        |

pub mod error;
pub mod loader;
pub mod model;


pub use error::{NetError, NetResult};
pub use loader::{load_network, read_nodes_reader, read_pois_reader};
pub use model::{ActivityKind, NetworkModel, Node, Poi};
