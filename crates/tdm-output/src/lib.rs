//! `tdm-output` — CSV export of the demand-model tables.
//!
//! Eight tables are written into a configured output directory:
//!
//! | File                 | Contents                                         |
//! |----------------------|--------------------------------------------------|
//! | `zone.csv`           | Zone geometry, land-use counts, demand totals    |
//! | `connector.csv`      | Centroid connector links (GMNS-flavored columns) |
//! | `node.csv`           | Nodes augmented with zone/demand, plus synthetic centroid nodes |
//! | `poi.csv`            | POIs augmented with zone id and adjusted area    |
//! | `poi_trip_rate.csv`  | Resolved per-type trip rates with source notes   |
//! | `accessibility.csv`  | Zone-pair distances                              |
//! | `demand.csv`         | Zone-pair volumes (ceiling-rounded)              |
//! | `input_agent.csv`    | Synthesized trip agents                          |

pub mod csv;
pub mod error;

#[cfg(test)]
mod tests;

pub use csv::CsvExporter;
pub use error::{OutputError, OutputResult};
