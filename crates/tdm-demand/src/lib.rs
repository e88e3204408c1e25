//! `tdm-demand` — trip generation, distribution, and agent synthesis.
//!
//! The demand stages consume a partitioned network: trip-rate resolution and
//! node-level demand first, then the zone-to-zone accessibility matrix, the
//! singly-constrained gravity distribution, and finally expansion of the OD
//! volumes into discrete trip agents.
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`rates`]      | `RateBook`, `ResolvedRates`, built-in defaults      |
//! | [`generation`] | `DemandParams`, node production/attraction          |
//! | [`matrix`]     | `ZoneMatrix` dense flat zone×zone array             |
//! | [`access`]     | `AccessibilityMatrix`                               |
//! | [`gravity`]    | `FrictionCoefficients`, `TripTable`                 |
//! | [`agents`]     | `TripAgent`, endpoint/departure sampling            |
//! | [`error`]      | `DemandError`, `DemandResult`                       |

pub mod access;
pub mod agents;
pub mod error;
pub mod generation;
pub mod gravity;
pub mod matrix;
pub mod rates;


pub use access::{compute_accessibility, AccessibilityMatrix};
pub use agents::{sample_agents, TripAgent, AGENT_MODE};
pub use error::{DemandError, DemandResult};
pub use generation::{assign_node_demand, DemandParams};
pub use gravity::{distribute, FrictionCoefficients, TripTable};
pub use matrix::ZoneMatrix;
pub use rates::{RateBook, RateEntry, RateSource, ResolvedRates, FALLBACK_RATE};
