//! `tdm-core` — foundational types for the `rust_tdm` travel demand toolkit.
//!
//! This crate is a dependency of every other `tdm-*` crate.  It intentionally
//! has no `tdm-*` dependencies and minimal external ones (only `rand`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `PoiId`, `ZoneId`, `LinkId`, `AgentId`      |
//! | [`geo`]     | `GridPoint`, WKT formatting, latitude band lookup     |
//! | [`purpose`] | `TripPurpose` enum                                    |
//! | [`rng`]     | `SimRng` (seeded sampling source)                     |

pub mod geo;
pub mod ids;
pub mod purpose;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{GridPoint, LatitudeBand, snap_latitude, DEFAULT_LATITUDE_DEG};
pub use ids::{AgentId, LinkId, NodeId, PoiId, ZoneId};
pub use purpose::TripPurpose;
pub use rng::SimRng;
