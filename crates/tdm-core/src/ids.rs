//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Unlike array indices, these are
//! *external* identifiers: node and POI ids come from the input tables, zone
//! ids are assigned sequentially from 1 by the partitioner, and synthetic
//! centroid-node ids are offset far above the ingested range.  The inner
//! integer is `pub` for direct formatting into output tables.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identifier of a network node as ingested, or `100_000 + zone id` for
    /// the synthetic centroid node of a zone.
    pub struct NodeId(u64);
}

typed_id! {
    /// Identifier of a point of interest as ingested.
    pub struct PoiId(u64);
}

typed_id! {
    /// Identifier of an analysis zone.  Real grid cells are numbered
    /// row-major from 1; virtual gate zones continue the sequence.
    pub struct ZoneId(u32);
}

typed_id! {
    /// Identifier of a synthetic connector link: `zone id * 100_000 + seq`.
    pub struct LinkId(u64);
}

typed_id! {
    /// Identifier of a synthesized trip agent, numbered from 1.
    pub struct AgentId(u32);
}
