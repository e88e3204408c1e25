//! Node, POI, and network-model types.
//!
//! # Data layout
//!
//! Nodes and POIs live in plain `Vec`s; all cross-references are id-based
//! lookups through `FxHashMap` indexes built during ingestion.  Zones hold
//! member-id lists and nodes hold a zone back-reference — never pointers —
//! so the partitioner can mutate membership without ownership cycles.

use rustc_hash::FxHashMap;

use tdm_core::{GridPoint, NodeId, PoiId, ZoneId};

/// POIs larger than this raw footprint are outliers: their area is forced to
/// zero so they contribute no floor-area-scaled demand, but the entity is
/// kept in the model and the output tables.
pub const MAX_POI_AREA_SQM: f64 = 90_000.0;

/// Square metres → square feet.
pub const SQM_TO_SQFT: f64 = 10.763_910_4;

// ── ActivityKind ──────────────────────────────────────────────────────────────

/// Activity classification of a node.
///
/// Fixed at ingestion for file-sourced nodes; `Centroid` is reserved for the
/// synthetic per-zone nodes created by the grid partitioner.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum ActivityKind {
    /// No demand activity at this node.
    #[default]
    None,
    /// Residential activity node.
    Residential,
    /// Node referencing a point of interest.
    Poi,
    /// Study-area boundary gate node.
    Boundary,
    /// Synthetic zone-centroid node.
    Centroid,
}

impl ActivityKind {
    /// Whether nodes of this kind produce or attract trips.
    #[inline]
    pub fn bears_demand(self) -> bool {
        matches!(
            self,
            ActivityKind::Residential | ActivityKind::Poi | ActivityKind::Boundary
        )
    }

    /// Label written to the activity-location column of the node table and
    /// into connector type names.  `None` has no label.
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::None => "",
            ActivityKind::Residential => "residential",
            ActivityKind::Poi => "poi",
            ActivityKind::Boundary => "boundary",
            ActivityKind::Centroid => "centroid node",
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A geocoded network node.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    /// Upstream (map-extraction) identifier, carried through to outputs.
    pub external_id: Option<String>,
    /// Raw activity string as ingested (e.g. `poi`, `residential`, a road
    /// class, or empty).
    pub activity_type: String,
    /// Derived classification; a set boundary flag overrides `poi` and
    /// `residential`.
    pub kind: ActivityKind,
    pub position: GridPoint,
    /// Referenced POI for `poi` nodes.
    pub poi: Option<PoiId>,
    pub is_boundary: bool,
    /// Assigned by the partitioner; `None` until partitioned or for nodes
    /// outside every zone.
    pub zone: Option<ZoneId>,
    pub production: f64,
    pub attraction: f64,
}

impl Node {
    /// Construct an unassigned node with zero demand.
    pub fn new(id: NodeId, position: GridPoint, kind: ActivityKind) -> Self {
        Self {
            id,
            external_id: None,
            activity_type: String::new(),
            kind,
            position,
            poi: None,
            is_boundary: false,
            zone: None,
            production: 0.0,
            attraction: 0.0,
        }
    }
}

// ── Poi ───────────────────────────────────────────────────────────────────────

/// A point of interest with a land-use type and a building footprint.
#[derive(Clone, Debug)]
pub struct Poi {
    pub id: PoiId,
    pub position: GridPoint,
    /// Land-use / building type string, matched exactly against rate tables.
    pub kind: String,
    /// Raw footprint in square metres; 0 for outliers above
    /// [`MAX_POI_AREA_SQM`].
    pub area_sqm: f64,
    /// Derived gross floor area in square feet; 0 for outliers.
    pub area_sqft: f64,
    pub zone: Option<ZoneId>,
}

impl Poi {
    /// Construct from a raw footprint, applying the outlier cutoff.
    pub fn new(id: PoiId, position: GridPoint, kind: String, raw_area_sqm: f64) -> Self {
        let (area_sqm, area_sqft) = if raw_area_sqm > MAX_POI_AREA_SQM {
            (0.0, 0.0)
        } else {
            (raw_area_sqm, raw_area_sqm * SQM_TO_SQFT)
        };
        Self { id, position, kind, area_sqm, area_sqft, zone: None }
    }
}

// ── NetworkModel ──────────────────────────────────────────────────────────────

/// The ingested network: nodes, POIs, and id→index lookups.
#[derive(Default)]
pub struct NetworkModel {
    pub nodes: Vec<Node>,
    pub pois: Vec<Poi>,
    node_index: FxHashMap<NodeId, usize>,
    poi_index: FxHashMap<PoiId, usize>,
}

impl NetworkModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and index it by id.
    pub fn add_node(&mut self, node: Node) {
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    /// Append a POI and index it by id.
    pub fn add_poi(&mut self, poi: Poi) {
        self.poi_index.insert(poi.id, self.pois.len());
        self.pois.push(poi);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_index.get(&id).map(|&i| &mut self.nodes[i])
    }

    pub fn poi(&self, id: PoiId) -> Option<&Poi> {
        self.poi_index.get(&id).map(|&i| &self.pois[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn poi_count(&self) -> usize {
        self.pois.len()
    }

    /// Interior (non-boundary) nodes, in ingestion order.
    pub fn interior_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_boundary)
    }

    /// Boundary-flagged nodes, in ingestion order.
    pub fn boundary_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_boundary)
    }

    /// Arithmetic mean of all node latitudes, or `None` for an empty network.
    pub fn mean_latitude(&self) -> Option<f64> {
        if self.nodes.is_empty() {
            return None;
        }
        let sum: f64 = self.nodes.iter().map(|n| n.position.y).sum();
        Some(sum / self.nodes.len() as f64)
    }
}
