//! Zone and connector types.

use tdm_core::{GridPoint, LinkId, NodeId, PoiId, ZoneId};
use tdm_net::{ActivityKind, Node};

/// Synthetic centroid nodes are numbered `CENTROID_NODE_ID_BASE + zone id`
/// to stay clear of ingested node ids.
pub const CENTROID_NODE_ID_BASE: u64 = 100_000;

/// Cap on centroid connectors emitted per zone.
pub const MAX_CONNECTORS_PER_ZONE: usize = 50;

// ── Land-use buckets ──────────────────────────────────────────────────────────

/// Per-zone POI counts bucketed into five fixed land-use groups.
///
/// Bucket membership is an exact string match against the synonym sets
/// below; unmatched types increment no bucket.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LandUseCounts {
    pub residential: usize,
    pub office: usize,
    pub shopping: usize,
    pub school: usize,
    pub parking: usize,
}

impl LandUseCounts {
    /// Record one POI of land-use type `kind`.
    pub fn record(&mut self, kind: &str) {
        match kind {
            "apartments" | "dormitory" | "house" | "residential" => self.residential += 1,
            "office" | "industrial" => self.office += 1,
            "commercial" | "retail" | "supermarket" | "warehouse" => self.shopping += 1,
            "school" | "kindergarten" | "university" | "college" | "university;yes" => {
                self.school += 1
            }
            "parking" | "garage" | "garages" | "bicycle_parking" => self.parking += 1,
            _ => {}
        }
    }
}

// ── Connector ─────────────────────────────────────────────────────────────────

/// A synthetic last-mile link from a zone member node to the zone's
/// centroid node.
#[derive(Clone, Debug)]
pub struct Connector {
    /// `zone id * 100_000 + sequence`.
    pub id: LinkId,
    pub from_node: NodeId,
    /// The zone's synthetic centroid node.
    pub to_node: NodeId,
    /// `connector with <activity label>`.
    pub kind_label: String,
    /// Two-point WKT `LINESTRING`.
    pub geometry_wkt: String,
}

// ── Zone ──────────────────────────────────────────────────────────────────────

/// A grid cell or virtual gate zone.
///
/// Created once by the partitioner, mutated only while membership and
/// counts accumulate, then read-only for the rest of the pipeline.
#[derive(Clone, Debug)]
pub struct Zone {
    pub id: ZoneId,
    /// Grid label (`A1`, `B3`, …) or `Gate<k>` for virtual zones.
    pub label: String,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub centroid: GridPoint,
    /// Closed 5-point rectangle ring; empty for gate zones.
    pub polygon_wkt: String,
    pub is_gate: bool,
    /// Member POI count (`pois.len()`, kept for the zone table).
    pub poi_count: usize,
    pub land_use: LandUseCounts,
    /// Boundary nodes absorbed by this gate zone.
    pub boundary_count: usize,
    pub nodes: Vec<NodeId>,
    pub pois: Vec<PoiId>,
    pub connectors: Vec<Connector>,
    /// Synthetic centroid node (kind [`ActivityKind::Centroid`]).
    pub centroid_node: Node,
}

impl Zone {
    /// Create a zone over the given rectangle with a placeholder centroid.
    pub(crate) fn new(id: ZoneId, label: String, rect: (f64, f64, f64, f64), is_gate: bool) -> Self {
        let (x_min, x_max, y_min, y_max) = rect;
        let mut centroid_node = Node::new(
            NodeId(CENTROID_NODE_ID_BASE + id.0 as u64),
            GridPoint::default(),
            ActivityKind::Centroid,
        );
        centroid_node.zone = Some(id);
        Self {
            id,
            label,
            x_min,
            x_max,
            y_min,
            y_max,
            centroid: GridPoint::default(),
            polygon_wkt: String::new(),
            is_gate,
            poi_count: 0,
            land_use: LandUseCounts::default(),
            boundary_count: 0,
            nodes: Vec::new(),
            pois: Vec::new(),
            connectors: Vec::new(),
            centroid_node,
        }
    }

    /// Closed-rectangle containment test.
    #[inline]
    pub fn contains(&self, p: GridPoint) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Geometric center of the bounding rectangle.
    #[inline]
    pub fn rect_center(&self) -> GridPoint {
        GridPoint::new((self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0)
    }

    /// Fix the centroid and mirror it onto the synthetic centroid node.
    pub(crate) fn set_centroid(&mut self, centroid: GridPoint) {
        self.centroid = centroid;
        self.centroid_node.position = centroid;
    }

    /// WKT `POINT` for the centroid.
    pub fn centroid_wkt(&self) -> String {
        self.centroid.wkt()
    }
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Grid label for real zone `id` in a grid `x_blocks` wide: row letter
/// (`A` at the top, wrapping past `Z`) plus 1-based column number.
pub(crate) fn grid_label(id: u32, x_blocks: u32) -> String {
    let row = id.div_ceil(x_blocks) - 1;
    let letter = char::from(b'A' + (row % 26) as u8);
    let column = match id % x_blocks {
        0 => x_blocks,
        n => n,
    };
    format!("{letter}{column}")
}
