//! Grid partitioner.
//!
//! # Algorithm
//!
//! 1. Bound the interior (non-boundary) nodes and resolve the latitude band.
//! 2. Resolve cell sizes from the configured [`GridSizing`] mode, expanding
//!    or re-anchoring the bounding box so the grid tiles it exactly.
//! 3. Sweep real zones row-major from the top-left corner, assigning
//!    eligible nodes and all POIs to the first zone whose closed rectangle
//!    contains them — membership is exclusive, a point is never assigned
//!    twice.
//! 4. Ring the grid with virtual gate zones (left, upper, right, lower),
//!    one segment per perpendicular block, half a cell outward.  Boundary
//!    nodes go to the first gate whose side is nearest and whose span
//!    contains them; the ring order is the tie-break for corner nodes.
//! 5. Emit per-zone centroid nodes and capped connector links.

use rustc_hash::FxHashMap;

use tdm_core::geo::{round5, wkt_rect_ring, wkt_segment};
use tdm_core::{
    snap_latitude, GridPoint, LatitudeBand, LinkId, ZoneId, DEFAULT_LATITUDE_DEG,
};
use tdm_net::{ActivityKind, NetworkModel, Node};

use crate::config::{GridConfig, GridSizing, DEFAULT_CELL_DEG};
use crate::zone::{grid_label, Connector, Zone, MAX_CONNECTORS_PER_ZONE};
use crate::{GridError, GridResult};

// ── ZoneSystem ────────────────────────────────────────────────────────────────

/// The product of partitioning: all zones (real then gates) plus a stable
/// id→index map for dense matrix addressing downstream.
#[derive(Debug)]
pub struct ZoneSystem {
    zones: Vec<Zone>,
    index: FxHashMap<ZoneId, usize>,
    pub x_blocks: u32,
    pub y_blocks: u32,
    /// Latitude band the cell sizing was resolved under.
    pub latitude: LatitudeBand,
    /// Expanded bounding box tiled by the real grid.
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ZoneSystem {
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Real grid cells precede gate zones in the zone list.
    pub fn real_zone_count(&self) -> usize {
        (self.x_blocks * self.y_blocks) as usize
    }

    pub fn gate_zone_count(&self) -> usize {
        (2 * (self.x_blocks + self.y_blocks)) as usize
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.index.get(&id).map(|&i| &self.zones[i])
    }

    /// Position of `id` in the dense zone ordering.
    pub fn index_of(&self, id: ZoneId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Synthetic centroid nodes of all zones, in zone order.
    pub fn centroid_nodes(&self) -> impl Iterator<Item = &Node> {
        self.zones.iter().map(|z| &z.centroid_node)
    }
}

// ── GridPartitioner ───────────────────────────────────────────────────────────

/// Bins a network into a rectangular grid of zones plus a gate-zone ring.
pub struct GridPartitioner {
    config: GridConfig,
}

/// Which bounding edge a gate ring hangs off.
#[derive(Copy, Clone)]
enum Side {
    Left,
    Upper,
    Right,
    Lower,
}

impl GridPartitioner {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    /// Partition `net`, assigning zone ids to its nodes and POIs, and return
    /// the populated zone system.
    pub fn partition(&self, net: &mut NetworkModel) -> GridResult<ZoneSystem> {
        let interior: Vec<usize> = net
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_boundary)
            .map(|(i, _)| i)
            .collect();
        if interior.is_empty() {
            return Err(GridError::NoInteriorNodes);
        }

        // ── Bounding box of interior nodes ────────────────────────────────
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for &i in &interior {
            let p = net.nodes[i].position;
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }

        // ── Latitude band ─────────────────────────────────────────────────
        let latitude = match self.config.latitude {
            Some(given) => given,
            None => net.mean_latitude().unwrap_or_else(|| {
                log::warn!("no node latitudes available; defaulting to {DEFAULT_LATITUDE_DEG}°");
                DEFAULT_LATITUDE_DEG
            }),
        };
        let band = snap_latitude(latitude);
        log::info!("latitude used for grid partition = {}°", band.latitude_deg);

        // ── Cell sizing ───────────────────────────────────────────────────
        let scale_x;
        let scale_y;
        match self.config.sizing {
            GridSizing::Default => {
                log::warn!(
                    "no grid sizing given; defaulting to {DEFAULT_CELL_DEG}° cells on both axes"
                );
                scale_x = DEFAULT_CELL_DEG;
                scale_y = DEFAULT_CELL_DEG;
                x_max = (x_max / scale_x).ceil() * scale_x;
                x_min = (x_min / scale_x).floor() * scale_x;
                y_max = (y_max / scale_y).ceil() * scale_y;
                y_min = (y_min / scale_y).floor() * scale_y;
            }
            GridSizing::ByBlockCount { x_blocks, y_blocks } => {
                // The epsilon keeps nodes sitting on the raw maximum bound
                // inside the last cell after 5-decimal rounding.
                scale_x = round5((x_max - x_min) / x_blocks as f64) + 1e-5;
                scale_y = round5((y_max - y_min) / y_blocks as f64) + 1e-5;
                x_max = round5(x_min + scale_x * x_blocks as f64);
                y_min = round5(y_max - scale_y * y_blocks as f64);
            }
            GridSizing::ByCellSize { width_m, height_m } => {
                scale_x = round5(width_m / (1000.0 * band.km_per_degree));
                scale_y = round5(height_m / (1000.0 * band.km_per_degree));
                x_max = round5((x_max / scale_x).ceil() * scale_x);
                x_min = round5((x_min / scale_x).floor() * scale_x);
                y_max = round5((y_max / scale_y).ceil() * scale_y);
                y_min = round5((y_min / scale_y).floor() * scale_y);
            }
        }

        let (x_blocks, y_blocks) = match self.config.sizing {
            GridSizing::ByBlockCount { x_blocks, y_blocks } => (x_blocks, y_blocks),
            _ => {
                // A degenerate extent (all nodes on one line) still gets one
                // row/column so every node lands in a zone.
                let xb = (((x_max - x_min) / scale_x).round() as u32).max(1);
                let yb = (((y_max - y_min) / scale_y).round() as u32).max(1);
                x_max = x_min + scale_x * xb as f64;
                y_min = y_max - scale_y * yb as f64;
                (xb, yb)
            }
        };
        let real_blocks = x_blocks * y_blocks;

        // ── Real zones, row-major from the top-left ───────────────────────
        let mut zones: Vec<Zone> =
            Vec::with_capacity((real_blocks + 2 * (x_blocks + y_blocks)) as usize);
        for row in 0..y_blocks {
            for col in 0..x_blocks {
                let id = ZoneId(row * x_blocks + col + 1);
                let rect = (
                    x_min + col as f64 * scale_x,
                    x_min + (col + 1) as f64 * scale_x,
                    y_max - (row + 1) as f64 * scale_y,
                    y_max - row as f64 * scale_y,
                );
                let mut zone = Zone::new(id, grid_label(id.0, x_blocks), rect, false);

                let mut sum = GridPoint::default();
                for &i in &interior {
                    let node = &mut net.nodes[i];
                    if node.zone.is_none()
                        && matches!(node.kind, ActivityKind::Poi | ActivityKind::Residential)
                        && zone.contains(node.position)
                    {
                        node.zone = Some(id);
                        zone.nodes.push(node.id);
                        sum.x += node.position.x;
                        sum.y += node.position.y;
                    }
                }
                for poi in &mut net.pois {
                    if poi.zone.is_none() && zone.contains(poi.position) {
                        poi.zone = Some(id);
                        zone.pois.push(poi.id);
                        zone.land_use.record(&poi.kind);
                    }
                }
                zone.poi_count = zone.pois.len();

                let centroid = if zone.nodes.is_empty() {
                    zone.rect_center()
                } else {
                    let n = zone.nodes.len() as f64;
                    GridPoint::new(sum.x / n, sum.y / n)
                };
                zone.set_centroid(centroid);
                zone.polygon_wkt = wkt_rect_ring(zone.x_min, zone.x_max, zone.y_min, zone.y_max);
                zones.push(zone);
            }
        }

        // ── Virtual gate rings ────────────────────────────────────────────
        let boundary: Vec<usize> = net
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_boundary)
            .map(|(i, _)| i)
            .collect();
        let bounds = (x_min, x_max, y_min, y_max);
        let mut gate_no = real_blocks;
        let make_gate = |rect: (f64, f64, f64, f64), centroid: GridPoint, no: u32| {
            let mut zone = Zone::new(ZoneId(no), format!("Gate{}", no - real_blocks), rect, true);
            zone.set_centroid(centroid);
            zone
        };

        for i in 0..y_blocks {
            gate_no += 1;
            let rect = (
                x_min - scale_x / 2.0,
                x_min,
                y_min + i as f64 * scale_y,
                y_min + (i + 1) as f64 * scale_y,
            );
            let centroid = GridPoint::new(x_min - scale_x / 2.0, (rect.2 + rect.3) / 2.0);
            let mut zone = make_gate(rect, centroid, gate_no);
            absorb_boundary(&mut zone, Side::Left, bounds, &boundary, net);
            zones.push(zone);
        }
        for j in 0..x_blocks {
            gate_no += 1;
            let rect = (
                x_min + j as f64 * scale_x,
                x_min + (j + 1) as f64 * scale_x,
                y_max,
                y_max + scale_y / 2.0,
            );
            let centroid = GridPoint::new((rect.0 + rect.1) / 2.0, y_max + scale_y / 2.0);
            let mut zone = make_gate(rect, centroid, gate_no);
            absorb_boundary(&mut zone, Side::Upper, bounds, &boundary, net);
            zones.push(zone);
        }
        for k in 0..y_blocks {
            gate_no += 1;
            let rect = (
                x_max,
                x_max + scale_x / 2.0,
                y_max - (k + 1) as f64 * scale_y,
                y_max - k as f64 * scale_y,
            );
            let centroid = GridPoint::new(x_max + scale_x / 2.0, (rect.2 + rect.3) / 2.0);
            let mut zone = make_gate(rect, centroid, gate_no);
            absorb_boundary(&mut zone, Side::Right, bounds, &boundary, net);
            zones.push(zone);
        }
        for m in 0..x_blocks {
            gate_no += 1;
            let rect = (
                x_max - (m + 1) as f64 * scale_x,
                x_max - m as f64 * scale_x,
                y_min - scale_y / 2.0,
                y_min,
            );
            let centroid = GridPoint::new((rect.0 + rect.1) / 2.0, y_min - scale_y / 2.0);
            let mut zone = make_gate(rect, centroid, gate_no);
            absorb_boundary(&mut zone, Side::Lower, bounds, &boundary, net);
            zones.push(zone);
        }

        log::info!("number of zones including virtual zones = {}", zones.len());

        // ── Connectors ────────────────────────────────────────────────────
        for zone in &mut zones {
            let centroid_node_id = zone.centroid_node.id;
            let centroid_pos = zone.centroid_node.position;
            for &node_id in &zone.nodes {
                if zone.connectors.len() >= MAX_CONNECTORS_PER_ZONE {
                    break;
                }
                let Some(node) = net.node(node_id) else { continue };
                if !node.kind.bears_demand() {
                    continue;
                }
                let seq = zone.connectors.len() as u64;
                zone.connectors.push(Connector {
                    id: LinkId(zone.id.0 as u64 * 100_000 + seq),
                    from_node: node_id,
                    to_node: centroid_node_id,
                    kind_label: format!("connector with {}", node.kind.label()),
                    geometry_wkt: wkt_segment(node.position, centroid_pos),
                });
            }
        }

        let index: FxHashMap<ZoneId, usize> =
            zones.iter().enumerate().map(|(i, z)| (z.id, i)).collect();

        Ok(ZoneSystem {
            zones,
            index,
            x_blocks,
            y_blocks,
            latitude: band,
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

/// Assign to `zone` every still-unassigned boundary node whose nearest
/// bounding edge is this ring's side and whose perpendicular coordinate
/// falls in the zone's span.
fn absorb_boundary(
    zone: &mut Zone,
    side: Side,
    bounds: (f64, f64, f64, f64),
    boundary: &[usize],
    net: &mut NetworkModel,
) {
    let (x_min, x_max, y_min, y_max) = bounds;
    for &i in boundary {
        let node = &mut net.nodes[i];
        if node.zone.is_some() {
            continue;
        }
        let p = node.position;
        let d_left = (p.x - x_min).abs();
        let d_right = (p.x - x_max).abs();
        let d_upper = (p.y - y_max).abs();
        let d_lower = (p.y - y_min).abs();
        let (nearest_side, in_span) = match side {
            Side::Left => (
                d_left <= d_right && d_left <= d_upper && d_left <= d_lower,
                p.y >= zone.y_min && p.y <= zone.y_max,
            ),
            Side::Upper => (
                d_upper <= d_left && d_upper <= d_right && d_upper <= d_lower,
                p.x >= zone.x_min && p.x <= zone.x_max,
            ),
            Side::Right => (
                d_right <= d_left && d_right <= d_upper && d_right <= d_lower,
                p.y >= zone.y_min && p.y <= zone.y_max,
            ),
            Side::Lower => (
                d_lower <= d_left && d_lower <= d_right && d_lower <= d_upper,
                p.x >= zone.x_min && p.x <= zone.x_max,
            ),
        };
        if nearest_side && in_span {
            node.zone = Some(zone.id);
            zone.nodes.push(node.id);
            zone.boundary_count += 1;
        }
    }
}
