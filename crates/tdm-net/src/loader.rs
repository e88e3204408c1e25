//! CSV ingestion of the node and POI tables.
//!
//! # Node table
//!
//! One row per node.  `node_id`, `x_coord`, and `y_coord` are required on
//! every row (fatal when absent); `osm_node_id`, `activity_type`, `poi_id`,
//! and `is_boundary` are optional.  A missing or empty `is_boundary` defaults
//! to 0 with a one-time warning.  Rows already classified `centroid node`
//! belong to a previous run's synthetic output and are skipped.
//!
//! ```csv
//! node_id,osm_node_id,x_coord,y_coord,activity_type,poi_id,is_boundary
//! 1,50789,-88.0432101,30.6943204,poi,401,0
//! 2,50790,-88.0399997,30.6941020,residential,,0
//! 3,50791,-88.0301245,30.6940011,,,1
//! ```
//!
//! # POI table
//!
//! One row per point of interest.  `poi_id`, `centroid` (a WKT
//! `POINT (x y)`), and `area` (square metres) are required; `building` is
//! the land-use type matched against trip-rate tables.
//!
//! Both loaders accept any `Read` source, so tests pass `io::Cursor`s.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use tdm_core::{geo::round7, GridPoint, NodeId, PoiId};

use crate::model::{ActivityKind, NetworkModel, Node, Poi};
use crate::{NetError, NetResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    #[serde(default)]
    node_id: Option<String>,
    #[serde(default)]
    osm_node_id: Option<String>,
    #[serde(default)]
    activity_type: Option<String>,
    #[serde(default)]
    x_coord: Option<String>,
    #[serde(default)]
    y_coord: Option<String>,
    #[serde(default)]
    poi_id: Option<String>,
    #[serde(default)]
    is_boundary: Option<String>,
}

#[derive(Deserialize)]
struct PoiRecord {
    #[serde(default)]
    poi_id: Option<String>,
    #[serde(default)]
    centroid: Option<String>,
    #[serde(default)]
    building: Option<String>,
    #[serde(default)]
    area: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NetworkModel`] from a node table and a POI table on disk.
pub fn load_network(node_path: &Path, poi_path: &Path) -> NetResult<NetworkModel> {
    let mut net = NetworkModel::new();
    read_nodes_reader(std::fs::File::open(node_path)?, &mut net)?;
    read_pois_reader(std::fs::File::open(poi_path)?, &mut net)?;
    Ok(net)
}

/// Ingest node rows from any `Read` source into `net`.
pub fn read_nodes_reader<R: Read>(reader: R, net: &mut NetworkModel) -> NetResult<()> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut warned_boundary_default = false;
    let mut any_poi_reference = false;

    for (i, result) in csv_reader.deserialize::<NodeRecord>().enumerate() {
        let row = i + 1;
        let record = result?;

        let id = NodeId(parse_required::<u64>("node_id", row, record.node_id)?);
        let x = round7(parse_required::<f64>("x_coord", row, record.x_coord)?);
        let y = round7(parse_required::<f64>("y_coord", row, record.y_coord)?);

        let activity_type = record.activity_type.unwrap_or_default();
        if activity_type == "centroid node" {
            continue;
        }

        let poi = match record.poi_id.filter(|s| !s.trim().is_empty()) {
            None => None,
            // References may arrive as float-formatted integers ("401.0").
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) => {
                    any_poi_reference = true;
                    Some(PoiId(v as u64))
                }
                Err(_) => {
                    log::warn!("node row {row}: unparsable poi_id {raw:?}, row skipped");
                    continue;
                }
            },
        };

        let is_boundary = match record.is_boundary.filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let flag: f64 = parse_field("is_boundary", row, &raw)?;
                flag as i64 == 1
            }
            None => {
                if !warned_boundary_default {
                    log::warn!("is_boundary is not defined in the node table; defaulting to 0");
                    warned_boundary_default = true;
                }
                false
            }
        };

        let mut kind = match activity_type.as_str() {
            "residential" => ActivityKind::Residential,
            "poi" => ActivityKind::Poi,
            _ => ActivityKind::None,
        };
        if is_boundary {
            kind = ActivityKind::Boundary;
        }

        net.add_node(Node {
            id,
            external_id: record.osm_node_id.filter(|s| !s.trim().is_empty()),
            activity_type,
            kind,
            position: GridPoint::new(x, y),
            poi,
            is_boundary,
            zone: None,
            production: 0.0,
            attraction: 0.0,
        });
    }

    if !any_poi_reference {
        log::warn!(
            "no node carries a poi_id reference; demand volumes will likely be empty \
             (was the network extracted with POIs enabled?)"
        );
    }

    Ok(())
}

/// Ingest POI rows from any `Read` source into `net`.
pub fn read_pois_reader<R: Read>(reader: R, net: &mut NetworkModel) -> NetResult<()> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    for (i, result) in csv_reader.deserialize::<PoiRecord>().enumerate() {
        let row = i + 1;
        let record = result?;

        let id = PoiId(parse_required::<u64>("poi_id", row, record.poi_id)?);

        let centroid_raw = record
            .centroid
            .filter(|s| !s.trim().is_empty())
            .ok_or(NetError::MissingField { field: "centroid", row })?;
        let position = parse_wkt_point(&centroid_raw)
            .ok_or_else(|| NetError::Geometry { row, value: centroid_raw })?;

        let raw_area = parse_required::<f64>("area", row, record.area)?;
        let kind = record.building.unwrap_or_default();

        net.add_poi(Poi::new(id, position, kind, raw_area));
    }

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_required<T: std::str::FromStr>(
    field: &'static str,
    row: usize,
    value: Option<String>,
) -> NetResult<T> {
    let raw = value
        .filter(|s| !s.trim().is_empty())
        .ok_or(NetError::MissingField { field, row })?;
    parse_field(field, row, &raw)
}

fn parse_field<T: std::str::FromStr>(field: &'static str, row: usize, raw: &str) -> NetResult<T> {
    raw.trim().parse().map_err(|_| NetError::Parse {
        field,
        row,
        value: raw.to_owned(),
    })
}

/// Parse a WKT `POINT (x y)` string.
fn parse_wkt_point(s: &str) -> Option<GridPoint> {
    let body = s
        .trim()
        .strip_prefix("POINT")?
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut coords = body.split_whitespace();
    let x = coords.next()?.parse().ok()?;
    let y = coords.next()?.parse().ok()?;
    if coords.next().is_some() {
        return None;
    }
    Some(GridPoint::new(x, y))
}
