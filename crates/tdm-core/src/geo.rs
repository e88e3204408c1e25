//! Planar coordinate type, WKT formatting, and the latitude band lookup.
//!
//! Coordinates are geographic degrees (x = longitude, y = latitude) stored as
//! `f64` and rounded to 7 decimals at ingestion — about 1 cm of ground
//! resolution, and enough headroom for the 5-decimal cell-size arithmetic in
//! the grid partitioner.
//!
//! Degree offsets are converted to kilometres through a small reference table
//! of latitude bands rather than great-circle math: the study areas this
//! toolkit targets are city-sized, where a single flat-surface scalar per run
//! is within a fraction of a percent of haversine.

use std::fmt;

// ── GridPoint ─────────────────────────────────────────────────────────────────

/// A planar geographic coordinate in degrees (x = longitude, y = latitude).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Construct with both coordinates rounded to 7 decimals, the precision
    /// carried by all ingested node coordinates.
    pub fn rounded(x: f64, y: f64) -> Self {
        Self { x: round7(x), y: round7(y) }
    }

    /// Planar distance to `other` in kilometres under a flat-surface
    /// conversion of `km_per_degree` kilometres per degree on both axes.
    pub fn distance_km(self, other: GridPoint, km_per_degree: f64) -> f64 {
        let dx = (self.x - other.x) * km_per_degree;
        let dy = (self.y - other.y) * km_per_degree;
        (dx * dx + dy * dy).sqrt()
    }

    /// WKT `POINT (x y)` representation.
    pub fn wkt(self) -> String {
        format!("POINT ({} {})", self.x, self.y)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.x, self.y)
    }
}

/// Round to 7 decimal places.
#[inline]
pub fn round7(v: f64) -> f64 {
    (v * 1e7).round() / 1e7
}

/// Round to 5 decimal places — the precision used for grid cell sizes.
#[inline]
pub fn round5(v: f64) -> f64 {
    (v * 1e5).round() / 1e5
}

// ── WKT helpers ───────────────────────────────────────────────────────────────

/// WKT `LINESTRING` between two points, coordinates rounded to 7 decimals.
pub fn wkt_segment(a: GridPoint, b: GridPoint) -> String {
    format!(
        "LINESTRING ({} {},{} {})",
        round7(a.x),
        round7(a.y),
        round7(b.x),
        round7(b.y)
    )
}

/// WKT `POLYGON` closed 5-point ring for an axis-aligned rectangle.
pub fn wkt_rect_ring(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> String {
    format!(
        "POLYGON (({x_min} {y_min},{x_min} {y_max},{x_max} {y_max},{x_max} {y_min},{x_min} {y_min}))"
    )
}

// ── Latitude bands ────────────────────────────────────────────────────────────

/// Reference latitudes and the flat-surface length of one degree of
/// longitude at each, in kilometres.  Scanned in ascending latitude order.
const DEGREE_LENGTH_TABLE: [(f64, f64); 5] = [
    (0.0, 111.3),
    (30.0, 96.49),
    (45.0, 78.85),
    (51.0, 69.47),
    (60.0, 55.8),
];

/// Fallback latitude when the network provides no usable y-coordinates.
pub const DEFAULT_LATITUDE_DEG: f64 = 30.0;

/// A resolved latitude band: the snapped reference latitude and its
/// kilometres-per-degree scalar.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatitudeBand {
    pub latitude_deg: f64,
    pub km_per_degree: f64,
}

/// Snap `latitude` to the nearest reference band by absolute distance.
///
/// The table is scanned in ascending latitude order with strict improvement,
/// so an exact tie keeps the lower reference latitude.  Southern-hemisphere
/// inputs match by magnitude.
pub fn snap_latitude(latitude: f64) -> LatitudeBand {
    let target = latitude.abs();
    let mut best = DEGREE_LENGTH_TABLE[0];
    let mut best_dif = (target - best.0).abs();
    for &(key, km) in &DEGREE_LENGTH_TABLE[1..] {
        let dif = (target - key).abs();
        if dif < best_dif {
            best = (key, km);
            best_dif = dif;
        }
    }
    LatitudeBand { latitude_deg: best.0, km_per_degree: best.1 }
}
