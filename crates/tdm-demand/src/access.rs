//! Zone-to-zone accessibility (planar distance) matrix.

use tdm_core::{snap_latitude, LatitudeBand, DEFAULT_LATITUDE_DEG};
use tdm_grid::ZoneSystem;

use crate::matrix::ZoneMatrix;

/// Dense centroid-to-centroid distances in kilometres over all ordered zone
/// pairs, including self-pairs (0 by construction).
#[derive(Debug)]
pub struct AccessibilityMatrix {
    pub distances: ZoneMatrix,
    /// Latitude band the degree→km conversion was resolved under.  Resolved
    /// independently of the partitioner, since this stage accepts its own
    /// override.
    pub latitude: LatitudeBand,
}

/// Compute the accessibility matrix for `zones`.
///
/// `mean_latitude` is the network's mean node latitude (used when no
/// `latitude_override` is given); an empty network falls back to
/// [`DEFAULT_LATITUDE_DEG`] with a diagnostic.
pub fn compute_accessibility(
    zones: &ZoneSystem,
    mean_latitude: Option<f64>,
    latitude_override: Option<f64>,
) -> AccessibilityMatrix {
    let latitude = match latitude_override {
        Some(given) => given,
        None => mean_latitude.unwrap_or_else(|| {
            log::warn!("no node latitudes available; defaulting to {DEFAULT_LATITUDE_DEG}°");
            DEFAULT_LATITUDE_DEG
        }),
    };
    let band = snap_latitude(latitude);
    log::info!("latitude used for accessibility = {}°", band.latitude_deg);

    let n = zones.len();
    let mut distances = ZoneMatrix::zeros(n);
    for (i, origin) in zones.zones().iter().enumerate() {
        for (j, destination) in zones.zones().iter().enumerate() {
            let km = origin
                .centroid
                .distance_km(destination.centroid, band.km_per_degree);
            distances.set(i, j, km);
        }
    }
    log::info!("number of OD pairs = {}", n * n);

    AccessibilityMatrix { distances, latitude: band }
}
