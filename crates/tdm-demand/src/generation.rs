//! Node-level trip production and attraction.

use tdm_net::{ActivityKind, NetworkModel};

use crate::rates::ResolvedRates;

/// Fixed demand constants for non-POI activity nodes.
#[derive(Copy, Clone, Debug)]
pub struct DemandParams {
    pub residential_production: f64,
    pub residential_attraction: f64,
    pub boundary_production: f64,
    pub boundary_attraction: f64,
}

impl Default for DemandParams {
    fn default() -> Self {
        Self {
            residential_production: 10.0,
            residential_attraction: 10.0,
            boundary_production: 1000.0,
            boundary_attraction: 1000.0,
        }
    }
}

/// Assign production/attraction to every node in place.
///
/// Residential and boundary nodes take the fixed constants regardless of any
/// POI data; POI nodes scale their land-use rates by gross floor area
/// (trips per 1,000 sq. ft., so an outlier-zeroed area contributes nothing);
/// every other node stays at 0.
pub fn assign_node_demand(net: &mut NetworkModel, rates: &ResolvedRates, params: &DemandParams) {
    let mut poi_demand: Vec<(usize, f64, f64)> = Vec::new();
    for (i, node) in net.nodes.iter().enumerate() {
        if node.kind == ActivityKind::Poi {
            if let Some(poi) = node.poi.and_then(|id| net.poi(id)) {
                if let Some(entry) = rates.entry(&poi.kind) {
                    let scaled_area = poi.area_sqft / 1000.0;
                    poi_demand.push((
                        i,
                        entry.production * scaled_area,
                        entry.attraction * scaled_area,
                    ));
                }
            }
        }
    }

    for node in &mut net.nodes {
        let (production, attraction) = match node.kind {
            ActivityKind::Residential => {
                (params.residential_production, params.residential_attraction)
            }
            ActivityKind::Boundary => (params.boundary_production, params.boundary_attraction),
            _ => (0.0, 0.0),
        };
        node.production = production;
        node.attraction = attraction;
    }
    for (i, production, attraction) in poi_demand {
        net.nodes[i].production = production;
        net.nodes[i].attraction = attraction;
    }
}
