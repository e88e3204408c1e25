//! CSV output backend.

use std::path::{Path, PathBuf};

use csv::Writer;

use tdm_core::geo::wkt_segment;
use tdm_demand::{AccessibilityMatrix, RateSource, ResolvedRates, TripAgent, TripTable};
use tdm_grid::ZoneSystem;
use tdm_net::NetworkModel;

use crate::OutputResult;

/// Writes the demand-model tables into an output directory.
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    /// Use (and create if needed) `dir` as the output directory.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    fn writer(&self, file: &str) -> OutputResult<Writer<std::fs::File>> {
        Ok(Writer::from_path(self.dir.join(file))?)
    }

    /// Write `zone.csv`.  Demand totals are appended once distribution has
    /// run; before that the table carries only geometry and counts.
    pub fn write_zones(
        &self,
        zones: &ZoneSystem,
        totals: Option<(&[f64], &[f64])>,
    ) -> OutputResult<()> {
        let mut w = self.writer("zone.csv")?;
        let mut header = vec![
            "activity_zone_id",
            "name",
            "centroid_x",
            "centroid_y",
            "geometry",
            "centroid",
            "total_poi_count",
            "residential_poi_count",
            "office_poi_count",
            "shopping_poi_count",
            "school_poi_count",
            "parking_poi_count",
            "boundary_node_count",
        ];
        if totals.is_some() {
            header.push("total_production");
            header.push("total_attraction");
        }
        w.write_record(&header)?;

        for (i, zone) in zones.zones().iter().enumerate() {
            let mut row = vec![
                zone.id.to_string(),
                zone.label.clone(),
                zone.centroid.x.to_string(),
                zone.centroid.y.to_string(),
                zone.polygon_wkt.clone(),
                zone.centroid_wkt(),
                zone.poi_count.to_string(),
                zone.land_use.residential.to_string(),
                zone.land_use.office.to_string(),
                zone.land_use.shopping.to_string(),
                zone.land_use.school.to_string(),
                zone.land_use.parking.to_string(),
                zone.boundary_count.to_string(),
            ];
            if let Some((production, attraction)) = totals {
                row.push(production[i].to_string());
                row.push(attraction[i].to_string());
            }
            w.write_record(&row)?;
        }
        w.flush()?;
        Ok(())
    }

    /// Write `connector.csv` with GMNS-flavored link columns.
    pub fn write_connectors(&self, zones: &ZoneSystem) -> OutputResult<()> {
        let mut w = self.writer("connector.csv")?;
        w.write_record([
            "name",
            "link_id",
            "osm_way_id",
            "from_node_id",
            "to_node_id",
            "dir_flag",
            "length",
            "lanes",
            "free_speed",
            "capacity",
            "link_type_name",
            "link_type",
            "geometry",
        ])?;
        for zone in zones.zones() {
            for link in &zone.connectors {
                w.write_record([
                    String::new(),
                    link.id.to_string(),
                    String::new(),
                    link.from_node.to_string(),
                    link.to_node.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    link.kind_label.clone(),
                    "-1".to_owned(),
                    link.geometry_wkt.clone(),
                ])?;
            }
        }
        w.flush()?;
        Ok(())
    }

    /// Write `node.csv`: ingested nodes augmented with zone assignment and
    /// demand, followed by the synthetic centroid nodes.
    pub fn write_nodes(&self, net: &NetworkModel, zones: &ZoneSystem) -> OutputResult<()> {
        let mut w = self.writer("node.csv")?;
        w.write_record([
            "node_id",
            "osm_node_id",
            "x_coord",
            "y_coord",
            "activity_type",
            "poi_id",
            "is_boundary",
            "activity_zone_id",
            "production",
            "attraction",
            "activity_location_tab",
        ])?;
        for node in &net.nodes {
            w.write_record([
                node.id.to_string(),
                node.external_id.clone().unwrap_or_default(),
                node.position.x.to_string(),
                node.position.y.to_string(),
                node.activity_type.clone(),
                node.poi.map(|p| p.to_string()).unwrap_or_default(),
                if node.is_boundary { "1" } else { "0" }.to_owned(),
                node.zone.map(|z| z.to_string()).unwrap_or_default(),
                node.production.to_string(),
                node.attraction.to_string(),
                node.kind.label().to_owned(),
            ])?;
        }
        for node in zones.centroid_nodes() {
            w.write_record([
                node.id.to_string(),
                String::new(),
                node.position.x.to_string(),
                node.position.y.to_string(),
                node.kind.label().to_owned(),
                String::new(),
                "0".to_owned(),
                node.zone.map(|z| z.to_string()).unwrap_or_default(),
                "0".to_owned(),
                "0".to_owned(),
                String::new(),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    /// Write `poi.csv` with the assigned zone and the (outlier-adjusted)
    /// area.
    pub fn write_pois(&self, net: &NetworkModel) -> OutputResult<()> {
        let mut w = self.writer("poi.csv")?;
        w.write_record(["poi_id", "building", "centroid", "area", "activity_zone_id"])?;
        for poi in &net.pois {
            w.write_record([
                poi.id.to_string(),
                poi.kind.clone(),
                poi.position.wkt(),
                poi.area_sqm.to_string(),
                poi.zone.map(|z| z.to_string()).unwrap_or_default(),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    /// Write `poi_trip_rate.csv`: the rates in effect for the selected
    /// purpose, with a 1/0 note marking table-resolved vs fallback.
    pub fn write_trip_rates(&self, rates: &ResolvedRates) -> OutputResult<()> {
        let mut w = self.writer("poi_trip_rate.csv")?;
        let purpose = rates.purpose.index();
        w.write_record([
            "poi_type_id".to_owned(),
            "building".to_owned(),
            "unit_of_measure".to_owned(),
            "trip_purpose".to_owned(),
            format!("production_rate{purpose}"),
            format!("attraction_rate{purpose}"),
            "production_notes".to_owned(),
            "attraction_notes".to_owned(),
        ])?;
        for (i, (kind, entry)) in rates.sorted_entries().into_iter().enumerate() {
            w.write_record([
                i.to_string(),
                kind.to_owned(),
                "1,000 Sq. Ft. GFA".to_owned(),
                purpose.to_string(),
                entry.production.to_string(),
                entry.attraction.to_string(),
                note(entry.production_source).to_owned(),
                note(entry.attraction_source).to_owned(),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    /// Write `accessibility.csv`: one row per ordered zone pair.
    pub fn write_accessibility(
        &self,
        zones: &ZoneSystem,
        access: &AccessibilityMatrix,
    ) -> OutputResult<()> {
        let mut w = self.writer("accessibility.csv")?;
        w.write_record([
            "o_zone_id",
            "o_zone_name",
            "d_zone_id",
            "d_zone_name",
            "accessibility",
            "geometry",
        ])?;
        for (i, origin) in zones.zones().iter().enumerate() {
            for (j, destination) in zones.zones().iter().enumerate() {
                w.write_record([
                    origin.id.to_string(),
                    origin.label.clone(),
                    destination.id.to_string(),
                    destination.label.clone(),
                    access.distances.get(i, j).to_string(),
                    wkt_segment(origin.centroid, destination.centroid),
                ])?;
            }
        }
        w.flush()?;
        Ok(())
    }

    /// Write `demand.csv`: zone-pair volumes rounded up to whole trips.
    pub fn write_demand(
        &self,
        zones: &ZoneSystem,
        access: &AccessibilityMatrix,
        trips: &TripTable,
    ) -> OutputResult<()> {
        let mut w = self.writer("demand.csv")?;
        w.write_record([
            "o_zone_id",
            "o_zone_name",
            "d_zone_id",
            "d_zone_name",
            "accessibility",
            "volume",
            "geometry",
        ])?;
        for (i, origin) in zones.zones().iter().enumerate() {
            for (j, destination) in zones.zones().iter().enumerate() {
                w.write_record([
                    origin.id.to_string(),
                    origin.label.clone(),
                    destination.id.to_string(),
                    destination.label.clone(),
                    access.distances.get(i, j).to_string(),
                    (trips.volumes.get(i, j).ceil() as u64).to_string(),
                    wkt_segment(origin.centroid, destination.centroid),
                ])?;
            }
        }
        w.flush()?;
        Ok(())
    }

    /// Write `input_agent.csv`.
    pub fn write_agents(&self, agents: &[TripAgent], net: &NetworkModel) -> OutputResult<()> {
        let mut w = self.writer("input_agent.csv")?;
        w.write_record([
            "agent_id",
            "agent_type",
            "o_node_id",
            "d_node_id",
            "o_osm_node_id",
            "d_osm_node_id",
            "o_zone_id",
            "d_zone_id",
            "geometry",
            "departure_time",
        ])?;
        for agent in agents {
            let origin = net.node(agent.origin_node);
            let destination = net.node(agent.destination_node);
            let geometry = match (origin, destination) {
                (Some(o), Some(d)) => wkt_segment(o.position, d.position),
                _ => String::new(),
            };
            w.write_record([
                agent.id.to_string(),
                agent.mode.to_owned(),
                agent.origin_node.to_string(),
                agent.destination_node.to_string(),
                origin
                    .and_then(|n| n.external_id.clone())
                    .unwrap_or_default(),
                destination
                    .and_then(|n| n.external_id.clone())
                    .unwrap_or_default(),
                agent.origin_zone.to_string(),
                agent.destination_zone.to_string(),
                geometry,
                agent.departure.clone(),
            ])?;
        }
        w.flush()?;
        Ok(())
    }
}

fn note(source: RateSource) -> &'static str {
    match source {
        RateSource::Table => "1",
        RateSource::Fallback => "0",
    }
}
