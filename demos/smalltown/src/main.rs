//! smalltown — smallest runnable demo of the rust_tdm demand pipeline.
//!
//! A synthetic 12-node town inspired by the geography of Mobile, Alabama:
//! a residential block, a school, a supermarket, an office, and two freeway
//! gates on the study-area boundary.  The full pipeline runs once and the
//! eight output tables land in `./output`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use tdm_core::TripPurpose;
use tdm_grid::{GridConfig, GridSizing};
use tdm_net::{read_nodes_reader, read_pois_reader, NetworkModel};
use tdm_output::CsvExporter;
use tdm_pipeline::{DemandPipeline, PipelineConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const OUTPUT_DIR: &str = "output";
const X_BLOCKS: u32 = 3;
const Y_BLOCKS: u32 = 3;

// ── Input tables ──────────────────────────────────────────────────────────────

const NODE_CSV: &str = "\
node_id,osm_node_id,x_coord,y_coord,activity_type,poi_id,is_boundary
1,9001,-88.0430,30.6940,residential,,0
2,9002,-88.0425,30.6945,residential,,0
3,9003,-88.0420,30.6950,residential,,0
4,9004,-88.0380,30.6952,poi,401,0
5,9005,-88.0355,30.6940,poi,402,0
6,9006,-88.0340,30.6925,poi,403,0
7,9007,-88.0395,30.6930,residential,,0
8,9008,-88.0370,30.6915,residential,,0
9,9009,-88.0410,30.6910,poi,404,0
10,9010,-88.0445,30.6935,,,1
11,9011,-88.0330,30.6948,,,1
12,9012,-88.0390,30.6905,,,1
";

const POI_CSV: &str = "\
poi_id,building,centroid,area
401,school,POINT (-88.0380 30.6952),5200
402,supermarket,POINT (-88.0355 30.6940),3100
403,office,POINT (-88.0340 30.6925),7800
404,apartments,POINT (-88.0410 30.6910),4400
";

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let started = Instant::now();

    let mut net = NetworkModel::new();
    read_nodes_reader(Cursor::new(NODE_CSV), &mut net)?;
    read_pois_reader(Cursor::new(POI_CSV), &mut net)?;
    println!(
        "ingested {} nodes, {} POIs",
        net.node_count(),
        net.poi_count()
    );

    let config = PipelineConfig {
        grid: GridConfig::new(GridSizing::ByBlockCount {
            x_blocks: X_BLOCKS,
            y_blocks: Y_BLOCKS,
        }),
        purpose: Some(TripPurpose::HomeBasedWork),
        seed: SEED,
        ..PipelineConfig::default()
    };
    let model = DemandPipeline::new(config).run(&mut net)?;

    println!(
        "{} zones ({} real, {} gates), {} agents",
        model.zones.len(),
        model.zones.real_zone_count(),
        model.zones.gate_zone_count(),
        model.agents.len()
    );

    let exporter = CsvExporter::new(Path::new(OUTPUT_DIR))?;
    exporter.write_zones(
        &model.zones,
        Some((&model.trips.zone_production, &model.trips.zone_attraction)),
    )?;
    exporter.write_connectors(&model.zones)?;
    exporter.write_nodes(&net, &model.zones)?;
    exporter.write_pois(&net)?;
    exporter.write_trip_rates(&model.rates)?;
    exporter.write_accessibility(&model.zones, &model.access)?;
    exporter.write_demand(&model.zones, &model.access, &model.trips)?;
    exporter.write_agents(&model.agents, &net)?;

    println!(
        "wrote tables to ./{OUTPUT_DIR} in {:.1} ms",
        started.elapsed().as_secs_f64() * 1e3
    );
    Ok(())
}
