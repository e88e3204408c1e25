//! Integration-style tests writing tables into a temp directory.

#[cfg(test)]
mod export {
    use tdm_core::{GridPoint, NodeId, PoiId, SimRng, TripPurpose};
    use tdm_demand::{
        assign_node_demand, compute_accessibility, distribute, sample_agents, DemandParams,
        FrictionCoefficients, RateBook, ResolvedRates,
    };
    use tdm_grid::{GridConfig, GridPartitioner, GridSizing, ZoneSystem};
    use tdm_net::{ActivityKind, NetworkModel, Node, Poi};

    use crate::CsvExporter;

    struct Fixture {
        net: NetworkModel,
        zones: ZoneSystem,
        rates: ResolvedRates,
        access: tdm_demand::AccessibilityMatrix,
        trips: tdm_demand::TripTable,
        agents: Vec<tdm_demand::TripAgent>,
    }

    fn fixture() -> Fixture {
        let mut net = NetworkModel::new();
        for (i, (x, y)) in [(0.0, 0.0), (0.01, 0.0), (0.0, 0.01), (0.01, 0.01)]
            .into_iter()
            .enumerate()
        {
            let mut n = Node::new(NodeId(i as u64 + 1), GridPoint::new(x, y), ActivityKind::Poi);
            n.poi = Some(PoiId(400 + i as u64));
            net.add_node(n);
            net.add_poi(Poi::new(
                PoiId(400 + i as u64),
                GridPoint::new(x, y),
                "school".to_owned(),
                5000.0,
            ));
        }
        let mut boundary = Node::new(
            NodeId(9),
            GridPoint::new(-0.002, 0.0025),
            ActivityKind::Boundary,
        );
        boundary.is_boundary = true;
        net.add_node(boundary);

        let config = GridConfig::new(GridSizing::ByBlockCount { x_blocks: 2, y_blocks: 2 })
            .with_latitude(30.0);
        let zones = GridPartitioner::new(config).partition(&mut net).unwrap();
        let rates = ResolvedRates::resolve(
            &RateBook::builtin(),
            &net.pois,
            Some(TripPurpose::HomeBasedWork),
        );
        assign_node_demand(&mut net, &rates, &DemandParams::default());
        let access = compute_accessibility(&zones, net.mean_latitude(), None);
        let coefficients = FrictionCoefficients::defaults_for(TripPurpose::HomeBasedWork);
        let trips = distribute(&zones, &net, &access, coefficients).unwrap();
        let agents = sample_agents(&trips, &zones, &net, &mut SimRng::new(42)).unwrap();
        Fixture { net, zones, rates, access, trips, agents }
    }

    fn read_lines(dir: &std::path::Path, file: &str) -> Vec<String> {
        std::fs::read_to_string(dir.join(file))
            .unwrap_or_else(|e| panic!("missing {file}: {e}"))
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn writes_all_tables() {
        let f = fixture();
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();

        exporter
            .write_zones(&f.zones, Some((&f.trips.zone_production, &f.trips.zone_attraction)))
            .unwrap();
        exporter.write_connectors(&f.zones).unwrap();
        exporter.write_nodes(&f.net, &f.zones).unwrap();
        exporter.write_pois(&f.net).unwrap();
        exporter.write_trip_rates(&f.rates).unwrap();
        exporter.write_accessibility(&f.zones, &f.access).unwrap();
        exporter.write_demand(&f.zones, &f.access, &f.trips).unwrap();
        exporter.write_agents(&f.agents, &f.net).unwrap();

        let n = f.zones.len();

        let zone_lines = read_lines(dir.path(), "zone.csv");
        assert_eq!(zone_lines.len(), 1 + n);
        assert!(zone_lines[0].starts_with("activity_zone_id,name,centroid_x"));
        assert!(zone_lines[0].ends_with("total_production,total_attraction"));
        assert!(zone_lines[1].contains("POLYGON (("));

        let access_lines = read_lines(dir.path(), "accessibility.csv");
        assert_eq!(access_lines.len(), 1 + n * n);

        let demand_lines = read_lines(dir.path(), "demand.csv");
        assert_eq!(demand_lines.len(), 1 + n * n);

        let agent_lines = read_lines(dir.path(), "input_agent.csv");
        assert_eq!(agent_lines.len(), 1 + f.agents.len());
        assert!(agent_lines[1].contains(",v,"));
        assert!(agent_lines[1].contains("LINESTRING ("));

        let rate_lines = read_lines(dir.path(), "poi_trip_rate.csv");
        assert_eq!(rate_lines.len(), 2); // single land-use type
        assert!(rate_lines[0].contains("production_rate1,attraction_rate1"));
        assert!(rate_lines[1].contains("school"));
        assert!(rate_lines[1].contains("1.37"));

        // One connector per demand node (4 POI + 1 boundary member).
        let connector_lines = read_lines(dir.path(), "connector.csv");
        assert_eq!(connector_lines.len(), 1 + 5);

        // Augmented node table carries the 5 ingested nodes plus one
        // synthetic centroid node per zone.
        let node_lines = read_lines(dir.path(), "node.csv");
        assert_eq!(node_lines.len(), 1 + 5 + n);
        assert!(node_lines.iter().any(|l| l.contains("centroid node")));

        let poi_lines = read_lines(dir.path(), "poi.csv");
        assert_eq!(poi_lines.len(), 1 + 4);
        assert!(poi_lines[1].contains("POINT ("));
    }

    #[test]
    fn zone_table_without_totals_omits_demand_columns() {
        let f = fixture();
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path()).unwrap();
        exporter.write_zones(&f.zones, None).unwrap();

        let lines = read_lines(dir.path(), "zone.csv");
        assert!(lines[0].ends_with("boundary_node_count"));
    }
}
