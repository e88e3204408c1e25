//! End-to-end pipeline tests.

#[cfg(test)]
mod end_to_end {
    use tdm_core::{GridPoint, NodeId, PoiId, TripPurpose, ZoneId};
    use tdm_grid::GridConfig;
    use tdm_net::{ActivityKind, NetworkModel, Node, Poi};

    use crate::{DemandPipeline, PipelineConfig, PipelineError};

    /// Two `poi` nodes 0.01° apart, each with a 5000 m² school.
    fn two_school_network() -> NetworkModel {
        let mut net = NetworkModel::new();
        for (i, x) in [0.0, 0.01].into_iter().enumerate() {
            let mut n = Node::new(
                NodeId(i as u64 + 1),
                GridPoint::new(x, 0.0),
                ActivityKind::Poi,
            );
            n.poi = Some(PoiId(400 + i as u64));
            net.add_node(n);
            net.add_poi(Poi::new(
                PoiId(400 + i as u64),
                GridPoint::new(x, 0.0),
                "school".to_owned(),
                5000.0,
            ));
        }
        net
    }

    fn config(seed: u64) -> PipelineConfig {
        PipelineConfig {
            grid: GridConfig::default().with_latitude(30.0),
            purpose: Some(TripPurpose::HomeBasedWork),
            seed,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn two_school_scenario() {
        let mut net = two_school_network();
        let model = DemandPipeline::new(config(42)).run(&mut net).unwrap();

        // Default sizing splits the two nodes into two single-node zones.
        assert_eq!(net.node(NodeId(1)).unwrap().zone, Some(ZoneId(1)));
        assert_eq!(net.node(NodeId(2)).unwrap().zone, Some(ZoneId(2)));
        let z1 = model.zones.zone(ZoneId(1)).unwrap();
        let z2 = model.zones.zone(ZoneId(2)).unwrap();
        assert_eq!(z1.nodes.len(), 1);
        assert_eq!(z2.nodes.len(), 1);

        // Both nodes carry school-rate demand.
        for id in [NodeId(1), NodeId(2)] {
            let node = net.node(id).unwrap();
            assert!(node.production > 0.0, "production at {id}");
            assert!(node.attraction > 0.0, "attraction at {id}");
        }

        // Nonzero symmetric centroid distance.
        let i = model.zones.index_of(ZoneId(1)).unwrap();
        let j = model.zones.index_of(ZoneId(2)).unwrap();
        let forward = model.access.distances.get(i, j);
        assert!(forward > 0.0);
        assert_eq!(forward, model.access.distances.get(j, i));

        // At least one agent travels between the two occupied zones.
        assert!(model
            .agents
            .iter()
            .any(|a| a.origin_zone == ZoneId(1) && a.destination_zone == ZoneId(2)));
    }

    #[test]
    fn agent_counts_match_rounded_demand() {
        let mut net = two_school_network();
        let model = DemandPipeline::new(config(42)).run(&mut net).unwrap();

        let total: usize = (0..model.zones.len())
            .flat_map(|i| (0..model.zones.len()).map(move |j| (i, j)))
            .map(|(i, j)| model.trips.volumes.get(i, j).ceil() as usize)
            .sum();
        assert_eq!(model.agents.len(), total);
    }

    #[test]
    fn same_seed_and_input_reproduce_everything() {
        let mut net_a = two_school_network();
        let model_a = DemandPipeline::new(config(7)).run(&mut net_a).unwrap();
        let mut net_b = two_school_network();
        let model_b = DemandPipeline::new(config(7)).run(&mut net_b).unwrap();

        let zones_a: Vec<_> = net_a.nodes.iter().map(|n| n.zone).collect();
        let zones_b: Vec<_> = net_b.nodes.iter().map(|n| n.zone).collect();
        assert_eq!(zones_a, zones_b);
        assert_eq!(model_a.trips.volumes, model_b.trips.volumes);
        assert_eq!(model_a.agents, model_b.agents);
    }

    #[test]
    fn different_seed_changes_sampling_only() {
        let mut net_a = two_school_network();
        let model_a = DemandPipeline::new(config(1)).run(&mut net_a).unwrap();
        let mut net_b = two_school_network();
        let model_b = DemandPipeline::new(config(2)).run(&mut net_b).unwrap();

        assert_eq!(model_a.trips.volumes, model_b.trips.volumes);
        assert_eq!(model_a.agents.len(), model_b.agents.len());
    }

    #[test]
    fn stage_errors_surface_through_the_pipeline() {
        // A boundary-only network cannot be partitioned.
        let mut net = NetworkModel::new();
        let mut n = Node::new(NodeId(1), GridPoint::new(0.0, 0.0), ActivityKind::Boundary);
        n.is_boundary = true;
        net.add_node(n);

        let err = DemandPipeline::new(config(0)).run(&mut net).unwrap_err();
        assert!(matches!(err, PipelineError::Grid(_)));
    }

    #[test]
    fn outlier_poi_produces_no_demand_contribution() {
        let mut net = two_school_network();
        // Replace the second school with an oversized footprint.
        net.pois[1] = Poi::new(
            PoiId(401),
            GridPoint::new(0.01, 0.0),
            "school".to_owned(),
            95_000.0,
        );
        let model = DemandPipeline::new(config(3)).run(&mut net).unwrap();

        assert_eq!(net.pois[1].area_sqft, 0.0);
        let node = net.node(NodeId(2)).unwrap();
        assert_eq!(node.production, 0.0);
        assert_eq!(node.attraction, 0.0);

        // The occupied zone still exists but contributes no attraction.
        let j = model.zones.index_of(ZoneId(2)).unwrap();
        assert_eq!(model.trips.zone_attraction[j], 0.0);
    }
}
