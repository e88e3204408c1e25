//! Unit tests for grid partitioning.

#[cfg(test)]
mod sizing {
    use crate::{GridError, GridSizing};

    #[test]
    fn resolves_modes() {
        assert_eq!(
            GridSizing::from_options(None, None, None, None).unwrap(),
            GridSizing::Default
        );
        assert_eq!(
            GridSizing::from_options(Some(4), Some(3), None, None).unwrap(),
            GridSizing::ByBlockCount { x_blocks: 4, y_blocks: 3 }
        );
        assert_eq!(
            GridSizing::from_options(None, None, Some(500.0), Some(250.0)).unwrap(),
            GridSizing::ByCellSize { width_m: 500.0, height_m: 250.0 }
        );
    }

    #[test]
    fn both_pairs_conflict() {
        let err = GridSizing::from_options(Some(2), Some(2), Some(500.0), Some(500.0)).unwrap_err();
        assert!(matches!(err, GridError::SizingConflict));
    }

    #[test]
    fn partial_pairs_rejected() {
        assert!(matches!(
            GridSizing::from_options(Some(2), None, None, None),
            Err(GridError::IncompleteSizing { .. })
        ));
        assert!(matches!(
            GridSizing::from_options(None, None, None, Some(500.0)),
            Err(GridError::IncompleteSizing { .. })
        ));
    }
}

#[cfg(test)]
mod partitioning {
    use tdm_core::{GridPoint, NodeId, PoiId, ZoneId};
    use tdm_net::{ActivityKind, NetworkModel, Node, Poi};

    use crate::{GridConfig, GridError, GridPartitioner, GridSizing};

    fn node(id: u64, x: f64, y: f64, kind: ActivityKind) -> Node {
        let mut n = Node::new(NodeId(id), GridPoint::new(x, y), kind);
        n.is_boundary = kind == ActivityKind::Boundary;
        n
    }

    /// Four demand nodes on the corners of a 0.01° square.
    fn square_network() -> NetworkModel {
        let mut net = NetworkModel::new();
        net.add_node(node(1, 0.0, 0.0, ActivityKind::Poi));
        net.add_node(node(2, 0.01, 0.0, ActivityKind::Residential));
        net.add_node(node(3, 0.0, 0.01, ActivityKind::Poi));
        net.add_node(node(4, 0.01, 0.01, ActivityKind::Residential));
        net
    }

    fn two_by_two() -> GridConfig {
        GridConfig::new(GridSizing::ByBlockCount { x_blocks: 2, y_blocks: 2 })
            .with_latitude(30.0)
    }

    #[test]
    fn zone_count_and_labels() {
        let mut net = square_network();
        let zs = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();

        assert_eq!(zs.real_zone_count(), 4);
        assert_eq!(zs.gate_zone_count(), 8);
        assert_eq!(zs.len(), 12);

        let labels: Vec<&str> = zs.zones().iter().map(|z| z.label.as_str()).collect();
        assert_eq!(&labels[..4], &["A1", "A2", "B1", "B2"]);
        assert_eq!(labels[4], "Gate1");
        assert_eq!(labels[11], "Gate8");
        assert!(zs.zones()[..4].iter().all(|z| !z.is_gate));
        assert!(zs.zones()[4..].iter().all(|z| z.is_gate));
    }

    #[test]
    fn grid_tiles_expanded_bounding_box() {
        let mut net = square_network();
        let zs = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();

        let (xb, yb) = (zs.x_blocks as usize, zs.y_blocks as usize);
        for row in 0..yb {
            for col in 0..xb {
                let z = &zs.zones()[row * xb + col];
                if col + 1 < xb {
                    let right = &zs.zones()[row * xb + col + 1];
                    assert_eq!(z.x_max, right.x_min, "gap/overlap between columns");
                }
                if row + 1 < yb {
                    let below = &zs.zones()[(row + 1) * xb + col];
                    assert_eq!(z.y_min, below.y_max, "gap/overlap between rows");
                }
            }
        }
        assert_eq!(zs.zones()[0].x_min, zs.x_min);
        assert_eq!(zs.zones()[0].y_max, zs.y_max);
        let last = &zs.zones()[xb * yb - 1];
        assert!((last.x_max - zs.x_max).abs() < 1e-9);
        assert!((last.y_min - zs.y_min).abs() < 1e-9);
    }

    #[test]
    fn membership_is_exclusive_first_zone_wins() {
        // Default sizing puts cell edges at multiples of 0.006°, so a node
        // at x = 0.006 sits exactly on the edge shared by A1 and A2.
        let mut net = NetworkModel::new();
        net.add_node(node(1, 0.0, 0.0, ActivityKind::Poi));
        net.add_node(node(2, 0.01, 0.01, ActivityKind::Poi));
        net.add_node(node(5, 0.006, 0.009, ActivityKind::Poi));
        let zs = GridPartitioner::new(GridConfig::default().with_latitude(30.0))
            .partition(&mut net)
            .unwrap();

        let holders: Vec<ZoneId> = zs
            .zones()
            .iter()
            .filter(|z| z.nodes.contains(&NodeId(5)))
            .map(|z| z.id)
            .collect();
        assert_eq!(holders, vec![ZoneId(1)]);

        let total_members: usize = zs.zones().iter().map(|z| z.nodes.len()).sum();
        assert_eq!(total_members, 3);
    }

    #[test]
    fn assigns_nodes_and_pois_to_expected_cells() {
        let mut net = square_network();
        net.add_poi(Poi::new(
            PoiId(401),
            GridPoint::new(0.001, 0.009),
            "school".to_owned(),
            5000.0,
        ));
        let zs = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();

        assert_eq!(net.node(NodeId(3)).unwrap().zone, Some(ZoneId(1)));
        assert_eq!(net.node(NodeId(4)).unwrap().zone, Some(ZoneId(2)));
        assert_eq!(net.node(NodeId(1)).unwrap().zone, Some(ZoneId(3)));
        assert_eq!(net.node(NodeId(2)).unwrap().zone, Some(ZoneId(4)));

        assert_eq!(net.pois[0].zone, Some(ZoneId(1)));
        let a1 = zs.zone(ZoneId(1)).unwrap();
        assert_eq!(a1.pois, vec![PoiId(401)]);
        assert_eq!(a1.poi_count, 1);
        assert_eq!(a1.land_use.school, 1);
        assert_eq!(a1.land_use.residential, 0);
    }

    #[test]
    fn non_activity_nodes_stay_unassigned() {
        let mut net = square_network();
        net.add_node(node(6, 0.002, 0.002, ActivityKind::None));
        let _ = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();
        assert_eq!(net.node(NodeId(6)).unwrap().zone, None);
    }

    #[test]
    fn occupied_zone_centroid_is_node_mean_empty_is_rect_center() {
        let mut net = square_network();
        net.add_node(node(7, 0.002, 0.008, ActivityKind::Poi));
        let zs = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();

        // A1 holds nodes 3 (0, 0.01) and 7 (0.002, 0.008).
        let a1 = zs.zone(ZoneId(1)).unwrap();
        assert!((a1.centroid.x - 0.001).abs() < 1e-12);
        assert!((a1.centroid.y - 0.009).abs() < 1e-12);

        // Gates never hold interior nodes; pick an empty real zone instead.
        let mut empty_net = NetworkModel::new();
        empty_net.add_node(node(1, 0.0, 0.0, ActivityKind::Poi));
        empty_net.add_node(node(2, 0.01, 0.01, ActivityKind::Poi));
        let zs2 = GridPartitioner::new(two_by_two()).partition(&mut empty_net).unwrap();
        let a1 = zs2.zone(ZoneId(1)).unwrap();
        assert!(a1.nodes.is_empty());
        assert_eq!(a1.centroid, a1.rect_center());
    }

    #[test]
    fn centroid_nodes_are_offset_synthetics() {
        let mut net = square_network();
        let zs = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();
        for zone in zs.zones() {
            let cn = &zone.centroid_node;
            assert_eq!(cn.id, NodeId(100_000 + zone.id.0 as u64));
            assert_eq!(cn.kind, ActivityKind::Centroid);
            assert_eq!(cn.zone, Some(zone.id));
            assert_eq!(cn.position, zone.centroid);
        }
    }

    #[test]
    fn boundary_nodes_go_to_nearest_gate() {
        let mut net = square_network();
        // Clearly left of the grid, in the lower half.
        net.add_node(node(10, -0.002, 0.0025, ActivityKind::Boundary));
        let zs = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();

        let zone = zs.zone(net.node(NodeId(10)).unwrap().zone.unwrap()).unwrap();
        assert!(zone.is_gate);
        assert_eq!(zone.label, "Gate1");
        assert_eq!(zone.boundary_count, 1);
        assert_eq!(zone.nodes, vec![NodeId(10)]);
        // Gate centroid sits on the outward edge at the span midpoint.
        assert_eq!(zone.centroid.x, zone.x_min);
        assert!((zone.centroid.y - (zone.y_min + zone.y_max) / 2.0).abs() < 1e-12);
        assert!(zone.polygon_wkt.is_empty());
    }

    #[test]
    fn corner_tie_prefers_left_ring_over_lower() {
        // Default sizing anchors the grid corner exactly at (0, 0), so a
        // boundary node there is equidistant (zero) from the left and lower
        // edges.  Ring scan order assigns it to the left ring.
        let mut net = NetworkModel::new();
        net.add_node(node(1, 0.0, 0.0, ActivityKind::Poi));
        net.add_node(node(2, 0.01, 0.01, ActivityKind::Poi));
        net.add_node(node(11, 0.0, 0.0, ActivityKind::Boundary));
        let zs = GridPartitioner::new(GridConfig::default().with_latitude(30.0))
            .partition(&mut net)
            .unwrap();
        let zone = zs.zone(net.node(NodeId(11)).unwrap().zone.unwrap()).unwrap();
        assert_eq!(zone.label, "Gate1"); // bottom segment of the left ring
    }

    #[test]
    fn connectors_link_members_to_centroid_and_are_capped() {
        let mut net = NetworkModel::new();
        for i in 0..60 {
            net.add_node(node(i + 1, 0.001 + (i as f64) * 1e-5, 0.001, ActivityKind::Poi));
        }
        net.add_node(node(100, 0.011, 0.011, ActivityKind::Residential));
        let zs = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap();

        let crowded = zs
            .zones()
            .iter()
            .find(|z| z.nodes.len() == 60)
            .expect("all 60 nodes share one cell");
        assert_eq!(crowded.connectors.len(), 50);

        let first = &crowded.connectors[0];
        assert_eq!(first.id.0, crowded.id.0 as u64 * 100_000);
        assert_eq!(first.to_node, crowded.centroid_node.id);
        assert_eq!(first.kind_label, "connector with poi");
        assert!(first.geometry_wkt.starts_with("LINESTRING ("));
    }

    #[test]
    fn default_sizing_expands_degenerate_extent() {
        let mut net = NetworkModel::new();
        net.add_node(node(1, 0.0, 0.0, ActivityKind::Poi));
        net.add_node(node(2, 0.01, 0.0, ActivityKind::Poi));
        let zs = GridPartitioner::new(GridConfig::default().with_latitude(30.0))
            .partition(&mut net)
            .unwrap();

        assert_eq!(zs.x_blocks, 2);
        assert_eq!(zs.y_blocks, 1);
        assert_eq!(zs.len(), 2 + 2 * 3);
        // Two single-node zones.
        assert_eq!(net.node(NodeId(1)).unwrap().zone, Some(ZoneId(1)));
        assert_eq!(net.node(NodeId(2)).unwrap().zone, Some(ZoneId(2)));
    }

    #[test]
    fn physical_cell_size_converts_through_latitude_band() {
        let mut net = square_network();
        let config = GridConfig::new(GridSizing::ByCellSize {
            width_m: 1000.0,
            height_m: 1000.0,
        })
        .with_latitude(30.0);
        let zs = GridPartitioner::new(config).partition(&mut net).unwrap();

        // 1000 m at the 30° band (96.49 km/°) is round(1/96.49, 5) = 0.01036°.
        let zone = &zs.zones()[0];
        assert!(((zone.x_max - zone.x_min) - 0.01036).abs() < 1e-9);
    }

    #[test]
    fn explicit_latitude_is_snapped() {
        let mut net = square_network();
        let config = two_by_two().with_latitude(52.0);
        let zs = GridPartitioner::new(config).partition(&mut net).unwrap();
        assert_eq!(zs.latitude.latitude_deg, 51.0);
        assert_eq!(zs.latitude.km_per_degree, 69.47);
    }

    #[test]
    fn boundary_only_network_is_rejected() {
        let mut net = NetworkModel::new();
        net.add_node(node(1, 0.0, 0.0, ActivityKind::Boundary));
        let err = GridPartitioner::new(two_by_two()).partition(&mut net).unwrap_err();
        assert!(matches!(err, GridError::NoInteriorNodes));
    }
}
