//! Unit tests for uf-traffic.

#[cfg(test)]
mod helpers {
    use uf_core::{GeoPoint, NodeId};
    use uf_net::{Graph, HighwayClass, LineFeature};

    pub fn p(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat)
    }

    /// Straight line a–b–c (feature 0) with a northern detour a–d–c
    /// (feature 1), all residential.  The direct path is always shorter.
    pub fn detour_features() -> Vec<LineFeature> {
        vec![
            LineFeature::new(vec![p(0.0, 0.0), p(0.01, 0.0), p(0.02, 0.0)], HighwayClass::Residential),
            LineFeature::new(vec![p(0.0, 0.0), p(0.01, 0.02), p(0.02, 0.0)], HighwayClass::Residential),
        ]
    }

    /// `(graph, a, c)` for the detour fixture.
    pub fn detour_graph() -> (Graph, NodeId, NodeId) {
        let graph = Graph::from_features(&detour_features());
        let a = graph.snap_to_node(p(0.0, 0.0)).unwrap();
        let c = graph.snap_to_node(p(0.02, 0.0)).unwrap();
        (graph, a, c)
    }

    /// A single residential segment (capacity 500): `(graph, a, b)`.
    pub fn single_street() -> (Graph, NodeId, NodeId) {
        let features = vec![LineFeature::new(vec![p(0.0, 0.0), p(0.01, 0.0)], HighwayClass::Residential)];
        let graph = Graph::from_features(&features);
        let a = graph.snap_to_node(p(0.0, 0.0)).unwrap();
        let b = graph.snap_to_node(p(0.01, 0.0)).unwrap();
        (graph, a, b)
    }
}

// ── Building rings ────────────────────────────────────────────────────────────

#[cfg(test)]
mod rings {
    use super::helpers::p;
    use crate::{normalize_rings, BuildingRing};

    #[test]
    fn open_rings_are_auto_closed() {
        let ring = BuildingRing::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]).unwrap();
        assert_eq!(ring.coords.first(), ring.coords.last());
        assert_eq!(ring.coords.len(), 4);
    }

    #[test]
    fn explicitly_closed_rings_stay_put() {
        let ring =
            BuildingRing::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)]).unwrap();
        assert_eq!(ring.coords.len(), 4);
    }

    #[test]
    fn fewer_than_three_distinct_vertices_dropped() {
        assert!(BuildingRing::new(vec![p(0.0, 0.0), p(1.0, 0.0)]).is_none());
        // Three vertices but only two distinct.
        assert!(BuildingRing::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)]).is_none());
    }

    #[test]
    fn normalize_counts_drops() {
        let raw = vec![
            vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)],
            vec![p(0.0, 0.0), p(1.0, 0.0)],
        ];
        let (rings, dropped) = normalize_rings(raw);
        assert_eq!(rings.len(), 1);
        assert_eq!(dropped, 1);
    }
}

// ── Closure detection ─────────────────────────────────────────────────────────

#[cfg(test)]
mod detection {
    use uf_core::FeatureId;
    use uf_net::LineFeature;

    use super::helpers::{detour_features, p};
    use crate::{detect_closures, normalize_rings};

    fn bboxes(features: &[LineFeature]) -> Vec<Option<uf_core::BBox>> {
        features.iter().map(LineFeature::bbox).collect()
    }

    #[test]
    fn square_over_a_vertex_closes_the_feature() {
        let features = detour_features();
        // Small square around the direct line's midpoint vertex (0.01, 0).
        let (rings, _) = normalize_rings(vec![vec![
            p(0.009, -0.001),
            p(0.011, -0.001),
            p(0.011, 0.001),
            p(0.009, 0.001),
        ]]);
        let closed = detect_closures(&features, &bboxes(&features), &rings);
        assert!(closed.contains(&FeatureId(0)));
        assert!(!closed.contains(&FeatureId(1)));
    }

    #[test]
    fn crossing_without_contained_vertices_still_closes() {
        let features = detour_features();
        // Thin square straddling the direct line between its vertices: no
        // polyline vertex inside, but segments cross.
        let (rings, _) = normalize_rings(vec![vec![
            p(0.004, -0.001),
            p(0.006, -0.001),
            p(0.006, 0.001),
            p(0.004, 0.001),
        ]]);
        let closed = detect_closures(&features, &bboxes(&features), &rings);
        assert!(closed.contains(&FeatureId(0)));
        assert_eq!(closed.len(), 1);
    }

    #[test]
    fn distant_building_closes_nothing() {
        let features = detour_features();
        let (rings, _) = normalize_rings(vec![vec![
            p(1.0, 1.0),
            p(1.001, 1.0),
            p(1.001, 1.001),
            p(1.0, 1.001),
        ]]);
        assert!(detect_closures(&features, &bboxes(&features), &rings).is_empty());
    }

    #[test]
    fn no_rings_closes_nothing() {
        let features = detour_features();
        assert!(detect_closures(&features, &bboxes(&features), &[]).is_empty());
    }

    #[test]
    fn degenerate_features_cannot_be_closed() {
        let features = vec![LineFeature::new(vec![p(0.01, 0.0)], uf_net::HighwayClass::Road)];
        let cache = vec![None];
        let (rings, _) = normalize_rings(vec![vec![
            p(0.0, -0.1),
            p(0.1, -0.1),
            p(0.1, 0.1),
            p(0.0, 0.1),
        ]]);
        assert!(detect_closures(&features, &cache, &rings).is_empty());
    }
}

// ── Assignment ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment {
    use rustc_hash::FxHashSet;
    use uf_core::FeatureId;
    use uf_demand::OdPair;

    use super::helpers::{detour_graph, single_street};
    use crate::{assign, AssignmentResult, DEFAULT_ITERATIONS};

    fn closed(ids: &[u32]) -> FxHashSet<FeatureId> {
        ids.iter().map(|&i| FeatureId(i)).collect()
    }

    #[test]
    fn empty_demand_is_all_free_flow() {
        let (graph, _, _) = detour_graph();
        let result = AssignmentResult::empty(&graph);
        assert_eq!(result.unreachable, 0);
        for m in &result.edge_metrics {
            assert_eq!(m.volume, 0);
            assert_eq!(m.delay, 1.0);
            assert!(!m.closed);
        }
        for fm in &result.feature_metrics {
            assert_eq!(fm.volume, 0);
            assert_eq!(fm.delay, 1.0);
        }
    }

    #[test]
    fn single_trip_loads_the_direct_line() {
        let (graph, a, c) = detour_graph();
        let od = [OdPair { origin: a, dest: c }];
        let result = assign(&graph, &od, &closed(&[]), DEFAULT_ITERATIONS);

        assert_eq!(result.unreachable, 0);
        // Two direct-line edges carry the trip; the detour is untouched.
        assert_eq!(result.feature_metrics[0].volume, 2);
        assert_eq!(result.feature_metrics[1].volume, 0);
    }

    #[test]
    fn closing_the_direct_line_reroutes() {
        let (graph, a, c) = detour_graph();
        let od = [OdPair { origin: a, dest: c }];
        let result = assign(&graph, &od, &closed(&[0]), DEFAULT_ITERATIONS);

        assert_eq!(result.unreachable, 0);
        let direct = result.feature_metrics[0];
        assert!(direct.closed);
        assert_eq!(direct.volume, 0);
        assert_eq!(direct.delay, 3.0);
        assert_eq!(result.feature_metrics[1].volume, 2);
    }

    #[test]
    fn full_cut_counts_unreachable() {
        let (graph, a, c) = detour_graph();
        let od = [OdPair { origin: a, dest: c }];
        let result = assign(&graph, &od, &closed(&[0, 1]), DEFAULT_ITERATIONS);

        assert_eq!(result.unreachable, 1);
        for fm in &result.feature_metrics {
            assert_eq!(fm.volume, 0);
            assert!(fm.closed);
            assert_eq!(fm.delay, 3.0);
        }
    }

    #[test]
    fn volume_is_conserved_per_path_edge() {
        let (graph, a, c) = detour_graph();
        let od = vec![OdPair { origin: a, dest: c }; 7];
        let result = assign(&graph, &od, &closed(&[]), DEFAULT_ITERATIONS);

        // Each routed trip contributes exactly one increment per path edge;
        // all 7 trips take the 2-edge direct path.
        let total: u32 = result.edge_metrics.iter().map(|m| m.volume).sum();
        assert_eq!(total, 14);
    }

    #[test]
    fn light_load_barely_moves_the_delay() {
        let (graph, a, b) = single_street();
        let od = vec![OdPair { origin: a, dest: b }; 100];
        let result = assign(&graph, &od, &closed(&[]), DEFAULT_ITERATIONS);

        // v/c = 100/500 → 1 + 0.15·0.2⁴ = 1.00024.
        let delay = result.feature_metrics[0].delay;
        assert!((delay - 1.00024).abs() < 1e-9, "got {delay}");
    }

    #[test]
    fn heavy_load_clamps_at_three() {
        let (graph, a, b) = single_street();
        let od = vec![OdPair { origin: a, dest: b }; 1000];
        let result = assign(&graph, &od, &closed(&[]), DEFAULT_ITERATIONS);

        // v/c = 2 → 1 + 0.15·16 = 3.4, clamped into [1, 3].
        assert_eq!(result.feature_metrics[0].delay, 3.0);
        assert_eq!(result.feature_metrics[0].volume, 1000);
    }

    #[test]
    fn delays_always_inside_bounds() {
        let (graph, a, c) = detour_graph();
        let od = vec![OdPair { origin: a, dest: c }; 500];
        for closed_set in [closed(&[]), closed(&[0]), closed(&[1])] {
            let result = assign(&graph, &od, &closed_set, DEFAULT_ITERATIONS);
            for m in &result.edge_metrics {
                assert!((1.0..=3.0).contains(&m.delay), "delay {} out of bounds", m.delay);
            }
        }
    }

    #[test]
    fn deterministic_for_fixed_od_order() {
        let (graph, a, c) = detour_graph();
        let od = vec![OdPair { origin: a, dest: c }; 25];
        let r1 = assign(&graph, &od, &closed(&[]), DEFAULT_ITERATIONS);
        let r2 = assign(&graph, &od, &closed(&[]), DEFAULT_ITERATIONS);
        assert_eq!(r1.edge_metrics, r2.edge_metrics);
        assert_eq!(r1.feature_metrics, r2.feature_metrics);
    }
}

// ── Reachability ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod reachability {
    use rustc_hash::FxHashSet;
    use uf_core::FeatureId;
    use uf_demand::OdPair;

    use super::helpers::detour_graph;
    use crate::count_unreachable;

    fn closed(ids: &[u32]) -> FxHashSet<FeatureId> {
        ids.iter().map(|&i| FeatureId(i)).collect()
    }

    #[test]
    fn open_graph_severs_nothing() {
        let (graph, a, c) = detour_graph();
        let probe = [OdPair { origin: a, dest: c }];
        assert_eq!(count_unreachable(&graph, &closed(&[]), &probe), 0);
    }

    #[test]
    fn closing_one_route_keeps_the_other() {
        let (graph, a, c) = detour_graph();
        let probe = [OdPair { origin: a, dest: c }];
        assert_eq!(count_unreachable(&graph, &closed(&[0]), &probe), 0);
    }

    #[test]
    fn closing_everything_severs_the_pair() {
        let (graph, a, c) = detour_graph();
        let probe = [OdPair { origin: a, dest: c }];
        assert_eq!(count_unreachable(&graph, &closed(&[0, 1]), &probe), 1);
    }

    #[test]
    fn severed_count_is_monotone_in_the_closure_set() {
        let (graph, a, c) = detour_graph();
        let probe = [OdPair { origin: a, dest: c }];
        let counts = [
            count_unreachable(&graph, &closed(&[]), &probe),
            count_unreachable(&graph, &closed(&[0]), &probe),
            count_unreachable(&graph, &closed(&[0, 1]), &probe),
        ];
        assert!(counts[0] <= counts[1] && counts[1] <= counts[2]);
    }

    #[test]
    fn empty_probe_counts_zero() {
        let (graph, _, _) = detour_graph();
        assert_eq!(count_unreachable(&graph, &closed(&[0, 1]), &[]), 0);
    }
}
