//! Route-pool construction.
//!
//! OD pairs are bucketed by destination so each destination costs exactly
//! one reverse Dijkstra tree, however many origins feed it.  Buckets are
//! processed in first-seen order and origins in input order, which keeps the
//! pool ordering deterministic for a fixed OD sample.

use rustc_hash::FxHashMap;

use uf_core::{EdgeId, NodeId};
use uf_demand::OdPair;
use uf_net::{router, Graph};

/// Hard cap on the number of routes in the pool.
pub const MAX_ROUTES: usize = 1_600;

/// Edge times are floored here before tree construction so a zero-cost edge
/// can never produce a degenerate loop.
const MIN_EDGE_TIME_S: f64 = 0.05;

/// One realized OD path: ordered edge ids from `origin` to `dest`.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub origin: NodeId,
    pub dest: NodeId,
    pub edges: Vec<EdgeId>,
}

/// Build up to [`MAX_ROUTES`] routes for the OD sample under the given edge
/// times (the final assignment's congested times; `+∞` = closed).
///
/// Falls back to one single-edge route per open edge when no OD path
/// survives (fully disconnected or empty demand), so the animation never
/// starves while open road remains.
pub fn build_route_pool(graph: &Graph, od: &[OdPair], edge_times: &[f64]) -> Vec<Route> {
    let times: Vec<f64> = edge_times
        .iter()
        .map(|&t| if t.is_finite() { t.max(MIN_EDGE_TIME_S) } else { f64::INFINITY })
        .collect();

    // Destination buckets in first-seen order.
    let mut bucket_order: Vec<NodeId> = Vec::new();
    let mut buckets: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    for pair in od {
        buckets
            .entry(pair.dest)
            .or_insert_with(|| {
                bucket_order.push(pair.dest);
                Vec::new()
            })
            .push(pair.origin);
    }

    let mut routes = Vec::new();
    'outer: for dest in bucket_order {
        let tree = router::reverse_tree(graph, &times, dest);
        for origin in &buckets[&dest] {
            let edges = tree.path_from(graph, *origin);
            if edges.is_empty() {
                continue;
            }
            routes.push(Route { origin: *origin, dest, edges });
            if routes.len() >= MAX_ROUTES {
                break 'outer;
            }
        }
    }

    if routes.is_empty() {
        log::debug!(target: "ROUTE_POOL", "no OD routes; falling back to per-edge routes");
        for (i, edge) in graph.edges.iter().enumerate() {
            if !times[i].is_finite() {
                continue;
            }
            routes.push(Route {
                origin: edge.from,
                dest: edge.to,
                edges: vec![EdgeId::from_index(i)],
            });
            if routes.len() >= MAX_ROUTES {
                break;
            }
        }
    }

    routes
}
