//! Iterative all-or-nothing traffic assignment with BPR delay.
//!
//! Each iteration routes every OD pair over the travel times produced by the
//! previous iteration's volumes, then swaps in the fresh volumes.  Two
//! iterations are enough for the visual-overlay use case: the first spreads
//! trips over free-flow shortest paths, the second reacts to the congestion
//! those trips created.
//!
//! The whole computation is deterministic for a fixed OD order: Dijkstra's
//! tie-breaking is fixed by the adjacency layout and nothing here consumes
//! randomness.

use rustc_hash::FxHashSet;

use uf_core::FeatureId;
use uf_demand::OdPair;
use uf_net::{router, Graph};

use crate::metrics::{delay_factor, EdgeMetric, FeatureMetric};

/// BPR parameters: `t = t0 * (1 + ALPHA * (v/c)^BETA)`.
const BPR_ALPHA: f64 = 0.15;
const BPR_BETA: i32 = 4;

/// Default number of assignment iterations.
pub const DEFAULT_ITERATIONS: usize = 2;

/// The output of one assignment run.
#[derive(Clone, Debug)]
pub struct AssignmentResult {
    /// Indexed by `EdgeId`.
    pub edge_metrics: Vec<EdgeMetric>,
    /// Indexed by feature position; defaults for features without edges.
    pub feature_metrics: Vec<FeatureMetric>,
    /// OD pairs with no open path in the final iteration.
    pub unreachable: usize,
}

impl AssignmentResult {
    /// All-free-flow result for a graph with no demand.
    pub fn empty(graph: &Graph) -> AssignmentResult {
        assign(graph, &[], &FxHashSet::default(), 1)
    }

    /// Congested edge times of the final iteration, the input for route-pool
    /// construction.
    pub fn edge_times(&self) -> Vec<f64> {
        self.edge_metrics.iter().map(|m| m.time_s).collect()
    }
}

/// BPR travel times for the given volumes; closed edges get `+∞`.
fn bpr_times(graph: &Graph, volumes: &[u32], closed_edges: &[bool]) -> Vec<f64> {
    graph
        .edges
        .iter()
        .enumerate()
        .map(|(i, e)| {
            if closed_edges[i] {
                f64::INFINITY
            } else {
                let ratio = volumes[i] as f64 / e.capacity_vph;
                e.t0_secs * (1.0 + BPR_ALPHA * ratio.powi(BPR_BETA))
            }
        })
        .collect()
}

/// Run the assignment.
///
/// `closed_features` is the effective closure set (manual ∪ geometric);
/// every edge of a closed feature becomes impassable.  Connector edges are
/// never closed.  `iterations` below 1 is treated as 1.
pub fn assign(
    graph: &Graph,
    od: &[OdPair],
    closed_features: &FxHashSet<FeatureId>,
    iterations: usize,
) -> AssignmentResult {
    let edge_count = graph.edge_count();
    let closed_edges: Vec<bool> = graph
        .edges
        .iter()
        .map(|e| e.feature.is_valid() && closed_features.contains(&e.feature))
        .collect();

    let mut volumes = vec![0u32; edge_count];
    let mut unreachable = 0usize;

    for _ in 0..iterations.max(1) {
        let times = bpr_times(graph, &volumes, &closed_edges);
        let mut next = vec![0u32; edge_count];
        unreachable = 0;

        for pair in od {
            let path = router::shortest_path(graph, &times, pair.origin, pair.dest);
            if path.is_empty() {
                unreachable += 1;
                continue;
            }
            for edge in path {
                next[edge.index()] += 1;
            }
        }
        volumes = next;
    }

    // Reported times reflect the final volumes.
    let times = bpr_times(graph, &volumes, &closed_edges);

    let edge_metrics: Vec<EdgeMetric> = graph
        .edges
        .iter()
        .enumerate()
        .map(|(i, e)| EdgeMetric {
            volume: volumes[i],
            time_s: times[i],
            delay: delay_factor(times[i], e.t0_secs),
            closed: closed_edges[i],
        })
        .collect();

    let mut feature_metrics = vec![FeatureMetric::default(); graph.feature_count()];
    for (i, e) in graph.edges.iter().enumerate() {
        if !e.feature.is_valid() {
            continue;
        }
        let fm = &mut feature_metrics[e.feature.index()];
        fm.volume += edge_metrics[i].volume;
        fm.delay = fm.delay.max(edge_metrics[i].delay);
        fm.closed |= edge_metrics[i].closed;
    }

    AssignmentResult { edge_metrics, feature_metrics, unreachable }
}
