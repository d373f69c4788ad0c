//! Reachability analysis on the undirected open subgraph.
//!
//! Runs independently of the assignment: component labels come from a plain
//! flood fill over edges whose feature is not closed, so a severed-network
//! count is available even when no trips were routed.

use rustc_hash::FxHashSet;

use uf_core::FeatureId;
use uf_demand::OdPair;
use uf_net::Graph;

/// Count probe pairs whose endpoints fall in different components of the
/// open (non-closed) subgraph.
///
/// Nodes whose every incident edge is closed form singleton components, so a
/// pair touching one is counted as severed.
pub fn count_unreachable(graph: &Graph, closed_features: &FxHashSet<FeatureId>, probe: &[OdPair]) -> usize {
    let n = graph.node_count();
    if n == 0 || probe.is_empty() {
        return 0;
    }

    // Undirected adjacency over open edges only.  Connectors (sentinel
    // feature) are always open.
    let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); n];
    for e in &graph.edges {
        if e.feature.is_valid() && closed_features.contains(&e.feature) {
            continue;
        }
        adjacency[e.from.index()].push(e.to.0);
    }

    let mut component = vec![u32::MAX; n];
    let mut next_label = 0u32;
    let mut stack = Vec::new();
    for start in 0..n {
        if component[start] != u32::MAX {
            continue;
        }
        component[start] = next_label;
        stack.push(start);
        while let Some(node) = stack.pop() {
            for &neighbor in &adjacency[node] {
                let neighbor = neighbor as usize;
                if component[neighbor] == u32::MAX {
                    component[neighbor] = next_label;
                    stack.push(neighbor);
                }
            }
        }
        next_label += 1;
    }

    probe
        .iter()
        .filter(|pair| {
            let (o, d) = (pair.origin.index(), pair.dest.index());
            o >= n || d >= n || component[o] != component[d]
        })
        .count()
}
