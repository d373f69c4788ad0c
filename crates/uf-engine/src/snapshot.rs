//! The published metrics snapshot.

use uf_traffic::FeatureMetric;

/// Everything a consumer (renderer, metrics panel) reads per recompute.
///
/// Replaced wholesale at the end of each successful recompute — consumers
/// holding a clone keep a stable view and can never observe a torn update.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Per-feature metrics, indexed by feature position in the input
    /// collection.
    pub features: Vec<FeatureMetric>,

    /// Node count of the loaded graph.
    pub nodes: usize,
    /// Directed edge count (connectors included).
    pub directed_edges: usize,
    /// Size of the OD sample routed by the assignment.
    pub trips: usize,
    /// Size of the stable reachability probe set.
    pub probe_trips: usize,
    /// Nodes adjacent to closed features used to seed extra trips.
    pub closure_seed_nodes: usize,
    /// Wall time of the recompute in milliseconds.
    pub runtime_ms: f64,
    /// Probe pairs severed by the current closure set.
    pub unreachable: usize,
}
