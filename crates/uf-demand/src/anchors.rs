//! Fixed downtown destination anchors.

use uf_core::NodeId;
use uf_net::Graph;

/// Ten `(lng, lat, weight)` anchors covering the downtown core, weights 2–6.
///
/// Destinations are drawn from these by weighted choice, which is what gives
/// the assignment its inbound, downtown-biased shape.
pub const DOWNTOWN_ANCHORS: [(f64, f64, f64); 10] = [
    (144.9631, -37.8136, 6.0), // CBD core
    (144.9690, -37.8170, 5.0),
    (144.9560, -37.8100, 5.0),
    (144.9730, -37.8110, 4.0),
    (144.9580, -37.8230, 4.0), // arts precinct
    (144.9667, -37.8060, 3.0),
    (144.9520, -37.8180, 3.0),
    (144.9780, -37.8200, 2.0),
    (144.9850, -37.8120, 2.0),
    (144.9480, -37.8050, 2.0),
];

/// Snap the anchor set to graph nodes.
///
/// Returns parallel `(nodes, weights)` vectors; anchors snapping onto the
/// same node are merged by summing their weights (first-seen order is kept,
/// so the result is deterministic).  Empty on an empty graph.
pub fn anchor_nodes(graph: &Graph) -> (Vec<NodeId>, Vec<f64>) {
    let mut nodes: Vec<NodeId> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();

    for &(lng, lat, weight) in &DOWNTOWN_ANCHORS {
        let Some(node) = graph.snap_to_node(uf_core::GeoPoint::new(lng, lat)) else {
            continue;
        };
        match nodes.iter().position(|&n| n == node) {
            Some(i) => weights[i] += weight,
            None => {
                nodes.push(node);
                weights.push(weight);
            }
        }
    }
    (nodes, weights)
}
