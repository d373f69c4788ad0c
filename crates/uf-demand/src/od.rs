//! Origin–destination sampling.

use uf_core::{EngineRng, NodeId};
use uf_net::Graph;

use crate::anchors::anchor_nodes;

/// Width of the outer origin band as a fraction of the bounding box.
const MARGIN_FRACTION: f64 = 0.14;

/// Attempt budget multiplier before sampling gives up.
const RETRY_FACTOR: usize = 5;

/// One trip request: distinct origin and destination nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OdPair {
    pub origin: NodeId,
    pub dest: NodeId,
}

/// Nodes in the outer 14 % lng/lat margin of the graph's bounding box.
///
/// Falls back to the full node set when the band is empty (tiny or
/// degenerate networks).
pub fn margin_origins(graph: &Graph) -> Vec<NodeId> {
    let bbox = graph.bbox();
    let lng_band = bbox.width() * MARGIN_FRACTION;
    let lat_band = bbox.height() * MARGIN_FRACTION;

    let in_margin = |i: usize| {
        let p = graph.node_pos[i];
        p.lng <= bbox.min_lng + lng_band
            || p.lng >= bbox.max_lng - lng_band
            || p.lat <= bbox.min_lat + lat_band
            || p.lat >= bbox.max_lat - lat_band
    };

    let band: Vec<NodeId> = (0..graph.node_count())
        .filter(|&i| in_margin(i))
        .map(NodeId::from_index)
        .collect();
    if band.is_empty() {
        (0..graph.node_count()).map(NodeId::from_index).collect()
    } else {
        band
    }
}

/// Sample `count` OD pairs: origins uniform over the outer margin,
/// destinations by weighted choice from the downtown anchors.
pub fn generate_od(graph: &Graph, count: usize, rng: &mut EngineRng) -> Vec<OdPair> {
    let origins = margin_origins(graph);
    generate_od_from_origins(graph, count, &origins, rng)
}

/// Same as [`generate_od`] but with a caller-supplied origin set — used to
/// concentrate extra trips near closure sites.
///
/// Self-pairs are rejected; sampling gives up after `5 * count` attempts, so
/// a degenerate network yields fewer (possibly zero) pairs rather than
/// spinning.
pub fn generate_od_from_origins(
    graph: &Graph,
    count: usize,
    origins: &[NodeId],
    rng: &mut EngineRng,
) -> Vec<OdPair> {
    let (anchor_ids, weights) = anchor_nodes(graph);
    if origins.is_empty() || anchor_ids.is_empty() {
        return Vec::new();
    }

    let mut pairs = Vec::with_capacity(count);
    let mut attempts = 0usize;
    while pairs.len() < count && attempts < count.saturating_mul(RETRY_FACTOR) {
        attempts += 1;
        let Some(&origin) = rng.choose(origins) else { break };
        let Some(pick) = rng.pick_weighted(&weights) else { break };
        let dest = anchor_ids[pick];
        if origin == dest {
            continue;
        }
        pairs.push(OdPair { origin, dest });
    }
    pairs
}
