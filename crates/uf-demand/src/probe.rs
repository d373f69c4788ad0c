//! The deterministic reachability probe set.
//!
//! Built once per graph load and never resampled: closure edits change the
//! unreachable *count*, not the pairs being probed.  Destination choice uses
//! a reproducible unit hash instead of the engine RNG so the probe is a pure
//! function of the graph.

use uf_core::NodeId;
use uf_net::Graph;

use crate::anchors::anchor_nodes;
use crate::OdPair;

/// Probe size: `clamp(round(0.35 * nodes), 1200, 3200)`.
const PROBE_FRACTION: f64 = 0.35;
const PROBE_MIN: usize = 1_200;
const PROBE_MAX: usize = 3_200;

/// The classic shader one-liner: a reproducible hash of `seed` into [0, 1).
#[inline]
fn unit_hash(seed: f64) -> f64 {
    let x = (seed * 12.9898 + 78.233).sin() * 43758.5453;
    x - x.floor()
}

/// Build the stable probe pair set for `graph`.
///
/// Origins are taken at a regular stride over the node list; each is paired
/// with a destination drawn from the weighted anchor set using the origin
/// index as hash seed.  Self-pairs are dropped.
pub fn generate_probe(graph: &Graph) -> Vec<OdPair> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let (anchor_ids, weights) = anchor_nodes(graph);
    if anchor_ids.is_empty() {
        return Vec::new();
    }
    let total_weight: f64 = weights.iter().sum();

    let target = ((n as f64 * PROBE_FRACTION).round() as usize).clamp(PROBE_MIN, PROBE_MAX);
    let stride = (n / target).max(1);

    let mut pairs = Vec::with_capacity(target.min(n));
    for i in (0..n).step_by(stride) {
        if pairs.len() >= target {
            break;
        }
        let origin = NodeId::from_index(i);

        // Weighted anchor choice driven by the unit hash.
        let mut remaining = unit_hash(i as f64) * total_weight;
        let mut dest = anchor_ids[anchor_ids.len() - 1];
        for (j, &w) in weights.iter().enumerate() {
            if remaining < w {
                dest = anchor_ids[j];
                break;
            }
            remaining -= w;
        }

        if origin != dest {
            pairs.push(OdPair { origin, dest });
        }
    }
    pairs
}
