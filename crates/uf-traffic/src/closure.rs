//! Geometric closure detection: building footprints against line features.
//!
//! A feature is closed when any of its vertices lies inside a building ring
//! or any of its segments crosses a ring segment.  Bounding boxes prefilter
//! both sides, so the quadratic segment test only runs for features that
//! plausibly touch a footprint.

use rustc_hash::FxHashSet;

use uf_core::geo::{point_in_ring, segments_intersect};
use uf_core::{BBox, FeatureId, GeoPoint};
use uf_net::LineFeature;

// ── BuildingRing ──────────────────────────────────────────────────────────────

/// The outer ring of one building polygon, normalized and bbox-cached.
#[derive(Clone, Debug)]
pub struct BuildingRing {
    /// Closed vertex list (first vertex repeated at the end).
    pub coords: Vec<GeoPoint>,
    pub bbox: BBox,
}

impl BuildingRing {
    /// Normalize a raw ring: drop non-finite vertices, auto-close, and
    /// reject rings with fewer than three distinct vertices.
    pub fn new(raw: Vec<GeoPoint>) -> Option<BuildingRing> {
        let mut coords: Vec<GeoPoint> = raw.into_iter().filter(|p| p.is_finite()).collect();

        // Count distinct vertices ignoring an explicit closing duplicate.
        let mut distinct: Vec<GeoPoint> = Vec::new();
        for p in &coords {
            if !distinct.contains(p) {
                distinct.push(*p);
            }
        }
        if distinct.len() < 3 {
            return None;
        }

        if coords.first() != coords.last() {
            let first = coords[0];
            coords.push(first);
        }

        let bbox = BBox::of(&coords)?;
        Some(BuildingRing { coords, bbox })
    }
}

/// Normalize a batch of raw rings; returns the kept rings and the number
/// dropped for having fewer than three distinct vertices.
pub fn normalize_rings(raw: Vec<Vec<GeoPoint>>) -> (Vec<BuildingRing>, usize) {
    let total = raw.len();
    let rings: Vec<BuildingRing> = raw.into_iter().filter_map(BuildingRing::new).collect();
    let dropped = total - rings.len();
    if dropped > 0 {
        log::debug!(target: "GRAPH_BUILD", "dropped {dropped} degenerate building rings");
    }
    (rings, dropped)
}

// ── Detection ─────────────────────────────────────────────────────────────────

/// Feature indices blocked by any of the given building rings.
///
/// `feature_bboxes` is the caller's precomputed bbox cache, parallel to
/// `features` (engines keep it across recomputes; `None` marks degenerate
/// features, which can never be closed).
pub fn detect_closures(
    features: &[LineFeature],
    feature_bboxes: &[Option<BBox>],
    rings: &[BuildingRing],
) -> FxHashSet<FeatureId> {
    let mut closed = FxHashSet::default();
    if rings.is_empty() {
        return closed;
    }

    for (idx, feature) in features.iter().enumerate() {
        let Some(bbox) = feature_bboxes.get(idx).copied().flatten() else {
            continue;
        };
        for ring in rings {
            if !bbox.intersects(ring.bbox) {
                continue;
            }
            if feature_blocked_by(feature, ring) {
                closed.insert(FeatureId(idx as u32));
                break; // first hit settles this feature
            }
        }
    }
    closed
}

/// Does `ring` block `feature`?  Vertex containment first (cheap and covers
/// the fully-enclosed case), then the segment × segment sweep.
fn feature_blocked_by(feature: &LineFeature, ring: &BuildingRing) -> bool {
    for &vertex in &feature.coords {
        if point_in_ring(vertex, &ring.coords) {
            return true;
        }
    }
    for seg in feature.coords.windows(2) {
        for ring_seg in ring.coords.windows(2) {
            if segments_intersect(seg[0], seg[1], ring_seg[0], ring_seg[1]) {
                return true;
            }
        }
    }
    false
}
