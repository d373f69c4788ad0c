//! Road graph representation and builder.
//!
//! # Data layout
//!
//! Edges live in one arena sorted by source node (stable sort, so emission
//! order — feature order, segment order, forward before backward — is
//! preserved within each node).  Outgoing edges of node `n` are therefore the
//! contiguous `EdgeId` range `out_start[n] .. out_start[n+1]`, ideal for
//! Dijkstra's inner loop.  A second CSR (`in_start`/`in_list`) groups edge
//! ids by destination node for the reverse shortest-path tree.
//!
//! # Snapping
//!
//! Node identity is the vertex coordinate rounded to 1e-4 degrees (~11 m).
//! Near-coincident endpoints of different features collapse to one node,
//! which is what makes the input collection route as a single network.
//!
//! # Connectivity repair
//!
//! After ingestion the undirected graph may still fall apart into several
//! components (digitization gaps, isolated service roads).  `build()` labels
//! components, keeps the largest as primary, and stitches every residual
//! component to the primary through a pair of synthetic `connector` edges at
//! the nearest cross-component node pair.  Connectors carry
//! `FeatureId::INVALID`, so they are invisible to feature metrics and can
//! never be closed by a user or a building.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use uf_core::geo::haversine_m;
use uf_core::{BBox, EdgeId, FeatureId, GeoPoint, NodeId};

use crate::{HighwayClass, LineFeature};

/// Snapping grid resolution: 1e-4 degrees.
const SNAP_SCALE: f64 = 10_000.0;

/// Fallback map center when the input collection is empty.
const DOWNTOWN_CENTER: GeoPoint = GeoPoint { lng: 144.9631, lat: -37.8136 };

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a `[lng, lat]` point with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lng/lat space — sufficient for
    /// nearest-node queries at city scale.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlng = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlng * dlng + dlat * dlat
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// One directed road-graph edge.
#[derive(Clone, Debug)]
pub struct Edge {
    /// Owning feature, or `FeatureId::INVALID` for synthetic connectors.
    pub feature: FeatureId,
    pub from: NodeId,
    pub to: NodeId,
    /// Original (unsnapped) segment endpoints in travel order.
    pub geom: [GeoPoint; 2],
    /// Segment length in metres, floored at 1 m.
    pub length_m: f64,
    pub class: HighwayClass,
    /// Free-flow speed in m/s.
    pub speed_mps: f64,
    /// Free-flow travel time in seconds (`length_m / speed_mps`).
    pub t0_secs: f64,
    /// Hourly capacity in vehicles per hour.
    pub capacity_vph: f64,
}

impl Edge {
    /// `true` for synthetic connectivity-repair edges.
    #[inline]
    pub fn is_connector(&self) -> bool {
        !self.feature.is_valid()
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Immutable directed road graph.
///
/// Built once per road-data load via [`GraphBuilder`]; all query surfaces are
/// read-only afterwards, so the graph may be shared freely between the
/// recompute pipeline and the particle animation.
pub struct Graph {
    /// Snapped position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Edge arena sorted by source node.  Indexed by `EdgeId`.
    pub edges: Vec<Edge>,

    /// CSR row pointer for outgoing edges: node `n`'s out-edges are the
    /// `EdgeId` range `out_start[n] .. out_start[n+1]`.
    out_start: Vec<u32>,

    /// CSR row pointer + index list for incoming edges, grouped by `to`.
    in_start: Vec<u32>,
    in_list: Vec<EdgeId>,

    /// Edge ids owned by each input feature (connectors excluded).
    feature_edges: Vec<Vec<EdgeId>>,

    /// Min/max of all input vertex coordinates, or the downtown fallback box.
    bbox: BBox,

    /// Number of synthetic connector edges inserted by connectivity repair.
    pub connector_edges: usize,

    spatial_idx: RTree<NodeEntry>,
}

impl Graph {
    /// Build a graph straight from an input feature collection.
    pub fn from_features(features: &[LineFeature]) -> Graph {
        let mut builder = GraphBuilder::new(features.len());
        for (i, feature) in features.iter().enumerate() {
            builder.add_feature(FeatureId::from_index(i), feature);
        }
        builder.build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Number of feature slots this graph was built from.
    pub fn feature_count(&self) -> usize {
        self.feature_edges.len()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// A contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.out_start[node.index()] as usize;
        let end = self.out_start[node.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    /// Iterator over the `EdgeId`s of all incoming edges of `node`.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.in_start[node.index()] as usize;
        let end = self.in_start[node.index() + 1] as usize;
        self.in_list[start..end].iter().copied()
    }

    /// Edge ids owned by `feature` (empty for connectors and out-of-range ids).
    pub fn feature_edges(&self, feature: FeatureId) -> &[EdgeId] {
        self.feature_edges
            .get(feature.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Free-flow time per edge, the starting point for assignment.
    pub fn free_flow_times(&self) -> Vec<f64> {
        self.edges.iter().map(|e| e.t0_secs).collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest graph node to `pos`, or `None` on an empty graph.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lng, pos.lat])
            .map(|e| e.id)
    }

    /// Min/max box of all input vertices (downtown fallback when empty).
    pub fn bbox(&self) -> BBox {
        self.bbox
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Graph`] from line features, then call [`build`](Self::build).
pub struct GraphBuilder {
    nodes: Vec<GeoPoint>,
    snap: FxHashMap<(i64, i64), NodeId>,
    edges: Vec<Edge>,
    feature_count: usize,
    vertex_bbox: Option<BBox>,
    /// Features skipped for having fewer than two valid vertices.
    pub skipped_features: usize,
}

impl GraphBuilder {
    pub fn new(feature_count: usize) -> Self {
        Self {
            nodes: Vec::new(),
            snap: FxHashMap::default(),
            edges: Vec::new(),
            feature_count,
            vertex_bbox: None,
            skipped_features: 0,
        }
    }

    /// Grid cell of a vertex at 1e-4-degree resolution.
    fn snap_key(p: GeoPoint) -> (i64, i64) {
        ((p.lng * SNAP_SCALE).round() as i64, (p.lat * SNAP_SCALE).round() as i64)
    }

    /// Node for a grid cell, created on first use.  Only called once a
    /// segment is known to produce an edge, so every node ends up referenced.
    fn node_for_key(&mut self, key: (i64, i64)) -> NodeId {
        if let Some(&id) = self.snap.get(&key) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(GeoPoint::new(key.0 as f64 / SNAP_SCALE, key.1 as f64 / SNAP_SCALE));
        self.snap.insert(key, id);
        id
    }

    /// Ingest one feature: every consecutive valid vertex pair yields a
    /// forward and a backward edge.  Pairs that snap onto one node are
    /// dropped; features with fewer than two valid vertices are skipped.
    pub fn add_feature(&mut self, id: FeatureId, feature: &LineFeature) {
        let valid: Vec<GeoPoint> = feature.coords.iter().copied().filter(|p| p.is_finite()).collect();
        if valid.len() < 2 {
            self.skipped_features += 1;
            return;
        }

        for p in &valid {
            self.vertex_bbox = Some(match self.vertex_bbox {
                None => BBox::around(*p),
                Some(b) => {
                    let mut b = b;
                    b.min_lng = b.min_lng.min(p.lng);
                    b.min_lat = b.min_lat.min(p.lat);
                    b.max_lng = b.max_lng.max(p.lng);
                    b.max_lat = b.max_lat.max(p.lat);
                    b
                }
            });
        }

        for pair in valid.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ka, kb) = (Self::snap_key(a), Self::snap_key(b));
            if ka == kb {
                continue; // both endpoints collapse onto one grid cell
            }
            let na = self.node_for_key(ka);
            let nb = self.node_for_key(kb);
            self.push_edge_pair(id, na, nb, a, b, feature.class);
        }
    }

    /// Emit the two opposing directed edges for one segment.
    fn push_edge_pair(
        &mut self,
        feature: FeatureId,
        na: NodeId,
        nb: NodeId,
        a: GeoPoint,
        b: GeoPoint,
        class: HighwayClass,
    ) {
        let length_m = haversine_m(a, b).max(1.0);
        let speed_mps = class.speed_mps();
        let t0_secs = length_m / speed_mps;
        debug_assert!(t0_secs > 0.0);

        self.edges.push(Edge {
            feature,
            from: na,
            to: nb,
            geom: [a, b],
            length_m,
            class,
            speed_mps,
            t0_secs,
            capacity_vph: class.capacity_vph(),
        });
        self.edges.push(Edge {
            feature,
            from: nb,
            to: na,
            geom: [b, a],
            length_m,
            class,
            speed_mps,
            t0_secs,
            capacity_vph: class.capacity_vph(),
        });
    }

    /// Finalize: repair connectivity, sort the arena, build both CSRs, the
    /// feature map, and the spatial index.
    pub fn build(mut self) -> Graph {
        let connector_edges = self.connect_components();

        let bbox = self
            .vertex_bbox
            .unwrap_or_else(|| BBox::around(DOWNTOWN_CENTER).expand(0.02));

        let node_count = self.nodes.len();

        // Stable sort keeps emission order within each source node, which is
        // what makes Dijkstra's tie-breaking deterministic.
        self.edges.sort_by_key(|e| e.from.0);

        let mut out_start = vec![0u32; node_count + 1];
        for e in &self.edges {
            out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            out_start[i] += out_start[i - 1];
        }

        // Incoming CSR via counting sort over `to`, filled in EdgeId order.
        let mut in_start = vec![0u32; node_count + 1];
        for e in &self.edges {
            in_start[e.to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            in_start[i] += in_start[i - 1];
        }
        let mut in_list = vec![EdgeId::INVALID; self.edges.len()];
        let mut cursor = in_start.clone();
        for (i, e) in self.edges.iter().enumerate() {
            let slot = cursor[e.to.index()] as usize;
            in_list[slot] = EdgeId::from_index(i);
            cursor[e.to.index()] += 1;
        }

        let mut feature_edges: Vec<Vec<EdgeId>> = vec![Vec::new(); self.feature_count];
        for (i, e) in self.edges.iter().enumerate() {
            if e.feature.is_valid() {
                feature_edges[e.feature.index()].push(EdgeId::from_index(i));
            }
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.lng, pos.lat], id: NodeId::from_index(i) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Graph {
            node_pos: self.nodes,
            edges: self.edges,
            out_start,
            in_start,
            in_list,
            feature_edges,
            bbox,
            connector_edges,
            spatial_idx,
        }
    }

    // ── Connectivity repair ───────────────────────────────────────────────

    /// Stitch residual undirected components to the primary one with
    /// synthetic connector edges.  Returns the number of edges added.
    fn connect_components(&mut self) -> usize {
        let n = self.nodes.len();
        if n == 0 {
            return 0;
        }

        // Undirected adjacency for the flood fill.
        let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        for e in &self.edges {
            adjacency[e.from.index()].push(e.to);
        }

        let mut component = vec![usize::MAX; n];
        let mut components: Vec<Vec<NodeId>> = Vec::new();
        for start in 0..n {
            if component[start] != usize::MAX {
                continue;
            }
            let label = components.len();
            let mut members = Vec::new();
            let mut stack = vec![NodeId::from_index(start)];
            component[start] = label;
            while let Some(node) = stack.pop() {
                members.push(node);
                for &next in &adjacency[node.index()] {
                    if component[next.index()] == usize::MAX {
                        component[next.index()] = label;
                        stack.push(next);
                    }
                }
            }
            components.push(members);
        }

        if components.len() <= 1 {
            return 0;
        }

        // Largest component is primary; every other one gets a connector to
        // it at the nearest cross-component node pair.  Brute force is fine
        // at this scale.
        components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));
        let primary = components[0].clone();

        let mut added = 0;
        for residual in &components[1..] {
            let mut best: Option<(f64, NodeId, NodeId)> = None;
            for &a in residual {
                let pa = self.nodes[a.index()];
                for &b in &primary {
                    let d = haversine_m(pa, self.nodes[b.index()]);
                    if best.is_none_or(|(bd, _, _)| d < bd) {
                        best = Some((d, a, b));
                    }
                }
            }
            let Some((_, a, b)) = best else { continue };
            let (pa, pb) = (self.nodes[a.index()], self.nodes[b.index()]);
            self.push_edge_pair(FeatureId::INVALID, a, b, pa, pb, HighwayClass::Connector);
            added += 2;
        }

        log::debug!(
            target: "GRAPH_BUILD",
            "connectivity repair: {} components, {} connector edges",
            components.len(),
            added
        );
        added
    }
}
