//! The `TrafficEngine` orchestrator.

use std::time::Instant;

use rustc_hash::FxHashSet;

use uf_core::{BBox, EngineRng, FeatureId, GeoPoint, NodeId, ParticleId};
use uf_demand::{generate_od, generate_od_from_origins, generate_probe, OdPair};
use uf_net::{geojson, Graph, IngestStats, LineFeature};
use uf_particle::{build_route_pool, ParticlePool, Route};
use uf_traffic::{assign, count_unreachable, detect_closures, normalize_rings, BuildingRing, EdgeMetric};

use crate::{EngineConfig, EngineResult, RecomputeScheduler, Snapshot};

/// Base OD sample size: `clamp(round(edges / 25), 220, 520)`.
const BASE_TRIPS_PER_EDGE: f64 = 1.0 / 25.0;
const BASE_TRIPS_MIN: usize = 220;
const BASE_TRIPS_MAX: usize = 520;

/// Extra closure-focused trips:
/// `max(120, round(base * min(1.5, 0.35 + 0.08 * closed)))`.
const EXTRA_TRIPS_MIN: usize = 120;
const EXTRA_SHARE_BASE: f64 = 0.35;
const EXTRA_SHARE_PER_CLOSURE: f64 = 0.08;
const EXTRA_SHARE_CAP: f64 = 1.5;

// ── TrafficEngine ─────────────────────────────────────────────────────────────

/// The reactive traffic engine.
///
/// Owns the immutable road graph plus all mutable closure inputs and derived
/// state.  Consumers follow a mutate-then-schedule pattern:
///
/// ```rust,ignore
/// engine.toggle_feature(FeatureId(12));
/// engine.schedule_recompute(now_ms, 250);
/// // ... event loop ...
/// engine.poll(now_ms);            // runs the recompute once it is due
/// ```
///
/// A synchronous [`recompute`](Self::recompute) is available for explicit
/// user-driven triggers.  Recompute is never fatal: with no network loaded
/// it is a silent no-op, and the published [`Snapshot`] is only replaced at
/// the very end of a successful run.
pub struct TrafficEngine {
    config: EngineConfig,

    // ── Immutable after load ──────────────────────────────────────────────
    features: Vec<LineFeature>,
    feature_bboxes: Vec<Option<BBox>>,
    graph: Option<Graph>,
    probe: Vec<OdPair>,

    // ── Closure inputs (mutated by UI events) ─────────────────────────────
    manual: FxHashSet<FeatureId>,
    rings: Vec<BuildingRing>,

    // ── Derived state, replaced per recompute ─────────────────────────────
    od: Vec<OdPair>,
    /// Sorted closure set the OD sample was drawn for; `None` forces a
    /// resample on the next recompute.
    od_signature: Option<Vec<FeatureId>>,
    closure_seed_count: usize,
    routes: Vec<Route>,
    particles: ParticlePool,
    edge_metrics: Vec<EdgeMetric>,
    snapshot: Snapshot,

    scheduler: RecomputeScheduler,
    /// Persistent RNG for particle re-routing between recomputes.
    anim_rng: EngineRng,
}

impl TrafficEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            features: Vec::new(),
            feature_bboxes: Vec::new(),
            graph: None,
            probe: Vec::new(),
            manual: FxHashSet::default(),
            rings: Vec::new(),
            od: Vec::new(),
            od_signature: None,
            closure_seed_count: 0,
            routes: Vec::new(),
            particles: ParticlePool::default(),
            edge_metrics: Vec::new(),
            snapshot: Snapshot::default(),
            scheduler: RecomputeScheduler::new(),
            anim_rng: EngineRng::new(config.seed.wrapping_mul(0x9e37_79b9_7f4a_7c15)),
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Load a road network, build the graph (with connectivity repair), the
    /// stable probe set, and publish a baseline snapshot.
    ///
    /// May be called again to replace the network wholesale; closure inputs
    /// survive the reload.
    pub fn load_network(&mut self, features: Vec<LineFeature>) {
        self.feature_bboxes = features.iter().map(LineFeature::bbox).collect();
        let graph = Graph::from_features(&features);
        log::info!(
            target: "GRAPH_BUILD",
            "loaded {} features: {} nodes, {} directed edges ({} connectors)",
            features.len(),
            graph.node_count(),
            graph.edge_count(),
            graph.connector_edges,
        );

        self.probe = generate_probe(&graph);
        self.features = features;
        self.graph = Some(graph);
        self.od_signature = None; // force an OD resample
        self.recompute();
    }

    /// Convenience: parse a GeoJSON FeatureCollection and load it.
    pub fn load_geojson(&mut self, json: &str) -> EngineResult<IngestStats> {
        let (features, stats) = geojson::parse_lines(json)?;
        self.load_network(features);
        Ok(stats)
    }

    // ── Closure inputs ────────────────────────────────────────────────────

    /// Flip a feature's manual closure state.  Returns `true` when the
    /// feature is now closed.
    ///
    /// Only records the input — pair with
    /// [`schedule_recompute`](Self::schedule_recompute) or
    /// [`recompute`](Self::recompute).
    pub fn toggle_feature(&mut self, feature: FeatureId) -> bool {
        if self.manual.remove(&feature) {
            false
        } else {
            self.manual.insert(feature);
            true
        }
    }

    /// Replace the building-footprint ring set (outer rings of polygons or
    /// multipolygons, one ring each).  Returns the number of rings dropped
    /// for having fewer than three distinct vertices.
    pub fn set_building_rings(&mut self, raw: Vec<Vec<GeoPoint>>) -> usize {
        let (rings, dropped) = normalize_rings(raw);
        self.rings = rings;
        dropped
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// Schedule a recompute `delay_ms` after `now_ms`.  The most recent
    /// schedule wins; any pending one is superseded.
    pub fn schedule_recompute(&mut self, now_ms: u64, delay_ms: u64) {
        self.scheduler.schedule(now_ms, delay_ms);
    }

    /// Run the pending recompute if its deadline has passed.  Returns `true`
    /// when one ran.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.scheduler.take_due(now_ms) {
            self.recompute();
            true
        } else {
            false
        }
    }

    // ── Recompute ─────────────────────────────────────────────────────────

    /// Synchronously rebuild metrics, route pool, and particles from the
    /// current closure inputs.
    ///
    /// Silent no-op without a loaded network.  The snapshot and pools are
    /// committed together at the end, so consumers never see a torn state.
    pub fn recompute(&mut self) {
        let Some(graph) = self.graph.take() else {
            log::debug!(target: "ASSIGN", "recompute without a network: no-op");
            return;
        };
        let started = Instant::now();

        // Fresh sampling RNG per recompute: the OD sample and particle
        // placement become a pure function of (graph, closure signature,
        // seed), which is what makes toggling a closure on and off restore
        // the previous metrics exactly.
        let mut rng = EngineRng::new(self.config.seed);

        // 1. Effective closure set (manual ∪ geometric).
        let mut effective = detect_closures(&self.features, &self.feature_bboxes, &self.rings);
        effective.extend(self.manual.iter().copied());

        // 2. Resample OD when the closure signature changed.
        let mut signature: Vec<FeatureId> = effective.iter().copied().collect();
        signature.sort();
        if self.od_signature.as_ref() != Some(&signature) {
            let (od, seed_count) = self.sample_od(&graph, &signature, &mut rng);
            self.od = od;
            self.closure_seed_count = seed_count;
            self.od_signature = Some(signature);
        }

        // 3. Assignment.
        let result = assign(&graph, &self.od, &effective, self.config.assignment_iterations);
        if result.unreachable > 0 {
            log::debug!(
                target: "ASSIGN",
                "{} of {} trips unreachable under {} closures",
                result.unreachable,
                self.od.len(),
                effective.len(),
            );
        }

        // 4. Route pool + particles.
        let routes = build_route_pool(&graph, &self.od, &result.edge_times());
        let particles = ParticlePool::build(&graph, &routes, &mut rng);

        // 5. Probe reachability (independent of the assignment).
        let unreachable = count_unreachable(&graph, &effective, &self.probe);

        // 6. Commit: swap every derived piece in one go.
        self.snapshot = Snapshot {
            features: result.feature_metrics,
            nodes: graph.node_count(),
            directed_edges: graph.edge_count(),
            trips: self.od.len(),
            probe_trips: self.probe.len(),
            closure_seed_nodes: self.closure_seed_count,
            runtime_ms: started.elapsed().as_secs_f64() * 1_000.0,
            unreachable,
        };
        self.edge_metrics = result.edge_metrics;
        self.routes = routes;
        self.particles = particles;
        self.graph = Some(graph);
    }

    /// Draw the adaptive OD sample for the given closure signature.
    ///
    /// Returns the sample and the number of closure-adjacent seed nodes.
    fn sample_od(
        &self,
        graph: &Graph,
        signature: &[FeatureId],
        rng: &mut EngineRng,
    ) -> (Vec<OdPair>, usize) {
        let base = ((graph.edge_count() as f64 * BASE_TRIPS_PER_EDGE).round() as usize)
            .clamp(BASE_TRIPS_MIN, BASE_TRIPS_MAX);
        let mut od = generate_od(graph, base, rng);

        // Concentrate extra trips at nodes touching the closed features so
        // detour pressure shows up where the user is editing.
        let mut seeds: Vec<NodeId> = signature
            .iter()
            .flat_map(|&f| graph.feature_edges(f))
            .flat_map(|&e| [graph.edge(e).from, graph.edge(e).to])
            .collect();
        seeds.sort();
        seeds.dedup();

        if !signature.is_empty() && !seeds.is_empty() {
            let share = (EXTRA_SHARE_BASE + EXTRA_SHARE_PER_CLOSURE * signature.len() as f64)
                .min(EXTRA_SHARE_CAP);
            let extra = ((base as f64 * share).round() as usize).max(EXTRA_TRIPS_MIN);
            od.extend(generate_od_from_origins(graph, extra, &seeds, rng));
        }
        (od, seeds.len())
    }

    // ── Animation ─────────────────────────────────────────────────────────

    /// Advance the particle population by `dt_secs` (clamped internally to
    /// [0.01, 0.3] s).  Intended cadence: `config.animation_tick_ms`.
    pub fn advance_particles(&mut self, dt_secs: f64) {
        let Some(graph) = &self.graph else { return };
        self.particles
            .step(graph, &self.routes, &self.edge_metrics, dt_secs, &mut self.anim_rng);
    }

    /// Restartable position stream: one `(id, position)` per particle.
    pub fn particle_positions(&self) -> impl Iterator<Item = (ParticleId, GeoPoint)> + '_ {
        self.particles.positions()
    }

    // ── Read surfaces ─────────────────────────────────────────────────────

    /// The currently published metrics snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// `true` when a scheduled recompute is waiting for its deadline.
    pub fn recompute_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Manually closed feature ids (sorted, for display).
    pub fn manual_closures(&self) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self.manual.iter().copied().collect();
        ids.sort();
        ids
    }
}
