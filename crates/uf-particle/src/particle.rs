//! Vehicle particles: a finite population animated along the route pool.
//!
//! Particles are resampled wholesale on every recompute; only the target
//! population size carries over.  Stepping is cooperative — the engine calls
//! [`ParticlePool::step`] on its animation cadence with the elapsed wall
//! time, clamped so a stalled tab or a long GC pause cannot teleport
//! vehicles across the map.

use uf_core::{EngineRng, GeoPoint, ParticleId};
use uf_net::Graph;
use uf_traffic::EdgeMetric;

use crate::pool::Route;

/// Particle population target: `clamp(round(0.14 * routes), 40, 420)`.
const POPULATION_FRACTION: f64 = 0.14;
const POPULATION_MIN: usize = 40;
const POPULATION_MAX: usize = 420;

/// Initial along-edge progress is drawn from `[0, 0.8 * edge length]` so
/// freshly spawned vehicles don't all sit at intersections.
const INITIAL_PROGRESS_CAP: f64 = 0.8;

/// Step-time clamp in seconds.
const DT_MIN_S: f64 = 0.01;
const DT_MAX_S: f64 = 0.3;

/// Edge speed is `clamp(length / time, 1.2, 30) * 1.25` m/s.
const SPEED_MIN_MPS: f64 = 1.2;
const SPEED_MAX_MPS: f64 = 30.0;
const SPEED_BOOST: f64 = 1.25;

/// Route/edge transitions allowed within a single tick before a particle is
/// parked until the next one.
const MAX_HOPS_PER_TICK: usize = 6;

// ── Particle ──────────────────────────────────────────────────────────────────

/// One vehicle marker.
#[derive(Clone, Debug)]
pub struct Particle {
    pub id: ParticleId,
    /// Index into the route pool.
    pub route: usize,
    /// Index into the route's edge list.
    pub leg: usize,
    /// Progress along the current edge in metres.
    pub progress_m: f64,
    /// Interpolated world position.
    pub pos: GeoPoint,
}

// ── ParticlePool ──────────────────────────────────────────────────────────────

/// The particle population plus its build/step operations.
#[derive(Default)]
pub struct ParticlePool {
    /// All live particles, indexed by `ParticleId`.
    pub particles: Vec<Particle>,
}

impl ParticlePool {
    /// Resample the population for a fresh route pool.
    ///
    /// An empty route pool clears the particles — there is nothing left to
    /// animate on.
    pub fn build(graph: &Graph, routes: &[Route], rng: &mut EngineRng) -> ParticlePool {
        if routes.is_empty() {
            return ParticlePool::default();
        }
        let target = ((routes.len() as f64 * POPULATION_FRACTION).round() as usize)
            .clamp(POPULATION_MIN, POPULATION_MAX);

        let particles = (0..target)
            .map(|i| {
                let route_idx = rng.gen_range(0..routes.len());
                let route = &routes[route_idx];
                let leg = rng.gen_range(0..route.edges.len());
                let edge = graph.edge(route.edges[leg]);
                let progress_m = rng.gen_range(0.0..=edge.length_m * INITIAL_PROGRESS_CAP);
                let pos = edge.geom[0].lerp(edge.geom[1], progress_m / edge.length_m);
                Particle { id: ParticleId::from_index(i), route: route_idx, leg, progress_m, pos }
            })
            .collect();
        ParticlePool { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Restartable position snapshot: one `(id, position)` per particle.
    ///
    /// Consumers pull this once per frame; nothing is buffered and dropping
    /// the iterator costs nothing.
    pub fn positions(&self) -> impl Iterator<Item = (ParticleId, GeoPoint)> + '_ {
        self.particles.iter().map(|p| (p.id, p.pos))
    }

    /// Advance every particle by `dt_secs` (clamped to [0.01, 0.3]).
    ///
    /// `routes` and `metrics` must be the pool/metrics pair the particles
    /// were last built or stepped against — the engine swaps both atomically
    /// at the end of a recompute.
    pub fn step(
        &mut self,
        graph: &Graph,
        routes: &[Route],
        metrics: &[EdgeMetric],
        dt_secs: f64,
        rng: &mut EngineRng,
    ) {
        if routes.is_empty() {
            return;
        }
        let dt = dt_secs.clamp(DT_MIN_S, DT_MAX_S);
        for particle in &mut self.particles {
            step_particle(particle, graph, routes, metrics, dt, rng);
        }
    }
}

// ── Stepping internals ────────────────────────────────────────────────────────

/// Drop a particle at the start of a freshly drawn random route.
fn reassign(particle: &mut Particle, routes: &[Route], rng: &mut EngineRng) {
    particle.route = rng.gen_range(0..routes.len());
    particle.leg = 0;
    particle.progress_m = 0.0;
}

/// Advance one particle by one tick.
///
/// The loop settles the particle on an open edge, advancing at most
/// [`MAX_HOPS_PER_TICK`] route/edge transitions.  When the budget runs out
/// (e.g. everything near the particle just closed) the particle keeps its
/// previous position and tries again next tick.
fn step_particle(
    particle: &mut Particle,
    graph: &Graph,
    routes: &[Route],
    metrics: &[EdgeMetric],
    dt: f64,
    rng: &mut EngineRng,
) {
    let mut hops = 0;
    let mut moved = false;

    while hops < MAX_HOPS_PER_TICK {
        let route = &routes[particle.route];

        // Route exhausted → new route.
        if particle.leg >= route.edges.len() {
            reassign(particle, routes, rng);
            hops += 1;
            continue;
        }

        let edge_id = route.edges[particle.leg];
        let metric = &metrics[edge_id.index()];
        if metric.closed || !metric.time_s.is_finite() {
            reassign(particle, routes, rng);
            hops += 1;
            continue;
        }

        let edge = graph.edge(edge_id);

        // Advance once per tick, at the speed of the first open edge found.
        if !moved {
            let speed = (edge.length_m / metric.time_s).clamp(SPEED_MIN_MPS, SPEED_MAX_MPS)
                * SPEED_BOOST;
            particle.progress_m += speed * dt;
            moved = true;
        }

        // Overflow onto the next leg.
        if particle.progress_m >= edge.length_m {
            particle.progress_m -= edge.length_m;
            particle.leg += 1;
            hops += 1;
            continue;
        }

        particle.pos = edge.geom[0].lerp(edge.geom[1], particle.progress_m / edge.length_m);
        return;
    }

    // Hop budget exhausted this tick; stay parked and retry next tick.
    log::trace!(target: "PARTICLE", "{} parked after {hops} hops", particle.id);
}
