//! grid_demo — smallest end-to-end run of the urbanflow traffic engine.
//!
//! Builds a synthetic 6×6 residential grid over the downtown core, drops a
//! building footprint onto one intersection, and prints the per-feature
//! metrics before and after the closure.

use uf_core::GeoPoint;
use uf_engine::{EngineConfig, TrafficEngine};
use uf_net::{HighwayClass, LineFeature};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID: usize = 6;
const SPACING_DEG: f64 = 0.008;
const ORIGIN: (f64, f64) = (144.940, -37.836); // south-west corner
const SEED: u64 = 42;

fn grid_features() -> Vec<LineFeature> {
    let mut features = Vec::new();
    for row in 0..GRID {
        let lat = ORIGIN.1 + row as f64 * SPACING_DEG;
        let coords = (0..GRID)
            .map(|col| GeoPoint::new(ORIGIN.0 + col as f64 * SPACING_DEG, lat))
            .collect();
        features.push(LineFeature::new(coords, HighwayClass::Residential));
    }
    for col in 0..GRID {
        let lng = ORIGIN.0 + col as f64 * SPACING_DEG;
        let coords = (0..GRID)
            .map(|row| GeoPoint::new(lng, ORIGIN.1 + row as f64 * SPACING_DEG))
            .collect();
        features.push(LineFeature::new(coords, HighwayClass::Residential));
    }
    features
}

fn print_metrics(engine: &TrafficEngine, label: &str) {
    let snap = engine.snapshot();
    println!("── {label} ──");
    println!(
        "nodes {}  edges {}  trips {}  probe {}  unreachable {}  ({:.1} ms)",
        snap.nodes, snap.directed_edges, snap.trips, snap.probe_trips, snap.unreachable, snap.runtime_ms
    );
    println!("{:<10} {:<8} {:<8} {:<7}", "feature", "volume", "delay", "closed");
    for (i, fm) in snap.features.iter().enumerate() {
        println!("{:<10} {:<8} {:<8.3} {:<7}", i, fm.volume, fm.delay, fm.closed);
    }
    println!();
}

fn main() {
    println!("=== grid_demo — urbanflow traffic engine ===");
    println!("Grid: {GRID}×{GRID}  |  Seed: {SEED}");
    println!();

    // 1. Load the network and publish the baseline.
    let mut engine = TrafficEngine::new(EngineConfig { seed: SEED, ..EngineConfig::default() });
    engine.load_network(grid_features());
    print_metrics(&engine, "baseline");

    // 2. Drop a building footprint onto the intersection at (2, 2).
    let cx = ORIGIN.0 + 2.0 * SPACING_DEG;
    let cy = ORIGIN.1 + 2.0 * SPACING_DEG;
    let half = SPACING_DEG / 8.0;
    engine.set_building_rings(vec![vec![
        GeoPoint::new(cx - half, cy - half),
        GeoPoint::new(cx + half, cy - half),
        GeoPoint::new(cx + half, cy + half),
        GeoPoint::new(cx - half, cy + half),
    ]]);
    engine.recompute();
    print_metrics(&engine, "after building placement");

    // 3. Animate a handful of frames and show a few particle positions.
    for _ in 0..10 {
        engine.advance_particles(0.09);
    }
    println!("particles: {}", engine.particle_count());
    for (id, pos) in engine.particle_positions().take(5) {
        println!("  {id} @ {pos}");
    }
}
