//! Engine configuration.

use uf_traffic::DEFAULT_ITERATIONS;

/// Top-level engine configuration.
///
/// The single `seed` drives every stochastic draw (OD sampling, particle
/// placement and re-routing); the reachability probe is hash-based and
/// deliberately ignores it.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Master RNG seed.  The same seed always produces identical OD samples
    /// and route-pool orderings.
    pub seed: u64,

    /// Assignment iterations per recompute.  Two is enough to let trips
    /// react once to the congestion they created.
    pub assignment_iterations: usize,

    /// Reference particle-animation cadence in milliseconds.  The engine
    /// does not own a timer; callers are expected to call
    /// `advance_particles` roughly this often.
    pub animation_tick_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            assignment_iterations: DEFAULT_ITERATIONS,
            animation_tick_ms: 90,
        }
    }
}
