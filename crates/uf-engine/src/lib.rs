//! `uf-engine` — the reactive orchestrator tying the urbanflow pipeline
//! together.
//!
//! # Recompute pipeline
//!
//! ```text
//! closure inputs (toggles, building rings)
//!   → effective closure set (manual ∪ geometric)
//!   → OD resample (only when the closure signature changed)
//!   → BPR assignment → edge/feature metrics
//!   → route pool → particle pool
//!   → probe reachability
//!   → published Snapshot (copy-on-publish)
//! ```
//!
//! The engine is single-threaded and cooperative: mutators only record
//! inputs, [`TrafficEngine::poll`] drains the debounced schedule, and the
//! caller drives particle animation on its own cadence.
//!
//! # Crate layout
//!
//! | Module       | Contents                                      |
//! |--------------|-----------------------------------------------|
//! | [`config`]   | `EngineConfig`                                |
//! | [`debounce`] | `RecomputeScheduler` — epoch + deadline       |
//! | [`snapshot`] | `Snapshot` — published metrics                |
//! | [`engine`]   | `TrafficEngine`                               |
//! | [`error`]    | `EngineError`, `EngineResult<T>`              |

pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use debounce::RecomputeScheduler;
pub use engine::TrafficEngine;
pub use error::{EngineError, EngineResult};
pub use snapshot::Snapshot;
