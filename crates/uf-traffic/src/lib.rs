//! `uf-traffic` — the analysis layer of the urbanflow engine.
//!
//! # Crate layout
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`metrics`]      | `EdgeMetric`, `FeatureMetric`, delay-factor clamping  |
//! | [`closure`]      | `BuildingRing`, geometric closure detection           |
//! | [`assign`]       | iterative all-or-nothing assignment with BPR delay    |
//! | [`reachability`] | component labelling of the open subgraph              |

pub mod assign;
pub mod closure;
pub mod metrics;
pub mod reachability;

#[cfg(test)]
mod tests;

pub use assign::{assign, AssignmentResult, DEFAULT_ITERATIONS};
pub use closure::{detect_closures, normalize_rings, BuildingRing};
pub use metrics::{delay_factor, EdgeMetric, FeatureMetric};
pub use reachability::count_unreachable;
