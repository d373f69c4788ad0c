//! `uf-core` — foundational types for the `urbanflow` traffic engine.
//!
//! This crate is a dependency of every other `uf-*` crate.  It intentionally
//! has no `uf-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                             |
//! |----------|------------------------------------------------------|
//! | [`ids`]  | `NodeId`, `EdgeId`, `FeatureId`, `ParticleId`        |
//! | [`geo`]  | `GeoPoint`, `BBox`, distances, intersection tests    |
//! | [`rng`]  | `EngineRng` — seeded RNG for all stochastic sampling |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{BBox, GeoPoint};
pub use ids::{EdgeId, FeatureId, NodeId, ParticleId};
pub use rng::EngineRng;
