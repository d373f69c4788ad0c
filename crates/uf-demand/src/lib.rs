//! `uf-demand` — trip demand for the assignment engine.
//!
//! Two kinds of node pairs leave this crate:
//!
//! - **OD samples** ([`generate_od`], [`generate_od_from_origins`]) — the
//!   trips the assignment engine routes.  Origins favour the outer margin of
//!   the network (commuters coming in), destinations favour a fixed set of
//!   weighted downtown anchors.  Drawn from the engine's seeded RNG.
//! - **The reachability probe** ([`generate_probe`]) — a stable sample used
//!   only to count severed connections.  It is a pure function of the graph
//!   (an arithmetic hash picks destinations), so closure edits never disturb
//!   it and unreachable counts stay comparable across recomputes.

pub mod anchors;
pub mod od;
pub mod probe;


pub use anchors::{anchor_nodes, DOWNTOWN_ANCHORS};
pub use od::{generate_od, generate_od_from_origins, margin_origins, OdPair};
pub use probe::generate_probe;
