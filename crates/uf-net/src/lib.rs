//! `uf-net` — road network graph, GeoJSON ingestion, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`highway`] | `HighwayClass` — speed/capacity table per road class       |
//! | [`feature`] | `LineFeature` — one input polyline with its class          |
//! | [`geojson`] | `parse_lines` — FeatureCollection → `Vec<LineFeature>`     |
//! | [`graph`]   | `Graph` (CSR + R-tree), `GraphBuilder`, connectivity repair |
//! | [`router`]  | forward Dijkstra, reverse shortest-path tree               |
//! | [`error`]   | `NetError`, `NetResult<T>`                                 |

pub mod error;
pub mod feature;
pub mod geojson;
pub mod graph;
pub mod highway;
pub mod router;


pub use error::{NetError, NetResult};
pub use feature::LineFeature;
pub use geojson::{parse_lines, IngestStats};
pub use graph::{Edge, Graph, GraphBuilder};
pub use highway::HighwayClass;
pub use router::{reverse_tree, shortest_path, ReverseTree};
