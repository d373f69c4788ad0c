//! Typed arena indices.
//!
//! Nodes, edges, features, and particles all live in contiguous arenas and
//! reference each other by position.  Each arena gets its own index type so
//! an `EdgeId` can never be used to look up a node, at zero runtime cost.
//! The inner integer is always `u32`: city-scale networks stay far below
//! four billion elements, and half-width indices keep the hot arrays (CSR
//! adjacency, shortest-path trees) compact.
//!
//! The top `u32` value is reserved as the `INVALID` sentinel, which is what
//! shortest-path trees and connector edges store in their "points at
//! nothing" slots.

use std::fmt;

/// Generate a `u32` arena index type with an invalid sentinel and a tagged
/// `Display` (`"node#7"`, `"edge#-"` for the sentinel).
macro_rules! arena_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident, $tag:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for slots that reference nothing, e.g. unreached
            /// nodes in a shortest-path tree or the owning feature of a
            /// synthetic connector edge.
            pub const INVALID: $name = $name(u32::MAX);

            /// Wrap an arena position.  The sentinel value is unreachable
            /// for any real arena; checked in debug builds.
            #[inline]
            pub fn from_index(index: usize) -> $name {
                debug_assert!(index < u32::MAX as usize);
                $name(index as u32)
            }

            /// The arena position this id refers to.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `false` only for the `INVALID` sentinel.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($tag, "#{}"), self.0)
                } else {
                    f.write_str(concat!($tag, "#-"))
                }
            }
        }
    };
}

arena_id! {
    /// Position of a snapped junction in the graph's node arena.
    pub struct NodeId, "node"
}

arena_id! {
    /// Position of a directed edge in the graph's edge arena (sorted by
    /// source node, so a node's out-edges are one contiguous id range).
    pub struct EdgeId, "edge"
}

arena_id! {
    /// Position of a line feature in the input collection.  This is the
    /// stable public identifier used by closures and per-feature metrics;
    /// synthetic connector edges carry the sentinel instead.
    pub struct FeatureId, "feature"
}

arena_id! {
    /// Position of a vehicle particle in the animation pool.
    pub struct ParticleId, "particle"
}
