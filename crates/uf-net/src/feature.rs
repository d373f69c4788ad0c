//! Input line features.

use uf_core::{BBox, GeoPoint};

use crate::HighwayClass;

/// One input polyline with its highway class.
///
/// Identity is positional: a feature's index in the input collection is its
/// stable public id (`FeatureId`), referenced by closures and metrics.  The
/// collection therefore keeps an entry for every input feature — even
/// degenerate ones with fewer than two valid vertices — so that indices never
/// shift; degenerate features simply contribute no edges.
#[derive(Clone, Debug)]
pub struct LineFeature {
    /// Vertices with finite coordinates, in input order.
    pub coords: Vec<GeoPoint>,
    pub class: HighwayClass,
    pub name: Option<String>,
}

impl LineFeature {
    pub fn new(coords: Vec<GeoPoint>, class: HighwayClass) -> Self {
        Self { coords, class, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// `true` when the feature can produce at least one edge.
    #[inline]
    pub fn is_routable(&self) -> bool {
        self.coords.len() >= 2
    }

    /// Tight bounding box, `None` for an empty polyline.
    pub fn bbox(&self) -> Option<BBox> {
        BBox::of(&self.coords)
    }
}
