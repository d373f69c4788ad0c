//! Geographic coordinate type and the planar/spherical geometry kernel.
//!
//! Coordinates are WGS-84 `(lng, lat)` degrees stored as `f64`.  Double
//! precision matters here: node snapping quantizes at 1e-4 degrees and the
//! segment-intersection tests below resolve cross products down to an epsilon
//! of 1e-9, both beyond what `f32` can hold at city longitudes.
//!
//! Distances are great-circle (haversine) metres; intersection and
//! containment tests run in raw lng/lat space, which is accurate enough for
//! footprint-scale polygons.  All comparisons are inclusive: touching counts
//! as intersecting, and a point on a ring edge counts as inside.

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Epsilon for signed cross products in the intersection tests.
const CROSS_EPS: f64 = 1e-9;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate: `(lng, lat)` in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// `true` when both components are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// Linear interpolation from `self` toward `other` at fraction `t`.
    ///
    /// Used for particle positions along an edge; `t` is not clamped.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lng: self.lng + (other.lng - self.lng) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}

// ── Distances ─────────────────────────────────────────────────────────────────

/// Haversine great-circle distance in metres.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Distance in metres from `p` to the segment `a`–`b`.
///
/// The projection parameter is computed in planar lng/lat space and clamped
/// to `[0, 1]`; the metre distance is then haversine from `p` to the
/// projected point.  A zero-length segment collapses to the point case.
pub fn segment_distance_m(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let dx = b.lng - a.lng;
    let dy = b.lat - a.lat;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return haversine_m(p, a);
    }
    let t = (((p.lng - a.lng) * dx + (p.lat - a.lat) * dy) / len2).clamp(0.0, 1.0);
    let proj = GeoPoint::new(a.lng + t * dx, a.lat + t * dy);
    haversine_m(p, proj)
}

/// Minimum distance in metres from `p` to any segment of `coords`.
///
/// Returns `f64::INFINITY` for an empty polyline and the point distance for
/// a single-vertex one.
pub fn polyline_distance_m(p: GeoPoint, coords: &[GeoPoint]) -> f64 {
    match coords {
        [] => f64::INFINITY,
        [only] => haversine_m(p, *only),
        _ => coords
            .windows(2)
            .map(|w| segment_distance_m(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Total haversine length of a polyline in metres.
pub fn polyline_length_m(coords: &[GeoPoint]) -> f64 {
    coords.windows(2).map(|w| haversine_m(w[0], w[1])).sum()
}

// ── Bounding boxes ────────────────────────────────────────────────────────────

/// An axis-aligned lng/lat bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BBox {
    /// The tight box around `coords`, or `None` for an empty slice.
    pub fn of(coords: &[GeoPoint]) -> Option<BBox> {
        let first = coords.first()?;
        let mut bbox = BBox {
            min_lng: first.lng,
            min_lat: first.lat,
            max_lng: first.lng,
            max_lat: first.lat,
        };
        for p in &coords[1..] {
            bbox.min_lng = bbox.min_lng.min(p.lng);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lng = bbox.max_lng.max(p.lng);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    /// A degenerate box containing only `center`, for later `expand` calls.
    pub fn around(center: GeoPoint) -> BBox {
        BBox {
            min_lng: center.lng,
            min_lat: center.lat,
            max_lng: center.lng,
            max_lat: center.lat,
        }
    }

    /// Grow the box by `margin_deg` on every side.
    pub fn expand(self, margin_deg: f64) -> BBox {
        BBox {
            min_lng: self.min_lng - margin_deg,
            min_lat: self.min_lat - margin_deg,
            max_lng: self.max_lng + margin_deg,
            max_lat: self.max_lat + margin_deg,
        }
    }

    /// Inclusive overlap test: boxes that merely touch intersect.
    #[inline]
    pub fn intersects(self, other: BBox) -> bool {
        self.min_lng <= other.max_lng
            && self.max_lng >= other.min_lng
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }

    /// Inclusive containment test for a point.
    #[inline]
    pub fn contains(self, p: GeoPoint) -> bool {
        p.lng >= self.min_lng && p.lng <= self.max_lng && p.lat >= self.min_lat && p.lat <= self.max_lat
    }

    pub fn width(self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn height(self) -> f64 {
        self.max_lat - self.min_lat
    }
}

// ── Segment intersection ──────────────────────────────────────────────────────

/// Signed cross product of `o→a` × `o→b` in lng/lat space.
#[inline]
fn cross(o: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    (a.lng - o.lng) * (b.lat - o.lat) - (a.lat - o.lat) * (b.lng - o.lng)
}

/// `true` when `p` is collinear with `a`–`b` (caller-checked) and lies
/// within the segment's bounding box.
#[inline]
fn on_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> bool {
    p.lng >= a.lng.min(b.lng)
        && p.lng <= a.lng.max(b.lng)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

/// Whether segments `a`–`b` and `c`–`d` intersect.
///
/// Proper crossings use signed cross products against an epsilon of 1e-9;
/// collinear endpoints falling on the other segment count as intersection.
/// Degenerate zero-length segments collapse to the point-on-segment case.
pub fn segments_intersect(a: GeoPoint, b: GeoPoint, c: GeoPoint, d: GeoPoint) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);

    if ((d1 > CROSS_EPS && d2 < -CROSS_EPS) || (d1 < -CROSS_EPS && d2 > CROSS_EPS))
        && ((d3 > CROSS_EPS && d4 < -CROSS_EPS) || (d3 < -CROSS_EPS && d4 > CROSS_EPS))
    {
        return true;
    }

    // Collinear fallbacks: an endpoint lying exactly on the other segment.
    (d1.abs() <= CROSS_EPS && on_segment(a, c, d))
        || (d2.abs() <= CROSS_EPS && on_segment(b, c, d))
        || (d3.abs() <= CROSS_EPS && on_segment(c, a, b))
        || (d4.abs() <= CROSS_EPS && on_segment(d, a, b))
}

// ── Ring containment ──────────────────────────────────────────────────────────

/// Even-odd ray-casting containment test for a closed ring.
///
/// A point lying on a ring edge is explicitly detected and counts as inside.
/// The ring may or may not repeat its first vertex; both forms work because
/// the edge loop wraps around.
pub fn point_in_ring(p: GeoPoint, ring: &[GeoPoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let n = ring.len();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];

        if cross(a, b, p).abs() <= CROSS_EPS && on_segment(p, a, b) {
            return true; // on the boundary
        }

        if (a.lat > p.lat) != (b.lat > p.lat) {
            let x = a.lng + (p.lat - a.lat) * (b.lng - a.lng) / (b.lat - a.lat);
            if p.lng < x {
                inside = !inside;
            }
        }
    }
    inside
}
