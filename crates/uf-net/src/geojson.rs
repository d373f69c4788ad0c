//! GeoJSON ingestion: FeatureCollection → `Vec<LineFeature>`.
//!
//! The parser is deliberately forgiving.  Feature indices are the engine's
//! stable public identifiers, so every input feature yields exactly one
//! `LineFeature` slot — features whose geometry cannot be used (wrong type,
//! too few finite coordinates) keep their slot with whatever valid vertices
//! they had and are counted in [`IngestStats`] instead of being dropped.

use serde_json::Value;

use uf_core::GeoPoint;

use crate::{HighwayClass, LineFeature, NetError, NetResult};

/// Ingestion diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Total features in the collection.
    pub features: usize,
    /// Features that produced at least two valid vertices.
    pub routable: usize,
    /// Features skipped for geometry reasons (kept as empty placeholders).
    pub degenerate: usize,
}

/// Parse a GeoJSON FeatureCollection of LineString / MultiLineString
/// features into the engine's input collection.
///
/// - `highway` may be a string or an ordered list of strings; the first
///   non-empty value wins.  Missing or unknown tags map to `road`.
/// - Coordinates are `[lng, lat]`; entries without at least two finite
///   numbers are filtered out.
/// - A MultiLineString contributes its first line.
pub fn parse_lines(input: &str) -> NetResult<(Vec<LineFeature>, IngestStats)> {
    let root: Value = serde_json::from_str(input)?;
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| NetError::GeoJson("missing `features` array".into()))?;

    let mut out = Vec::with_capacity(features.len());
    let mut stats = IngestStats { features: features.len(), ..IngestStats::default() };

    for feature in features {
        let coords = line_coords(feature.get("geometry"));
        let class = highway_class(feature.get("properties"));
        let name = feature
            .get("properties")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        if coords.len() >= 2 {
            stats.routable += 1;
        } else {
            stats.degenerate += 1;
        }

        let mut lf = LineFeature::new(coords, class);
        lf.name = name;
        out.push(lf);
    }

    if stats.degenerate > 0 {
        log::debug!(
            target: "GRAPH_BUILD",
            "ingested {} features ({} degenerate)",
            stats.features,
            stats.degenerate
        );
    }
    Ok((out, stats))
}

/// Extract the vertex list of a LineString (or the first line of a
/// MultiLineString), filtering entries without two finite numbers.
fn line_coords(geometry: Option<&Value>) -> Vec<GeoPoint> {
    let Some(geometry) = geometry else { return Vec::new() };
    let line = match geometry.get("type").and_then(Value::as_str) {
        Some("LineString") => geometry.get("coordinates"),
        Some("MultiLineString") => geometry
            .get("coordinates")
            .and_then(Value::as_array)
            .and_then(|lines| lines.first()),
        _ => None,
    };
    let Some(entries) = line.and_then(Value::as_array) else { return Vec::new() };

    entries
        .iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            let lng = pair.first().and_then(Value::as_f64)?;
            let lat = pair.get(1).and_then(Value::as_f64)?;
            let p = GeoPoint::new(lng, lat);
            p.is_finite().then_some(p)
        })
        .collect()
}

/// Resolve the `highway` property: string, or list with the first non-empty
/// element winning.
fn highway_class(properties: Option<&Value>) -> HighwayClass {
    let tag = properties.and_then(|p| p.get("highway"));
    let value = match tag {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty()),
        _ => None,
    };
    match value {
        Some(s) if !s.is_empty() => HighwayClass::from_tag(s),
        _ => HighwayClass::Road,
    }
}
