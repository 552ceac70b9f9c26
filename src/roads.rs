//! Road targets discovered from map geometry.
//!
//! Feature services return road centrelines as a GeoJSON `FeatureCollection`.
//! Segments are grouped by their `NAME` property so each named road becomes a
//! single [`RoadTarget`].

use crate::analyzers::types::RoadTarget;
use crate::error::AggregatorError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Name given to segments without a `NAME` property.
pub const UNNAMED: &str = "Unnamed";

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Value>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
}

/// Extracts one target per distinct road name from a GeoJSON feature
/// collection.
///
/// Only `LineString` and `MultiLineString` features are considered. Names are
/// grouped case-insensitively and the first spelling seen is kept.
///
/// # Errors
///
/// Returns [`AggregatorError::Geometry`] if the text is not a feature
/// collection.
pub fn targets_from_geojson(text: &str) -> Result<Vec<RoadTarget>, AggregatorError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;

    if collection.features.is_empty() {
        warn!("No features in road geometry");
    }

    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    let mut segments = 0usize;

    for feature in &collection.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        if geometry.kind != "LineString" && geometry.kind != "MultiLineString" {
            continue;
        }
        segments += 1;

        let name = feature
            .properties
            .as_ref()
            .and_then(|p| p.get("NAME"))
            .and_then(name_of)
            .unwrap_or_else(|| UNNAMED.to_string());

        if seen.insert(name.to_lowercase()) {
            targets.push(RoadTarget::new(name));
        }
    }

    debug!(segments, roads = targets.len(), "Grouped road segments by name");

    Ok(targets)
}

/// One display name per non-blank line.
pub fn targets_from_list(text: &str) -> Vec<RoadTarget> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(RoadTarget::new)
        .collect()
}

fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
