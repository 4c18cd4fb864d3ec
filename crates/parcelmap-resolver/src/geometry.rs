//! Polygon extraction for parcel highlighting.
//!
//! Services return `[x, y]` (longitude, latitude); map consumers expect
//! `[lat, lng]`, so every vertex is swapped on the way out.

use serde_json::Value;

/// One polygon ring as `[lat, lng]` vertices.
pub type Ring = Vec<[f64; 2]>;

/// Extracts polygon rings from a feature geometry.
///
/// Accepts Esri `{"rings": [...]}` and `GeoJSON` `Polygon` /
/// `MultiPolygon`. Non-numeric vertices are skipped; returns `None` when no
/// ring has any usable vertex (points, lines, empty geometry).
#[must_use]
pub fn polygon_rings(geometry: &Value) -> Option<Vec<Ring>> {
    let rings: Vec<Ring> = if let Some(rings) = geometry.get("rings").and_then(Value::as_array) {
        rings.iter().filter_map(swap_ring).collect()
    } else {
        let coordinates = geometry.get("coordinates").and_then(Value::as_array)?;
        match geometry.get("type").and_then(Value::as_str) {
            Some("Polygon") => coordinates.iter().filter_map(swap_ring).collect(),
            Some("MultiPolygon") => coordinates
                .iter()
                .filter_map(Value::as_array)
                .flatten()
                .filter_map(swap_ring)
                .collect(),
            _ => return None,
        }
    };

    (!rings.is_empty()).then_some(rings)
}

fn swap_ring(ring: &Value) -> Option<Ring> {
    let vertices: Ring = ring
        .as_array()?
        .iter()
        .filter_map(|vertex| {
            let pair = vertex.as_array()?;
            let x = pair.first()?.as_f64()?;
            let y = pair.get(1)?.as_f64()?;
            Some([y, x])
        })
        .collect();
    (!vertices.is_empty()).then_some(vertices)
}
