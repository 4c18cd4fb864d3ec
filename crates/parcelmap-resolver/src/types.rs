//! Wire types for the ArcGIS REST responses the pipelines consume.
//!
//! Every field is optional or defaulted: county services differ in what
//! they return and a missing piece should degrade the result, not fail the
//! parse.

use parcelmap_core::{LatLng, RawAttributes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from `<layer>/query`.
#[derive(Debug, Deserialize)]
pub struct FeatureQueryResponse {
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

/// One feature. Esri JSON uses `attributes`; `GeoJSON` output uses
/// `properties`.
#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default, alias = "properties")]
    pub attributes: Option<RawAttributes>,

    /// Kept untyped: Esri `rings` and `GeoJSON` `coordinates` are both
    /// accepted, see [`crate::geometry::polygon_rings`].
    #[serde(default)]
    pub geometry: Option<Value>,
}

/// Response from `<geocoder>/reverseGeocode`.
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub address: Option<RawAttributes>,
}

/// Response from `<geocoder>/findAddressCandidates`.
#[derive(Debug, Deserialize)]
pub struct CandidatesResponse {
    #[serde(default)]
    pub candidates: Option<Vec<WireCandidate>>,
}

#[derive(Debug, Deserialize)]
pub struct WireCandidate {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub location: Option<WirePoint>,
}

/// Esri point, `x` = longitude and `y` = latitude in WGS84.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WirePoint {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl WirePoint {
    #[must_use]
    pub fn to_lat_lng(self) -> Option<LatLng> {
        let point = LatLng::new(self.y?, self.x?);
        point.is_valid().then_some(point)
    }
}

/// A forward-geocoding match offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    pub address: String,
    /// Match confidence, 0 to 100.
    pub match_score: f64,
    pub location: LatLng,
}

impl SearchCandidate {
    /// Maps a wire candidate; `None` when it has no usable location.
    #[must_use]
    pub fn from_wire(candidate: WireCandidate) -> Option<Self> {
        let location = candidate.location?.to_lat_lng()?;
        let address = candidate
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| location.to_string());
        let match_score = candidate
            .score
            .filter(|s| s.is_finite())
            .map_or(0.0, |s| s.clamp(0.0, 100.0));
        Some(Self {
            address,
            match_score,
            location,
        })
    }
}
