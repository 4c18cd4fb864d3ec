//! Data-source configuration: endpoint lists, search bias and field map.
//!
//! Loaded from `config/sources.yaml` so the same pipeline can be pointed at
//! a different county without code changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::field_map::FieldMap;
use crate::property::LatLng;
use crate::ConfigError;

/// Ordered, immutable list of service base URLs.
///
/// Blank entries are dropped and trailing slashes trimmed at construction;
/// the remaining order is the fallback priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Option<String>>")]
pub struct EndpointList(Vec<String>);

impl EndpointList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .map(|e| e.as_ref().trim().trim_end_matches('/').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Option<String>>> for EndpointList {
    fn from(entries: Vec<Option<String>>) -> Self {
        Self::new(entries.into_iter().flatten())
    }
}

/// Bounding box (WGS84) that biases forward geocoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchExtent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Default for SearchExtent {
    /// State of Oregon.
    fn default() -> Self {
        Self {
            xmin: -124.70,
            ymin: 41.99,
            xmax: -116.46,
            ymax: 46.29,
        }
    }
}

impl SearchExtent {
    /// `xmin,ymin,xmax,ymax` as accepted by `findAddressCandidates`.
    #[must_use]
    pub fn to_param(&self) -> String {
        format!("{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.ymin + self.ymax) / 2.0,
            (self.xmin + self.xmax) / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub extent: SearchExtent,
    /// Geocoder category filter, e.g. `Address,Postal`.
    pub category: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            extent: SearchExtent::default(),
            category: "Address,Postal,POI".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Feature-service layers queried for the intersecting taxlot.
    pub taxlot_endpoints: EndpointList,
    /// Geocode servers, primary first. Used for reverse geocoding and, unless
    /// `search_geocoders` is set, for address search.
    pub geocoders: EndpointList,
    pub search_geocoders: Option<EndpointList>,
    pub search: SearchSettings,
    pub field_map: FieldMap,
}

impl SourcesConfig {
    /// Geocoders used for forward search.
    #[must_use]
    pub fn search_endpoints(&self) -> &EndpointList {
        match &self.search_geocoders {
            Some(list) if !list.is_empty() => list,
            _ => &self.geocoders,
        }
    }

    /// Parse and validate a sources document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let sources: SourcesConfig =
            serde_yaml::from_str(content).map_err(ConfigError::SourcesFileParse)?;
        validate_sources(&sources)?;
        Ok(sources)
    }
}

/// Load and validate the sources configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources = SourcesConfig::from_yaml_str(&content)?;

    if sources.taxlot_endpoints.is_empty() {
        tracing::warn!(
            path = %path.display(),
            "no taxlot endpoints configured; identify will only use geocoder fallbacks"
        );
    }
    tracing::debug!(
        taxlot_endpoints = sources.taxlot_endpoints.len(),
        geocoders = sources.geocoders.len(),
        search_geocoders = sources.search_endpoints().len(),
        "loaded data sources"
    );

    Ok(sources)
}

fn validate_sources(sources: &SourcesConfig) -> Result<(), ConfigError> {
    let lists = [
        ("taxlot_endpoints", &sources.taxlot_endpoints),
        ("geocoders", &sources.geocoders),
        ("search_geocoders", sources.search_endpoints()),
    ];

    for (name, list) in lists {
        for endpoint in list.iter() {
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(ConfigError::Validation(format!(
                    "{name} entry '{endpoint}' must be an http(s) URL"
                )));
            }
        }
    }

    let extent = sources.search.extent;
    if !(extent.xmin < extent.xmax && extent.ymin < extent.ymax) {
        return Err(ConfigError::Validation(format!(
            "search extent {} is empty or inverted",
            extent.to_param()
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
