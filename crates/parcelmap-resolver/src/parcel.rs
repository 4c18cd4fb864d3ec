//! Point-to-parcel resolution with ordered degradation.
//!
//! Strategies, first hit wins:
//! 1. spatial intersection query against each taxlot layer
//! 2. reverse geocode against each geocoder
//! 3. bare-coordinate placeholder
//!
//! [`ParcelResolver::identify`] cannot fail; every path yields a
//! displayable [`Property`].

use std::time::Duration;

use parcelmap_core::{normalize, AppConfig, LatLng, Property, PropertySource, SourcesConfig};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::geometry::{polygon_rings, Ring};
use crate::proxy::ProxyClient;
use crate::sequencer::{try_sequentially, Attempt, AttemptFailure};
use crate::types::{FeatureQueryResponse, ReverseGeocodeResponse};

/// Deadlines and limits for the resolution pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub taxlot_timeout: Duration,
    pub reverse_geocode_timeout: Duration,
    pub search_timeout: Duration,
    pub search_max_results: usize,
    pub search_min_chars: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            taxlot_timeout: Duration::from_millis(8000),
            reverse_geocode_timeout: Duration::from_millis(7000),
            search_timeout: Duration::from_millis(8000),
            search_max_results: 8,
            search_min_chars: 3,
        }
    }
}

impl ResolverSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            taxlot_timeout: Duration::from_millis(config.taxlot_timeout_ms),
            reverse_geocode_timeout: Duration::from_millis(config.reverse_geocode_timeout_ms),
            search_timeout: Duration::from_millis(config.search_timeout_ms),
            search_max_results: config.search_max_results,
            search_min_chars: config.search_min_chars,
        }
    }
}

/// How complete an identify result is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    /// Full county record.
    Full,
    /// A fallback strategy supplied the record.
    Limited,
}

/// Outcome of [`ParcelResolver::identify`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelResolution {
    pub property: Property,
    /// Parcel outline as `[lat, lng]` rings; only set from a taxlot hit.
    pub geometry: Option<Vec<Ring>>,
    /// Endpoint that supplied the record, if any did.
    pub endpoint: Option<String>,
    /// Every endpoint attempt that produced nothing, across all strategies.
    pub failures: Vec<AttemptFailure>,
}

impl ParcelResolution {
    #[must_use]
    pub fn quality(&self) -> DataQuality {
        match self.property.source {
            PropertySource::Taxlot => DataQuality::Full,
            PropertySource::ReverseGeocode | PropertySource::Coordinates => DataQuality::Limited,
        }
    }
}

/// Drives both pipelines over the configured endpoint lists.
pub struct ParcelResolver {
    client: ProxyClient,
    pub(crate) sources: SourcesConfig,
    pub(crate) settings: ResolverSettings,
}

impl ParcelResolver {
    #[must_use]
    pub fn new(client: ProxyClient, sources: SourcesConfig, settings: ResolverSettings) -> Self {
        Self {
            client,
            sources,
            settings,
        }
    }

    /// Builds a resolver from application config and loaded sources.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, sources: SourcesConfig) -> Result<Self, ResolveError> {
        let client = ProxyClient::new(config.proxy_url.as_deref(), &config.user_agent)?;
        Ok(Self::new(
            client,
            sources,
            ResolverSettings::from_app_config(config),
        ))
    }

    #[must_use]
    pub fn sources(&self) -> &SourcesConfig {
        &self.sources
    }

    #[must_use]
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// `true` when outbound requests go through the indirection proxy.
    #[must_use]
    pub fn is_proxied(&self) -> bool {
        self.client.is_proxied()
    }

    pub(crate) fn client(&self) -> &ProxyClient {
        &self.client
    }

    /// Resolves `point` to a property record, degrading through the
    /// fallback strategies as needed.
    pub async fn identify(&self, point: LatLng) -> ParcelResolution {
        let taxlot = try_sequentially(&self.sources.taxlot_endpoints, |endpoint| {
            self.query_taxlot(endpoint, point)
        })
        .await;
        let mut failures = taxlot.failures;

        if let Some((property, geometry)) = taxlot.value {
            tracing::info!(
                lat = point.lat,
                lng = point.lng,
                endpoint = taxlot.endpoint.as_deref().unwrap_or_default(),
                "parcel resolved from taxlot layer"
            );
            return ParcelResolution {
                property,
                geometry,
                endpoint: taxlot.endpoint,
                failures,
            };
        }

        let reverse = try_sequentially(&self.sources.geocoders, |endpoint| {
            self.reverse_geocode(endpoint, point)
        })
        .await;
        failures.extend(reverse.failures);

        if let Some(property) = reverse.value {
            tracing::warn!(
                lat = point.lat,
                lng = point.lng,
                failures = failures.len(),
                "no taxlot record, using reverse geocode"
            );
            return ParcelResolution {
                property,
                geometry: None,
                endpoint: reverse.endpoint,
                failures,
            };
        }

        tracing::warn!(
            lat = point.lat,
            lng = point.lng,
            failures = failures.len(),
            "no source answered, using coordinate placeholder"
        );
        ParcelResolution {
            property: Property::from_coordinates(point),
            geometry: None,
            endpoint: None,
            failures,
        }
    }

    async fn query_taxlot(
        &self,
        endpoint: &str,
        point: LatLng,
    ) -> Result<Attempt<(Property, Option<Vec<Ring>>)>, ResolveError> {
        let url = format!("{endpoint}/query");
        let geometry = format!("{},{}", point.lng, point.lat);
        let params = [
            ("f", "json"),
            ("geometry", geometry.as_str()),
            ("geometryType", "esriGeometryPoint"),
            ("inSR", "4326"),
            ("spatialRel", "esriSpatialRelIntersects"),
            ("outFields", "*"),
            ("returnGeometry", "true"),
            ("outSR", "4326"),
        ];

        let body = self
            .client
            .fetch_json(&url, &params, self.settings.taxlot_timeout)
            .await?;
        let response: FeatureQueryResponse =
            serde_json::from_value(body).map_err(|e| ResolveError::Deserialize {
                context: url.clone(),
                source: e,
            })?;

        let Some(feature) = response.features.unwrap_or_default().into_iter().next() else {
            return Ok(Attempt::Empty("no parcel at this location".to_string()));
        };
        let attributes = feature.attributes.unwrap_or_default();
        if attributes.is_empty() {
            return Ok(Attempt::Empty("parcel feature has no attributes".to_string()));
        }

        let mut property = normalize(&attributes, &self.sources.field_map);
        property.coordinates = Some(point);
        let rings = feature.geometry.as_ref().and_then(polygon_rings);
        Ok(Attempt::Found((property, rings)))
    }

    async fn reverse_geocode(
        &self,
        endpoint: &str,
        point: LatLng,
    ) -> Result<Attempt<Property>, ResolveError> {
        let url = format!("{endpoint}/reverseGeocode");
        let location = format!("{},{}", point.lng, point.lat);
        let params = [
            ("f", "json"),
            ("location", location.as_str()),
            ("outFields", "*"),
        ];

        let body = self
            .client
            .fetch_json(&url, &params, self.settings.reverse_geocode_timeout)
            .await?;
        let response: ReverseGeocodeResponse =
            serde_json::from_value(body).map_err(|e| ResolveError::Deserialize {
                context: url.clone(),
                source: e,
            })?;

        match response.address.filter(|a| !a.is_empty()) {
            Some(address) => Ok(Attempt::Found(Property::from_reverse_geocode(
                point, &address,
            ))),
            None => Ok(Attempt::Empty("no address for this location".to_string())),
        }
    }
}
