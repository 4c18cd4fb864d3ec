//! Free-text address search over the configured geocoders.

use crate::error::ResolveError;
use crate::parcel::ParcelResolver;
use crate::sequencer::{try_sequentially, Attempt};
use crate::types::{CandidatesResponse, SearchCandidate};

impl ParcelResolver {
    /// Finds address candidates for `query`, best match first.
    ///
    /// Queries shorter than the configured minimum return an empty list
    /// without touching the network. An empty list is also returned when
    /// every geocoder answered without matches.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unreachable`] only when every geocoder failed
    /// at the transport level (timeout or network error).
    pub async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, ResolveError> {
        let query = query.trim();
        if query.chars().count() < self.settings.search_min_chars {
            tracing::debug!(query, "search query below minimum length, skipping");
            return Ok(Vec::new());
        }

        let outcome = try_sequentially(self.sources.search_endpoints(), |endpoint| {
            self.find_candidates(endpoint, query)
        })
        .await;

        if let Some(candidates) = outcome.value {
            tracing::info!(
                query,
                count = candidates.len(),
                endpoint = outcome.endpoint.as_deref().unwrap_or_default(),
                "search candidates found"
            );
            return Ok(candidates);
        }

        if outcome.all_transport_failures() {
            return Err(ResolveError::Unreachable {
                reasons: outcome.reasons(),
            });
        }

        tracing::info!(query, tried = outcome.failures.len(), "search found no candidates");
        Ok(Vec::new())
    }

    async fn find_candidates(
        &self,
        endpoint: &str,
        query: &str,
    ) -> Result<Attempt<Vec<SearchCandidate>>, ResolveError> {
        let url = format!("{endpoint}/findAddressCandidates");
        let search = &self.sources.search;
        let max_locations = self.settings.search_max_results.to_string();
        let extent = search.extent.to_param();
        let center = search.extent.center();
        let location = format!("{},{}", center.lng, center.lat);

        let mut params = vec![
            ("f", "json"),
            ("SingleLine", query),
            ("maxLocations", max_locations.as_str()),
            ("outFields", "*"),
            ("searchExtent", extent.as_str()),
            ("location", location.as_str()),
        ];
        if !search.category.trim().is_empty() {
            params.push(("category", search.category.as_str()));
        }

        let body = self
            .client()
            .fetch_json(&url, &params, self.settings.search_timeout)
            .await?;
        let response: CandidatesResponse =
            serde_json::from_value(body).map_err(|e| ResolveError::Deserialize {
                context: url.clone(),
                source: e,
            })?;

        let candidates: Vec<SearchCandidate> = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(SearchCandidate::from_wire)
            .take(self.settings.search_max_results)
            .collect();

        if candidates.is_empty() {
            Ok(Attempt::Empty("no candidates".to_string()))
        } else {
            Ok(Attempt::Found(candidates))
        }
    }
}
