use axum::{
    extract::{Query, State},
    Extension, Json,
};
use parcelmap_resolver::{ResolveError, SearchCandidate};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ErrorCode};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
}

/// Address search. No matches is a 200 with an empty list.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchCandidate>>>, ApiError> {
    let text = query.q.unwrap_or_default();
    let candidates = state.resolver.search(&text).await.map_err(|e| {
        tracing::error!(error = %e, "address search failed");
        match e {
            ResolveError::Unreachable { .. } => ApiError::new(
                req_id.0.clone(),
                ErrorCode::UpstreamUnavailable,
                "address search is unavailable; check your network connection",
            ),
            _ => ApiError::new(
                req_id.0.clone(),
                ErrorCode::InternalError,
                "address search failed",
            ),
        }
    })?;

    Ok(Json(ApiResponse::new(candidates, req_id.0)))
}
