mod identify;
mod saved;
mod search;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use parcelmap_core::SavedStore;
use parcelmap_resolver::ParcelResolver;
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Shared server state.
///
/// The saved-list lock is held across check, insert and persist so
/// duplicate detection cannot race.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ParcelResolver>,
    pub saved: Arc<Mutex<SavedStore>>,
}

impl AppState {
    pub fn new(resolver: ParcelResolver, saved: SavedStore) -> Self {
        Self {
            resolver: Arc::new(resolver),
            saved: Arc::new(Mutex::new(saved)),
        }
    }
}

/// Success envelope: `{ "data": ..., "meta": { "request_id", "timestamp" } }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

/// Machine-readable error category; determines the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    Conflict,
    UpstreamUnavailable,
    InternalError,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope: `{ "error": { "code", "message" }, "meta": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(request_id: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.error.code.status(), Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    taxlot_endpoints: usize,
    geocoders: usize,
    proxied: bool,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/identify", get(identify::identify))
        .route("/api/v1/search", get(search::search))
        .route(
            "/api/v1/saved",
            get(saved::list_saved).post(saved::save_property),
        )
        .route("/api/v1/saved/export", get(saved::export_saved))
        .route("/api/v1/saved/{id}", delete(saved::remove_saved))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let sources = state.resolver.sources();
    let data = HealthData {
        status: "ok",
        taxlot_endpoints: sources.taxlot_endpoints.len(),
        geocoders: sources.geocoders.len(),
        proxied: state.resolver.is_proxied(),
    };
    Json(ApiResponse::new(data, req_id.0))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
