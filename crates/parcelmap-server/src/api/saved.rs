use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use parcelmap_core::{render_report, Property, PropertyView, SavedError, SavedProperty};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ErrorCode};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SavedItem {
    id: Uuid,
    saved_at: DateTime<Utc>,
    view: PropertyView,
    property: Property,
}

impl From<SavedProperty> for SavedItem {
    fn from(saved: SavedProperty) -> Self {
        Self {
            id: saved.id,
            saved_at: saved.saved_at,
            view: saved.property.view(),
            property: saved.property,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    /// Comma-separated saved ids; absent exports everything.
    pub ids: Option<String>,
}

fn map_saved_error(req_id: &str, e: &SavedError) -> ApiError {
    match e {
        SavedError::AlreadySaved { .. } => {
            ApiError::new(req_id, ErrorCode::Conflict, "property already saved")
        }
        SavedError::NotFound(id) => {
            ApiError::new(req_id, ErrorCode::NotFound, format!("no saved property with id {id}"))
        }
        SavedError::Io { .. } | SavedError::Json { .. } => {
            tracing::error!(error = %e, "saved list write failed");
            ApiError::new(req_id, ErrorCode::InternalError, "failed to persist saved list")
        }
    }
}

fn parse_id(req_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::new(
            req_id,
            ErrorCode::ValidationError,
            format!("invalid saved property id: {raw}"),
        )
    })
}

pub(super) async fn list_saved(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<SavedItem>>> {
    let data: Vec<SavedItem> = state
        .saved
        .lock()
        .await
        .entries()
        .iter()
        .cloned()
        .map(SavedItem::from)
        .collect();

    Json(ApiResponse::new(data, req_id.0))
}

/// Body of `POST /saved`: the `property` object returned by identify.
#[derive(Debug, Deserialize)]
pub(super) struct SaveRequest {
    pub property: Property,
}

/// Saves the property the caller identified.
pub(super) async fn save_property(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(SaveRequest { property }) = body.map_err(|rejection| {
        ApiError::new(
            req_id.0.clone(),
            ErrorCode::ValidationError,
            format!("invalid save request: {}", rejection.body_text()),
        )
    })?;

    let saved = state
        .saved
        .lock()
        .await
        .save(property)
        .map_err(|e| map_saved_error(&req_id.0, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(SavedItem::from(saved), req_id.0)),
    ))
}

pub(super) async fn remove_saved(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SavedItem>>, ApiError> {
    let id = parse_id(&req_id.0, &id)?;
    let removed = state
        .saved
        .lock()
        .await
        .remove(id)
        .map_err(|e| map_saved_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse::new(SavedItem::from(removed), req_id.0)))
}

/// Plain-text report of all saved properties or of the `ids` subset.
pub(super) async fn export_saved(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ids = match query.ids.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            raw.split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| parse_id(&req_id.0, part))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        _ => None,
    };

    let store = state.saved.lock().await;
    let entries = store.entries();
    let report = match &ids {
        Some(ids) => render_report(entries.select(ids), Utc::now()),
        None => render_report(entries.iter(), Utc::now()),
    };
    drop(store);

    tracing::info!(selected = ?ids.as_ref().map(Vec::len), "exported saved properties");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"property-report.txt\"",
            ),
        ],
        report,
    ))
}
