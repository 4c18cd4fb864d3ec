use axum::{
    extract::{Query, State},
    Extension, Json,
};
use parcelmap_core::{LatLng, PropertyView};
use parcelmap_resolver::{DataQuality, ParcelResolution};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ErrorCode};

/// An identify result plus its display-ready view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResolutionData {
    quality: DataQuality,
    view: PropertyView,
    #[serde(flatten)]
    resolution: ParcelResolution,
}

impl From<ParcelResolution> for ResolutionData {
    fn from(resolution: ParcelResolution) -> Self {
        Self {
            quality: resolution.quality(),
            view: resolution.property.view(),
            resolution,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct IdentifyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Resolves a map click.
///
/// The server keeps no per-client selection; the caller posts the returned
/// `property` back to `/saved` to keep it.
pub(super) async fn identify(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<IdentifyQuery>,
) -> Result<Json<ApiResponse<ResolutionData>>, ApiError> {
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(ApiError::new(
            req_id.0,
            ErrorCode::ValidationError,
            "lat and lng query parameters are required",
        ));
    };
    let point = LatLng::new(lat, lng);
    if !point.is_valid() {
        return Err(ApiError::new(
            req_id.0,
            ErrorCode::ValidationError,
            "lat must be within [-90, 90] and lng within [-180, 180]",
        ));
    }

    let resolution = state.resolver.identify(point).await;

    Ok(Json(ApiResponse::new(ResolutionData::from(resolution), req_id.0)))
}
