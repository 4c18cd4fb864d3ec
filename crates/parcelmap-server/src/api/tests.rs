use axum::body::{to_bytes, Body};
use axum::http::Request;
use parcelmap_core::{SavedStore, SourcesConfig};
use parcelmap_resolver::{ParcelResolver, ProxyClient, ResolverSettings};
use tower::ServiceExt;

use super::*;

/// App with no configured endpoints: identify always degrades to the
/// coordinate placeholder and no request leaves the process.
fn offline_app() -> Router {
    let resolver = ParcelResolver::new(
        ProxyClient::new(None, "parcelmap-test/0.1").expect("client"),
        SourcesConfig::default(),
        ResolverSettings::default(),
    );
    build_app(AppState::new(resolver, SavedStore::in_memory()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        (ErrorCode::ValidationError, StatusCode::BAD_REQUEST),
        (ErrorCode::NotFound, StatusCode::NOT_FOUND),
        (ErrorCode::Conflict, StatusCode::CONFLICT),
        (ErrorCode::UpstreamUnavailable, StatusCode::BAD_GATEWAY),
        (ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code:?}");
    }
}

#[tokio::test]
async fn health_reports_sources_and_echoes_request_id() {
    let app = offline_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["taxlot_endpoints"], 0);
    assert_eq!(json["meta"]["request_id"], "req-abc");
}

#[tokio::test]
async fn identify_rejects_missing_or_invalid_coordinates() {
    let app = offline_app();

    let (status, json) = send(&app, get("/api/v1/identify?lat=44.0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (status, _) = send(&app, get("/api/v1/identify?lat=120&lng=-123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identify_degrades_to_placeholder() {
    let app = offline_app();

    let (status, json) = send(
        &app,
        get("/api/v1/identify?lat=44.123456&lng=-123.654321"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["quality"], "limited");
    assert_eq!(json["data"]["property"]["source"], "coordinates");
    assert_eq!(
        json["data"]["view"]["fullAddress"],
        "Coordinates: 44.123456, -123.654321"
    );
    assert_eq!(json["data"]["view"]["parcelId"], "N/A");
    assert!(json["data"]["geometry"].is_null());
}

#[tokio::test]
async fn save_rejects_missing_or_malformed_body() {
    let app = offline_app();

    let (status, json) = send(&app, request("POST", "/api/v1/saved")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (status, json) = send(
        &app,
        post_json("/api/v1/saved", &serde_json::json!({ "property": { "owner": 7 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn save_stores_the_posted_property_not_the_latest_identify() {
    let app = offline_app();

    let (_, first) = send(&app, get("/api/v1/identify?lat=44.05&lng=-123.1")).await;
    let (_, second) = send(&app, get("/api/v1/identify?lat=45.52&lng=-122.68")).await;
    assert_ne!(first["data"]["property"], second["data"]["property"]);

    let body = serde_json::json!({ "property": first["data"]["property"].clone() });
    let (status, json) = send(&app, post_json("/api/v1/saved", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["property"]["coordinates"]["lat"], 44.05);
    assert_eq!(json["data"]["property"]["coordinates"]["lng"], -123.1);
    assert_eq!(
        json["data"]["view"]["fullAddress"],
        "Coordinates: 44.050000, -123.100000"
    );
}

#[tokio::test]
async fn saved_list_lifecycle() {
    let app = offline_app();
    let (_, identified) = send(&app, get("/api/v1/identify?lat=44.05&lng=-123.1")).await;
    let body = serde_json::json!({ "property": identified["data"]["property"].clone() });

    let (status, json) = send(&app, post_json("/api/v1/saved", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().expect("saved id").to_string();
    assert!(json["data"]["savedAt"].is_string());

    let (status, json) = send(&app, post_json("/api/v1/saved", &body)).await;
    assert_eq!(status, StatusCode::CONFLICT, "duplicate save must be rejected");
    assert_eq!(json["error"]["code"], "conflict");

    let (status, json) = send(&app, get("/api/v1/saved")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(1));

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/saved/export?ids={id}")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/plain; charset=utf-8")
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let report = String::from_utf8(body.to_vec()).unwrap();
    assert!(report.starts_with("PROPERTY REPORT"));
    assert!(report.contains("Total Properties: 1"));

    let (status, _) = send(&app, request("DELETE", &format!("/api/v1/saved/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, request("DELETE", &format!("/api/v1/saved/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_rejects_malformed_ids() {
    let app = offline_app();
    let (status, json) = send(&app, get("/api/v1/saved/export?ids=not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn short_search_returns_empty_list() {
    let app = offline_app();
    let (status, json) = send(&app, get("/api/v1/search?q=ab")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], serde_json::json!([]));
}
