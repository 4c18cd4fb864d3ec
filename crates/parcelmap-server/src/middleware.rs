use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id for one request, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags each request with a [`RequestId`] and echoes it on the response.
///
/// A non-blank incoming `x-request-id` is kept so callers can correlate
/// logs across hops; otherwise a UUID v4 is minted.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    {
        Some(incoming) if !incoming.is_empty() => incoming.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    tracing::debug!(request_id = %id, method = %req.method(), path = %req.uri().path(), "request");
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
