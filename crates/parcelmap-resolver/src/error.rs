use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The proxy or the upstream service answered with an error envelope.
    #[error("upstream error from {url}: {message}")]
    Upstream { url: String, message: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Every endpoint failed at the transport level.
    #[error("no geocoder reachable: {}", reasons.join("; "))]
    Unreachable { reasons: Vec<String> },
}

impl ResolveError {
    /// `true` when the request never produced a response: deadline expiry
    /// or a transport failure.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ResolveError::Timeout { .. } | ResolveError::Network { .. }
        )
    }

    /// Short failure reason without the request URL, for per-endpoint
    /// diagnostics where the endpoint is already named.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            ResolveError::Timeout { timeout_ms, .. } => format!("timed out after {timeout_ms}ms"),
            ResolveError::Network { source, .. } => format!("network error: {source}"),
            ResolveError::HttpStatus { status, .. } => format!("HTTP {status}"),
            ResolveError::Deserialize { source, .. } => format!("malformed response: {source}"),
            ResolveError::Upstream { message, .. } => format!("service error: {message}"),
            other => other.to_string(),
        }
    }
}
