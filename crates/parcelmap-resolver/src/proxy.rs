//! HTTP fetcher that relays requests through a CORS-style indirection proxy.
//!
//! The fully built target URL (including its own query string) is
//! percent-encoded and appended to the proxy prefix, e.g.
//! `https://proxy.example/raw?url=` + `https%3A%2F%2Fgis...%3Ff%3Djson`.
//! Without a prefix the target is requested directly.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ResolveError;

/// HTTP client for proxied JSON requests with a per-call deadline.
pub struct ProxyClient {
    client: Client,
    proxy_prefix: Option<String>,
}

impl ProxyClient {
    /// Creates a client. `proxy_prefix` of `None` (or blank) sends requests
    /// straight to the target.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(proxy_prefix: Option<&str>, user_agent: &str) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let proxy_prefix = proxy_prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned);
        Ok(Self {
            client,
            proxy_prefix,
        })
    }

    /// `true` when requests are relayed through an indirection prefix.
    #[must_use]
    pub fn is_proxied(&self) -> bool {
        self.proxy_prefix.is_some()
    }

    /// Fetches `target` with `params` and parses the body as JSON.
    ///
    /// Send and body read share one deadline; on expiry the in-flight
    /// request is dropped and [`ResolveError::Timeout`] is returned.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Timeout`]: the deadline expired.
    /// - [`ResolveError::Network`]: transport failure (DNS, refused, reset).
    /// - [`ResolveError::HttpStatus`]: non-2xx status from the proxy or target.
    /// - [`ResolveError::Deserialize`]: body is not JSON.
    /// - [`ResolveError::Upstream`]: body is an error envelope.
    /// - [`ResolveError::InvalidUrl`]: `target` cannot be parsed.
    pub async fn fetch_json(
        &self,
        target: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Value, ResolveError> {
        let target_url = Self::target_url(target, params)?;
        let request_url = self.request_url(&target_url);
        let url = target_url.to_string();

        tracing::debug!(
            url = %url,
            proxied = self.is_proxied(),
            timeout_ms = timeout.as_millis(),
            "fetching"
        );

        let exchange = async {
            let response = self
                .client
                .get(&request_url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| classify_transport(e, &url, timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ResolveError::HttpStatus {
                    status: status.as_u16(),
                    url: url.clone(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| classify_transport(e, &url, timeout))
        };

        let body = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| ResolveError::Timeout {
                url: url.clone(),
                timeout_ms: millis(timeout),
            })??;

        let value: Value = serde_json::from_str(&body).map_err(|e| ResolveError::Deserialize {
            context: url.clone(),
            source: e,
        })?;
        check_error_envelope(&value, &url)?;
        Ok(value)
    }

    /// Builds the target URL with properly percent-encoded query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidUrl`] if `target` is not a valid
    /// absolute URL.
    pub fn target_url(target: &str, params: &[(&str, &str)]) -> Result<Url, ResolveError> {
        let mut url = Url::parse(target).map_err(|e| ResolveError::InvalidUrl {
            url: target.to_owned(),
            reason: e.to_string(),
        })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// URL actually requested: the proxy prefix plus the encoded target, or
    /// the target itself when no proxy is configured.
    #[must_use]
    pub fn request_url(&self, target: &Url) -> String {
        match &self.proxy_prefix {
            Some(prefix) => format!(
                "{prefix}{}",
                utf8_percent_encode(target.as_str(), NON_ALPHANUMERIC)
            ),
            None => target.to_string(),
        }
    }
}

fn classify_transport(err: reqwest::Error, url: &str, timeout: Duration) -> ResolveError {
    if err.is_timeout() {
        ResolveError::Timeout {
            url: url.to_owned(),
            timeout_ms: millis(timeout),
        }
    } else {
        ResolveError::Network {
            url: url.to_owned(),
            source: err,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Rejects bodies that are error envelopes rather than data.
///
/// Recognized shapes:
/// - proxy: `{"error": true, "message": "..."}`
/// - `ArcGIS`: `{"error": {"code": 400, "message": "...", "details": [..]}}`
/// - bare: `{"error": "..."}`
fn check_error_envelope(body: &Value, url: &str) -> Result<(), ResolveError> {
    let Some(error) = body.get("error") else {
        return Ok(());
    };

    let message = match error {
        Value::Bool(true) => body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("proxy reported an error")
            .to_string(),
        Value::Object(detail) => {
            let text = detail
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            match detail.get("code").and_then(Value::as_i64) {
                Some(code) => format!("{code} {text}"),
                None => text.to_string(),
            }
        }
        Value::String(text) if !text.is_empty() => text.clone(),
        _ => return Ok(()),
    };

    Err(ResolveError::Upstream {
        url: url.to_owned(),
        message,
    })
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
