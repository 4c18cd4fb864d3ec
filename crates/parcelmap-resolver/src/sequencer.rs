//! Ordered fallback over a list of equivalent endpoints.
//!
//! Attempts run one at a time in configured order. The first attempt that
//! yields data wins and no later endpoint is contacted. Every failed or
//! empty attempt is recorded so callers can report why nothing was found.

use std::fmt;
use std::future::Future;

use parcelmap_core::EndpointList;
use serde::Serialize;

use crate::error::ResolveError;

/// Result of one successful exchange with an endpoint.
#[derive(Debug)]
pub enum Attempt<T> {
    /// Usable data; stops the sequence.
    Found(T),
    /// Valid response without data (zero features, no candidates).
    Empty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Network,
    Http,
    Upstream,
    Malformed,
    Empty,
}

impl FailureKind {
    /// `true` when the endpoint never answered.
    #[must_use]
    pub fn is_transport(self) -> bool {
        matches!(self, FailureKind::Timeout | FailureKind::Network)
    }
}

impl From<&ResolveError> for FailureKind {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::Timeout { .. } => FailureKind::Timeout,
            ResolveError::Network { .. } => FailureKind::Network,
            ResolveError::HttpStatus { .. } => FailureKind::Http,
            ResolveError::Upstream { .. } | ResolveError::Unreachable { .. } => {
                FailureKind::Upstream
            }
            ResolveError::Deserialize { .. }
            | ResolveError::InvalidUrl { .. }
            | ResolveError::Client(_) => FailureKind::Malformed,
        }
    }
}

/// Why one endpoint did not produce data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptFailure {
    pub endpoint: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

#[derive(Debug)]
pub struct SequenceOutcome<T> {
    /// Data from the first endpoint that produced any.
    pub value: Option<T>,
    /// Endpoint that produced `value`.
    pub endpoint: Option<String>,
    /// One entry per endpoint tried without success, in attempt order.
    pub failures: Vec<AttemptFailure>,
}

impl<T> SequenceOutcome<T> {
    /// `true` when at least one endpoint was tried and every one failed
    /// without answering.
    #[must_use]
    pub fn all_transport_failures(&self) -> bool {
        self.value.is_none()
            && !self.failures.is_empty()
            && self.failures.iter().all(|f| f.kind.is_transport())
    }

    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

/// Tries `attempt` against each endpoint in order until one yields data.
///
/// An empty list yields no value and no failures.
pub async fn try_sequentially<'a, T, F, Fut>(
    endpoints: &'a EndpointList,
    mut attempt: F,
) -> SequenceOutcome<T>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<Attempt<T>, ResolveError>>,
{
    let mut failures = Vec::new();

    for endpoint in endpoints.iter() {
        let failure = match attempt(endpoint).await {
            Ok(Attempt::Found(value)) => {
                tracing::debug!(endpoint, skipped = failures.len(), "endpoint produced data");
                return SequenceOutcome {
                    value: Some(value),
                    endpoint: Some(endpoint.to_string()),
                    failures,
                };
            }
            Ok(Attempt::Empty(reason)) => AttemptFailure {
                endpoint: endpoint.to_string(),
                kind: FailureKind::Empty,
                reason,
            },
            Err(err) => AttemptFailure {
                endpoint: endpoint.to_string(),
                kind: FailureKind::from(&err),
                reason: err.reason(),
            },
        };

        tracing::warn!(
            endpoint = %failure.endpoint,
            kind = ?failure.kind,
            reason = %failure.reason,
            "endpoint attempt failed, trying next"
        );
        failures.push(failure);
    }

    SequenceOutcome {
        value: None,
        endpoint: None,
        failures,
    }
}
