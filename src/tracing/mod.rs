//! Request correlation and HTTP span helpers.
//!
//! The request id lives in a task-local for the duration of a request, so
//! error bodies and response metadata can read it without every handler
//! passing it along.

use axum::http::Request;
use std::{fmt, future::Future, time::Instant};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnResponse, MakeSpan, TraceLayer},
};
use tracing::{debug, warn, Level, Span};
use uuid::Uuid;

use crate::middleware_helpers::REQUEST_ID_HEADER;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl Default for RequestId {
    fn default() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl RequestId {
    pub fn new(value: impl Into<String>) -> Self {
        RequestId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

tokio::task_local! {
    static CURRENT_REQUEST_ID: RequestId;
}

/// Runs `future` with `request_id` visible to [`current_request_id`].
pub async fn scope_request_id<Fut, R>(request_id: RequestId, future: Fut) -> R
where
    Fut: Future<Output = R>,
{
    CURRENT_REQUEST_ID.scope(request_id, future).await
}

pub fn current_request_id() -> Option<RequestId> {
    CURRENT_REQUEST_ID.try_with(RequestId::clone).ok()
}

/// Names the span after the request id set by the request-id middleware,
/// falling back to the raw header and then to a fresh id.
#[derive(Clone, Copy, Default)]
pub struct RequestSpanMaker;

impl<B> MakeSpan<B> for RequestSpanMaker {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_owned())
            .or_else(|| {
                request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| RequestId::default().0);

        tracing::info_span!(
            "http.request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

pub type HttpTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpanMaker>;

/// Only 5xx responses count as failures; rejected logins and validation
/// errors stay at info level.
pub fn configure_http_tracing() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpanMaker)
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

/// Runs a fallible task and logs how long it took.
pub async fn with_timing<F, Fut, T, E>(operation: &str, task: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let started = Instant::now();
    let result = task().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => debug!(operation, elapsed_ms, "completed"),
        Err(e) => warn!(operation, elapsed_ms, error = %e, "failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_id_is_visible_inside_scope_only() {
        assert!(current_request_id().is_none());
        let seen = scope_request_id(RequestId::new("req-42"), async { current_request_id() }).await;
        assert_eq!(seen, Some(RequestId::new("req-42")));
        assert!(current_request_id().is_none());
    }

    #[tokio::test]
    async fn with_timing_passes_result_through() {
        let ok: Result<i32, String> = with_timing("ok_op", || async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));
        let err: Result<i32, String> =
            with_timing("bad_op", || async { Err("nope".to_string()) }).await;
        assert!(err.is_err());
    }
}
