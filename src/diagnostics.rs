//! Request diagnostics
//!
//! One structured event per request, emitted after the handler finishes.
//! Handlers never log their own failures: an [`AppError`](crate::error::AppError)
//! leaves an [`ErrorDetail`] on the response and it is reported here.

use crate::error::ErrorDetail;
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn record(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_owned();

    let started = Instant::now();
    let response = next.run(request).await;
    let latency_ms = started.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    let detail = response
        .extensions()
        .get::<ErrorDetail>()
        .map(|detail| detail.0.as_str())
        .unwrap_or("-");

    if response.status().is_server_error() {
        error!(%request_id, %method, %route, status, latency_ms, error = detail, "request failed");
    } else if response.status().is_client_error() {
        warn!(%request_id, %method, %route, status, latency_ms, error = detail, "request rejected");
    } else {
        info!(%request_id, %method, %route, status, latency_ms, "request completed");
    }

    response
}
