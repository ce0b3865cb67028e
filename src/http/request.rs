//! Per-request context.
//!
//! # Responsibilities
//! - Stamp each request with an `x-request-id` (UUID v4)
//! - Capture method, path and arrival time for log records
//!
//! # Design Decisions
//! - Request ID added by the outermost layer so every log record can carry it
//! - The context lives only as long as the handler; nothing is persisted

use axum::http::request::Parts;
use axum::http::{HeaderName, Method};
use chrono::{DateTime, Utc};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns a request ID unless the client sent one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that echoes the request ID on the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// What the dispatcher knows about a request, apart from its body.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path and query as received.
    pub path: String,
    pub received_at: DateTime<Utc>,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts) -> Self {
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map(str::to_owned);

        Self {
            method: parts.method.clone(),
            path: parts.uri.to_string(),
            received_at: Utc::now(),
            request_id,
        }
    }

    /// Arrival time as an RFC 3339 string.
    pub fn datetime(&self) -> String {
        self.received_at.to_rfc3339()
    }
}
