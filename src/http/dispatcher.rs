//! Request dispatcher.
//!
//! Streams each request body to the body sink chunk by chunk, followed by the
//! delimiter. Failures are logged and contained; the client always gets the
//! transport's default response.

use std::io;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::State,
    http::{HeaderMap, Request},
};
use futures_util::StreamExt;
use thiserror::Error;

use crate::config::Settings;
use crate::http::request::RequestContext;
use crate::lifecycle::InFlightTracker;
use crate::sink::{Sink, SinkSet};

/// A failure while capturing one request.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Could not read request body: {0}")]
    ReadBody(#[source] axum::Error),

    #[error("Could not write request body: {0}")]
    WriteBody(#[source] io::Error),

    #[error("Could not write delimiter after writing body: {0}")]
    WriteDelimiter(#[source] io::Error),

    #[error("Could not write request headers: {0}")]
    WriteHeaders(#[source] io::Error),
}

/// What a capture produced.
#[derive(Debug, Default)]
pub struct CaptureReport {
    /// Body bytes that reached the body sink.
    pub body_bytes: u64,
    pub errors: Vec<CaptureError>,
}

/// Sinks and settings shared by every request.
#[derive(Debug)]
pub struct Capture {
    body: Sink,
    headers: Option<Sink>,
    delimiter: Bytes,
    in_flight: InFlightTracker,
}

/// Handler state.
#[derive(Debug, Clone)]
pub struct CaptureState(Arc<Capture>);

impl CaptureState {
    pub fn new(settings: &Settings, sinks: &SinkSet, in_flight: InFlightTracker) -> Self {
        Self(Arc::new(Capture {
            body: sinks.body.clone(),
            headers: sinks.headers.clone(),
            delimiter: Bytes::from(settings.body_delimiter.clone()),
            in_flight,
        }))
    }

    pub fn in_flight(&self) -> &InFlightTracker {
        &self.0.in_flight
    }
}

/// Axum handler for every method and path.
pub async fn capture_handler(State(state): State<CaptureState>, request: Request<Body>) {
    dispatch(&state, request).await;
}

/// Capture one request. Returns `None` when the request has no body, in which
/// case nothing is written and nothing is logged.
pub async fn dispatch(state: &CaptureState, request: Request<Body>) -> Option<CaptureReport> {
    if request.body().is_end_stream() {
        return None;
    }

    let capture = &state.0;
    let guard = capture.in_flight.track();
    let (parts, body) = request.into_parts();
    let ctx = RequestContext::from_parts(&parts);
    let mut report = CaptureReport::default();

    if let Some(headers_sink) = &capture.headers {
        if let Err(e) = write_headers(headers_sink, &parts.headers, &capture.delimiter).await {
            report.errors.push(CaptureError::WriteHeaders(e));
        }
    }

    let (body_bytes, copy_result) = copy_body(body, &capture.body).await;
    report.body_bytes = body_bytes;
    if let Err(e) = copy_result {
        report.errors.push(e);
    }

    // Written even after a failed copy so the delimiter still separates records.
    if let Err(e) = capture.body.write_all(capture.delimiter.clone()).await {
        report.errors.push(CaptureError::WriteDelimiter(e));
    }

    for error in &report.errors {
        tracing::error!(
            datetime = %ctx.datetime(),
            method = %ctx.method,
            path = %ctx.path,
            request_id = ctx.request_id.as_deref().unwrap_or("unknown"),
            error = %error,
            "Could not capture request"
        );
    }

    tracing::debug!(
        capture_id = %guard.id(),
        method = %ctx.method,
        path = %ctx.path,
        request_id = ctx.request_id.as_deref().unwrap_or("unknown"),
        body_bytes = report.body_bytes,
        "Request captured"
    );

    Some(report)
}

/// Stream `body` into `sink` one chunk at a time. Stops at the first read or
/// write failure and returns how many bytes were written before it.
async fn copy_body(body: Body, sink: &Sink) -> (u64, Result<(), CaptureError>) {
    let mut stream = body.into_data_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return (written, Err(CaptureError::ReadBody(e))),
        };
        let len = chunk.len() as u64;
        if let Err(e) = sink.write_all(chunk).await {
            return (written, Err(CaptureError::WriteBody(e)));
        }
        written += len;
    }

    (written, Ok(()))
}

/// `name: value` lines in header map order, then the delimiter.
fn format_headers(headers: &HeaderMap) -> Bytes {
    let mut block = Vec::new();
    for (name, value) in headers {
        block.extend_from_slice(name.as_str().as_bytes());
        block.extend_from_slice(b": ");
        block.extend_from_slice(value.as_bytes());
        block.push(b'\n');
    }
    Bytes::from(block)
}

async fn write_headers(sink: &Sink, headers: &HeaderMap, delimiter: &Bytes) -> io::Result<()> {
    sink.write_all(format_headers(headers)).await?;
    sink.write_all(delimiter.clone()).await
}
