//! HTTP byte-range responses over local files
//!
//! Turns a file path plus an optional `Range` header into a 200, 206,
//! or 416 response. The body is the bounded chunk stream from
//! sluice-core, bound lazily so nothing is read until the transport
//! polls it.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{HeaderMap, Response, StatusCode};
use axum::response::IntoResponse;
use sluice_core::range::{ResolvedRange, parse_range_header};
use sluice_core::stream::open_slice;
use tracing::debug;

/// Extracts the `Range` header value, if the request carried one.
pub fn extract_range_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("range")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Builds the byte response for the file at `path`.
///
/// Full-file requests get `200`, anything narrower gets `206` with a
/// `Content-Range`, and a window the file cannot satisfy gets a `416`
/// with a minimal plain-text body aimed at media players, not humans.
///
/// # Errors
/// Returns the I/O error from sizing or opening the file; the caller
/// maps `NotFound` to its own vanished-file page.
pub async fn build_range_response(
    path: PathBuf,
    content_type: &str,
    range_header: Option<&str>,
) -> std::io::Result<Response<Body>> {
    let total_size = tokio::fs::metadata(&path).await?.len();
    let requested = range_header.and_then(parse_range_header);

    let resolved = match ResolvedRange::resolve(requested, total_size) {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!("rejecting range request: {e}");
            return Ok((
                StatusCode::RANGE_NOT_SATISFIABLE,
                [("Content-Type", "text/plain")],
                "Invalid Range",
            )
                .into_response());
        }
    };

    let stream = open_slice(path, resolved.start(), resolved.length()).await?;

    let status = if resolved.is_partial() {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };
    debug!(
        "serving bytes {}-{}/{} as {}",
        resolved.start(),
        resolved.end(),
        total_size,
        status
    );

    let mut response = Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Accept-Ranges", "bytes")
        .header("Content-Length", resolved.length().to_string());

    if resolved.is_partial() {
        response = response.header("Content-Range", resolved.content_range());
    }

    response
        .body(Body::from_stream(stream))
        .map_err(std::io::Error::other)
}
