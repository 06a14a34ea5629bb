//! Token-addressed media delivery
//!
//! Resolves an opaque delivery token back to the file behind it and
//! hands the rest to the range response builder. Unknown tokens and
//! vanished files get distinct not-found messages so a stale link is
//! distinguishable from a broken acquisition.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Response, StatusCode};
use axum::response::{Html, IntoResponse};
use tracing::{error, warn};

use super::range::{build_range_response, extract_range_header};
use crate::pages;
use crate::server::AppState;

/// Streams registered media, honoring `Range` requests.
pub async fn stream_media(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Response<Body> {
    let Some(media) = state.registry.resolve(&token).await else {
        warn!("stream request for unknown token {token}");
        return (
            StatusCode::NOT_FOUND,
            Html(pages::error(
                "Unknown media link. Submit the video URL again to get a fresh one.",
                None,
            )),
        )
            .into_response();
    };

    let content_type = mime_guess::from_path(&media.path).first_or_octet_stream();
    let range_header = extract_range_header(&headers);

    match build_range_response(
        media.path.clone(),
        content_type.as_ref(),
        range_header.as_deref(),
    )
    .await
    {
        Ok(response) => response,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("registered file {} is gone", media.path.display());
            (
                StatusCode::NOT_FOUND,
                Html(pages::error(
                    "Video file not found on the server. It may not have downloaded correctly; submit the URL again.",
                    None,
                )),
            )
                .into_response()
        }
        Err(e) => {
            error!("failed to serve {}: {e}", media.path.display());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error("Error playing video.", None)),
            )
                .into_response()
        }
    }
}
