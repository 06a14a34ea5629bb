//! Submission endpoint
//!
//! Accepts a media page URL, runs the acquisition synchronously, and
//! answers with the player page for the freshly registered file.
//! Failures render the house error fragment under a real error status.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;
use sluice_core::FetchError;
use tracing::error;

use super::pages::render_player;
use crate::pages;
use crate::server::AppState;

/// Query parameters for the submission endpoint.
#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    /// Media page URL to acquire.
    pub url: Option<String>,
}

/// Acquires the submitted URL and renders the player page.
///
/// Blocks for the whole download; the browser sits on this request
/// until the engine finishes or fails.
pub async fn fetch_media(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> (StatusCode, Html<String>) {
    let url = query.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Html(pages::error("No video URL provided.", None)),
        );
    }

    match state.acquirer.acquire(url).await {
        Ok(media) => {
            let token = state.registry.register(media.clone()).await;
            (StatusCode::OK, render_player(&media, token.as_str()))
        }
        Err(e) => {
            error!("acquisition failed for {url}: {e}");
            (
                fetch_error_status(&e),
                Html(pages::error(&e.to_string(), Some(url))),
            )
        }
    }
}

/// Maps acquisition failures onto HTTP statuses: the client's fault is
/// 4xx, a missing deployment prerequisite is 503, and an engine that
/// ran but produced nothing usable is 502.
fn fetch_error_status(error: &FetchError) -> StatusCode {
    match error {
        FetchError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
        FetchError::CredentialsRequired { .. } | FetchError::EngineUnavailable { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        FetchError::EngineFailed { .. }
        | FetchError::NoMetadata { .. }
        | FetchError::MissingOutput => StatusCode::BAD_GATEWAY,
        FetchError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_statuses() {
        let invalid = FetchError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL".to_string(),
        };
        assert_eq!(fetch_error_status(&invalid), StatusCode::BAD_REQUEST);

        let gated = FetchError::CredentialsRequired {
            host: "instagram.com".to_string(),
        };
        assert_eq!(fetch_error_status(&gated), StatusCode::SERVICE_UNAVAILABLE);

        let failed = FetchError::EngineFailed {
            reason: "exit 1".to_string(),
        };
        assert_eq!(fetch_error_status(&failed), StatusCode::BAD_GATEWAY);

        assert_eq!(
            fetch_error_status(&FetchError::MissingOutput),
            StatusCode::BAD_GATEWAY
        );
    }
}
