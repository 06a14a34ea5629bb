//! Page handlers
//!
//! The landing form and the player view for an already-registered
//! token. Acquisition itself lives in the fetch handler; these render
//! without side effects.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;
use sluice_core::AcquiredMedia;
use tracing::warn;

use crate::pages;
use crate::server::AppState;

/// Query parameters for the landing page.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Optional URL to prefill into the submission form.
    pub url: Option<String>,
}

/// Landing page with the URL submission form.
pub async fn home_page(Query(query): Query<HomeQuery>) -> Html<String> {
    Html(pages::home(query.url.as_deref()))
}

/// Re-renders the player page for an existing delivery token, so the
/// page survives a reload without re-running the acquisition.
pub async fn player_page(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> (StatusCode, Html<String>) {
    match state.registry.resolve(&token).await {
        Some(media) => (StatusCode::OK, render_player(&media, &token)),
        None => {
            warn!("player request for unknown token {token}");
            (
                StatusCode::NOT_FOUND,
                Html(pages::error(
                    "Unknown media link. Submit the video URL again to get a fresh one.",
                    None,
                )),
            )
        }
    }
}

/// Player page for registered media, with the Content-Type the
/// delivery route will serve.
pub(crate) fn render_player(media: &AcquiredMedia, token: &str) -> Html<String> {
    let content_type = mime_guess::from_path(&media.path).first_or_octet_stream();
    Html(pages::player(
        token,
        &media.title,
        &media.extension,
        content_type.as_ref(),
    ))
}
