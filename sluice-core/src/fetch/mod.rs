//! Media acquisition via an external download engine
//!
//! The orchestrator in [`acquire`] owns the policy around one download:
//! URL vetting, credential gating, a private job directory per request,
//! and verification of the engine's output. The engine itself sits
//! behind [`MediaFetcher`] so production deployments shell out to
//! yt-dlp while demo mode and tests fabricate files locally.

mod acquire;
mod engine;

use std::path::PathBuf;

pub use acquire::Acquirer;
pub use engine::{FetchReport, MediaFetcher, SimulatedFetcher, YtDlpFetcher};

/// One downloaded media file, ready for delivery.
///
/// Immutable once returned; the file it points at stays on disk for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct AcquiredMedia {
    /// Path of the downloaded file inside its job directory.
    pub path: PathBuf,

    /// Human-readable title for the player page.
    pub title: String,

    /// Extension without the dot, normally `mp4` after the recode step.
    pub extension: String,
}

/// Errors that can occur while acquiring media.
///
/// Covers everything from URL vetting through engine invocation to
/// output verification. Acquisition is never retried internally; one
/// failure is reported upward unchanged.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid media URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{host} requires a configured username and password")]
    CredentialsRequired { host: String },

    #[error("Download engine {binary:?} is not available")]
    EngineUnavailable { binary: String },

    #[error("Download engine failed: {reason}")]
    EngineFailed { reason: String },

    #[error("Download engine produced no usable report: {reason}")]
    NoMetadata { reason: String },

    #[error("Engine finished but no output file was found")]
    MissingOutput,

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
