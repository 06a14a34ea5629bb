//! Acquisition orchestration
//!
//! One `acquire` call takes a raw user-supplied URL all the way to a
//! verified file on disk: vet the URL, decide whether credentials
//! apply, give the engine a private job directory, then check its
//! claims against the filesystem before anything is registered for
//! delivery.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use super::engine::{MediaFetcher, SimulatedFetcher, YtDlpFetcher};
use super::{AcquiredMedia, FetchError};
use crate::config::{Credentials, FetchConfig};

/// Runs synchronous media acquisitions against a download engine.
///
/// Each call is independent: a fresh UUID-named job directory under the
/// downloads root receives the engine's output, so concurrent
/// acquisitions can never pick up each other's files. Nothing is
/// retried and no timeout is imposed here.
pub struct Acquirer {
    config: FetchConfig,
    fetcher: Arc<dyn MediaFetcher>,
}

impl Acquirer {
    /// Creates an orchestrator around the configured engine binary.
    pub fn new(config: FetchConfig) -> Self {
        let fetcher = Arc::new(YtDlpFetcher::new(config.engine_binary.clone()));
        Self { config, fetcher }
    }

    /// Creates an orchestrator around the local simulated engine.
    pub fn simulated(config: FetchConfig) -> Self {
        Self {
            config,
            fetcher: Arc::new(SimulatedFetcher),
        }
    }

    /// Creates an orchestrator around a custom engine implementation.
    pub fn with_fetcher(config: FetchConfig, fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Verifies the engine responds at all. Intended for a startup
    /// probe; acquisition itself reports engine problems per call.
    ///
    /// # Errors
    /// - `FetchError::EngineUnavailable` if the engine cannot run
    pub async fn check_engine(&self) -> Result<(), FetchError> {
        self.fetcher.check_availability().await
    }

    /// Downloads the media behind `raw_url` and returns the verified
    /// file. Blocks the caller for the whole download, which may take
    /// seconds to minutes.
    ///
    /// # Errors
    /// - `FetchError::InvalidUrl` for anything but a web URL
    /// - `FetchError::CredentialsRequired` for a gated host without a
    ///   configured login, before the engine is invoked
    /// - engine errors as reported by the underlying fetcher
    /// - `FetchError::MissingOutput` when the engine finished but no
    ///   non-empty file exists
    pub async fn acquire(&self, raw_url: &str) -> Result<AcquiredMedia, FetchError> {
        let url = parse_media_url(raw_url)?;
        let credentials = self.credentials_for(&url)?;

        let job_dir = self.config.downloads_dir.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&job_dir).await?;

        let started = Instant::now();
        info!("acquiring {} into {}", url, job_dir.display());
        let report = self.fetcher.fetch(&url, &job_dir, credentials).await?;

        let path = resolve_output(report.output_path, &job_dir).await?;
        verify_regular_non_empty(&path).await?;

        let title = report.title.unwrap_or_else(|| title_from_path(&path));
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("mp4")
            .to_ascii_lowercase();

        info!(
            "acquired {:?} as {} in {:?}",
            title,
            path.display(),
            started.elapsed()
        );

        Ok(AcquiredMedia {
            path,
            title,
            extension,
        })
    }

    /// Credentials apply only to gated hosts, and a gated host without
    /// a configured login fails before the engine runs.
    fn credentials_for(&self, url: &Url) -> Result<Option<&Credentials>, FetchError> {
        let Some(host) = url.host_str() else {
            return Ok(None);
        };
        if !self.config.is_gated_host(host) {
            return Ok(None);
        }
        match &self.config.credentials {
            Some(credentials) => Ok(Some(credentials)),
            None => Err(FetchError::CredentialsRequired {
                host: host.to_string(),
            }),
        }
    }
}

/// Parses and vets a user-supplied URL before it reaches the engine.
fn parse_media_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    // The URL becomes an argument to an external process; only web
    // schemes are meaningful there.
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        });
    }

    Ok(url)
}

/// Picks the downloaded file: the engine's reported path when it holds
/// up, otherwise the newest file in the job directory.
async fn resolve_output(reported: Option<PathBuf>, job_dir: &Path) -> Result<PathBuf, FetchError> {
    if let Some(path) = reported {
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(path);
        }
        warn!(
            "engine reported {} but nothing is there; scanning job directory",
            path.display()
        );
    }

    newest_file(job_dir).await?.ok_or(FetchError::MissingOutput)
}

/// Engine work files, never the final output.
const TRANSIENT_EXTENSIONS: [&str; 3] = ["part", "ytdl", "temp"];

/// Most recently modified regular file in `dir`, skipping engine work
/// files. The job directory is private to one acquisition, so anything
/// else in it came from the engine.
async fn newest_file(dir: &Path) -> Result<Option<PathBuf>, FetchError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let path = entry.path();
        let transient = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TRANSIENT_EXTENSIONS.contains(&ext));
        if transient {
            continue;
        }
        let modified = metadata.modified()?;
        if newest.as_ref().is_none_or(|(best, _)| modified > *best) {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

/// An engine success with a missing or empty file is still a failed
/// acquisition; nothing gets registered for delivery.
async fn verify_regular_non_empty(path: &Path) -> Result<(), FetchError> {
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() || metadata.len() == 0 {
        return Err(FetchError::MissingOutput);
    }
    Ok(())
}

/// Output filenames carry the title with filesystem-safe separators;
/// turn the stem back into something readable for the player page.
fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['.', '_'], " "))
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| "Video".to_string())
}
