//! Download engine implementations
//!
//! The production engine shells out to yt-dlp and reads its JSON report
//! from stdout. The simulated engine fabricates a small MP4 locally so
//! demo deployments and tests run without network access or an
//! installed binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::FetchError;
use crate::config::Credentials;

/// Format ladder requested from the engine: a single playable MP4 when
/// the source offers one, otherwise the best available stream pair.
const FORMAT_PREFERENCE: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// What the engine reported about a finished download.
///
/// Both fields are best-effort; the orchestrator verifies everything
/// against the filesystem before trusting it.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Title extracted from the source page.
    pub title: Option<String>,

    /// Final output path as reported by the engine. Authoritative when
    /// present, because output names derive from remote titles and
    /// cannot be predicted in advance.
    pub output_path: Option<PathBuf>,
}

/// Downloads the media behind a URL into a caller-provided directory.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Runs one download to completion and reports what the engine
    /// knows about the result. May take seconds to minutes.
    ///
    /// # Errors
    /// - `FetchError::EngineUnavailable` if the engine cannot start
    /// - `FetchError::EngineFailed` if it exits unsuccessfully
    /// - `FetchError::NoMetadata` if its report cannot be parsed
    async fn fetch(
        &self,
        url: &Url,
        job_dir: &Path,
        credentials: Option<&Credentials>,
    ) -> Result<FetchReport, FetchError>;

    /// Verifies the engine can run at all.
    ///
    /// # Errors
    /// - `FetchError::EngineUnavailable` if it cannot be executed
    async fn check_availability(&self) -> Result<(), FetchError>;
}

/// Production engine backed by the yt-dlp binary.
pub struct YtDlpFetcher {
    binary: String,
}

impl YtDlpFetcher {
    /// Creates a fetcher invoking the given binary name or path.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(
        &self,
        url: &Url,
        job_dir: &Path,
        credentials: Option<&Credentials>,
    ) -> Result<FetchReport, FetchError> {
        let output_template = job_dir.join("%(title)s.%(ext)s");

        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.arg("--no-warnings")
            .arg("--no-progress")
            .arg("--no-playlist")
            .arg("--no-simulate") // download for real despite the JSON dump
            .arg("--dump-single-json")
            .arg("--format")
            .arg(FORMAT_PREFERENCE)
            .arg("--recode-video")
            .arg("mp4")
            .arg("--output")
            .arg(&output_template);

        if let Some(credentials) = credentials {
            cmd.arg("--username")
                .arg(&credentials.username)
                .arg("--password")
                .arg(&credentials.password);
        }

        cmd.arg(url.as_str());
        cmd.stdin(Stdio::null());

        // argv may carry credentials; log the URL only.
        debug!("running {} for {}", self.binary, url);

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::EngineUnavailable {
                    binary: self.binary.clone(),
                }
            } else {
                FetchError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} failed with {}: {}", self.binary, output.status, stderr.trim());
            return Err(FetchError::EngineFailed {
                reason: format!("{} ({})", error_line(&stderr), output.status),
            });
        }

        let report: EngineReport =
            serde_json::from_slice(&output.stdout).map_err(|e| FetchError::NoMetadata {
                reason: e.to_string(),
            })?;

        Ok(report.into_fetch_report())
    }

    async fn check_availability(&self) -> Result<(), FetchError> {
        let result = tokio::process::Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(status) if status.success() => Ok(()),
            _ => Err(FetchError::EngineUnavailable {
                binary: self.binary.clone(),
            }),
        }
    }
}

/// Subset of the engine's JSON report that the orchestrator consumes.
#[derive(Debug, Deserialize)]
struct EngineReport {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    requested_downloads: Vec<RequestedDownload>,
}

#[derive(Debug, Deserialize)]
struct RequestedDownload {
    #[serde(default)]
    filepath: Option<PathBuf>,
}

impl EngineReport {
    fn into_fetch_report(self) -> FetchReport {
        let output_path = self
            .requested_downloads
            .into_iter()
            .find_map(|download| download.filepath);

        FetchReport {
            title: self.title.filter(|title| !title.trim().is_empty()),
            output_path,
        }
    }
}

/// Picks the most useful single line out of the engine's stderr.
fn error_line(stderr: &str) -> String {
    let mut last_nonempty = None;
    for line in stderr.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("ERROR:") {
            return line.to_string();
        }
        last_nonempty = Some(line);
    }
    last_nonempty.unwrap_or("no error output").to_string()
}

/// Demo engine that fabricates a small MP4 instead of downloading.
pub struct SimulatedFetcher;

/// Size of the fabricated file. Big enough to exercise multi-chunk
/// range requests, small enough to create per request.
const SIMULATED_FILE_SIZE: usize = 64 * 1024;

#[async_trait]
impl MediaFetcher for SimulatedFetcher {
    async fn fetch(
        &self,
        url: &Url,
        job_dir: &Path,
        _credentials: Option<&Credentials>,
    ) -> Result<FetchReport, FetchError> {
        let path = job_dir.join("simulated_clip.mp4");

        let mut data = Vec::with_capacity(SIMULATED_FILE_SIZE);
        data.extend_from_slice(&16u32.to_be_bytes()); // size
        data.extend_from_slice(b"ftyp"); // type
        data.extend_from_slice(b"isomisom"); // brand + compatible brand
        let start = data.len();
        data.extend((start..SIMULATED_FILE_SIZE).map(|i| (i % 251) as u8));

        tokio::fs::write(&path, &data).await?;

        Ok(FetchReport {
            title: Some(format!(
                "Simulated clip from {}",
                url.host_str().unwrap_or("nowhere")
            )),
            output_path: Some(path),
        })
    }

    async fn check_availability(&self) -> Result<(), FetchError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_error_line_prefers_engine_error_marker() {
        let stderr = "WARNING: throttled\nERROR: Unsupported URL\ndeleting temp file\n";
        assert_eq!(error_line(stderr), "ERROR: Unsupported URL");
    }

    #[test]
    fn test_error_line_falls_back_to_last_output() {
        assert_eq!(error_line("something odd\n\n"), "something odd");
        assert_eq!(error_line(""), "no error output");
    }

    #[test]
    fn test_engine_report_ignores_blank_title() {
        let report: EngineReport = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        let report = report.into_fetch_report();
        assert!(report.title.is_none());
        assert!(report.output_path.is_none());
    }

    #[tokio::test]
    async fn test_simulated_fetcher_writes_mp4_shaped_file() {
        let dir = tempdir().unwrap();
        let url = Url::parse("https://example.com/watch?v=1").unwrap();

        let report = SimulatedFetcher.fetch(&url, dir.path(), None).await.unwrap();

        let path = report.output_path.unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), SIMULATED_FILE_SIZE);
        assert_eq!(&data[4..8], b"ftyp");
        assert_eq!(report.title.unwrap(), "Simulated clip from example.com");
    }

    #[cfg(unix)]
    mod stub_engine {
        use std::os::unix::fs::PermissionsExt;

        use super::*;

        /// Writes an executable shell script standing in for yt-dlp.
        fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        fn media_url() -> Url {
            Url::parse("https://example.com/watch?v=stub").unwrap()
        }

        #[tokio::test]
        async fn test_fetch_parses_engine_report() {
            let dir = tempdir().unwrap();
            let job_dir = dir.path().join("job");
            std::fs::create_dir(&job_dir).unwrap();

            let body = format!(
                concat!(
                    "out=\"{}/Stub Clip.mp4\"\n",
                    "printf 'stub media bytes' > \"$out\"\n",
                    "printf '{{\"title\": \"Stub Clip\", ",
                    "\"requested_downloads\": [{{\"filepath\": \"%s\"}}]}}' \"$out\"\n",
                ),
                job_dir.display()
            );
            let stub = write_stub(dir.path(), "fake-yt-dlp", &body);

            let fetcher = YtDlpFetcher::new(stub.display().to_string());
            let report = fetcher.fetch(&media_url(), &job_dir, None).await.unwrap();

            assert_eq!(report.title.as_deref(), Some("Stub Clip"));
            let path = report.output_path.unwrap();
            assert_eq!(std::fs::read(&path).unwrap(), b"stub media bytes");
        }

        #[tokio::test]
        async fn test_fetch_surfaces_engine_failure() {
            let dir = tempdir().unwrap();
            let stub = write_stub(
                dir.path(),
                "fake-yt-dlp",
                "echo 'ERROR: Unsupported URL' >&2\nexit 3\n",
            );

            let fetcher = YtDlpFetcher::new(stub.display().to_string());
            let err = fetcher
                .fetch(&media_url(), dir.path(), None)
                .await
                .unwrap_err();

            match err {
                FetchError::EngineFailed { reason } => {
                    assert!(reason.contains("ERROR: Unsupported URL"), "{reason}");
                }
                other => panic!("expected EngineFailed, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_fetch_rejects_unparseable_report() {
            let dir = tempdir().unwrap();
            let stub = write_stub(dir.path(), "fake-yt-dlp", "printf 'not json'\n");

            let fetcher = YtDlpFetcher::new(stub.display().to_string());
            let err = fetcher
                .fetch(&media_url(), dir.path(), None)
                .await
                .unwrap_err();

            assert!(matches!(err, FetchError::NoMetadata { .. }));
        }

        #[tokio::test]
        async fn test_fetch_passes_credentials_before_the_url() {
            let dir = tempdir().unwrap();
            let args_path = dir.path().join("args.txt");
            let body = format!(
                "printf '%s\\n' \"$@\" > \"{}\"\nprintf '{{}}'\n",
                args_path.display()
            );
            let stub = write_stub(dir.path(), "fake-yt-dlp", &body);

            let credentials = Credentials {
                username: "alice".to_string(),
                password: "wonderland".to_string(),
            };
            let fetcher = YtDlpFetcher::new(stub.display().to_string());
            fetcher
                .fetch(&media_url(), dir.path(), Some(&credentials))
                .await
                .unwrap();

            let args = std::fs::read_to_string(&args_path).unwrap();
            let args: Vec<&str> = args.lines().collect();
            assert!(args.windows(2).any(|w| w == ["--username", "alice"]));
            assert!(args.windows(2).any(|w| w == ["--password", "wonderland"]));
            assert_eq!(args.last(), Some(&media_url().as_str()));
        }

        #[tokio::test]
        async fn test_check_availability_accepts_working_binary() {
            let dir = tempdir().unwrap();
            let stub = write_stub(dir.path(), "fake-yt-dlp", "exit 0\n");

            let fetcher = YtDlpFetcher::new(stub.display().to_string());
            assert!(fetcher.check_availability().await.is_ok());
        }

        #[tokio::test]
        async fn test_check_availability_reports_missing_binary() {
            let fetcher = YtDlpFetcher::new("/nonexistent/yt-dlp");
            let err = fetcher.check_availability().await.unwrap_err();

            assert!(matches!(err, FetchError::EngineUnavailable { .. }));
        }
    }
}
