//! Centralized configuration for Sluice.
//!
//! All tunable parameters live here so the orchestrator and server never
//! reach into the environment themselves. Credentials in particular are
//! read once at startup and injected where needed.

use std::path::PathBuf;

/// Central configuration for all Sluice components.
///
/// Groups related settings into logical sections and supports
/// environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct SluiceConfig {
    pub fetch: FetchConfig,
    pub http: HttpConfig,
}

/// Acquisition engine configuration.
///
/// Controls where acquired files land, which binary performs the
/// download, and which hosts require a configured login.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Root directory that receives one subdirectory per acquisition
    pub downloads_dir: PathBuf,
    /// Engine binary name or path, resolved through PATH unless absolute
    pub engine_binary: String,
    /// Hosts that refuse anonymous downloads
    pub gated_hosts: Vec<String>,
    /// Login for gated hosts (None = anonymous only)
    pub credentials: Option<Credentials>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
            engine_binary: "yt-dlp".to_string(),
            gated_hosts: vec!["instagram.com".to_string()],
            credentials: None,
        }
    }
}

impl FetchConfig {
    /// Whether `host` belongs to a configured login-gated site.
    ///
    /// Matches the host itself and its subdomains, never an unrelated
    /// host that merely embeds the gated name.
    pub fn is_gated_host(&self, host: &str) -> bool {
        self.gated_hosts.iter().any(|gated| {
            host == gated
                || host
                    .strip_suffix(gated.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Username and password pair for login-gated sources.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep the password out of logs and panic messages.
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP server bind configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Interface to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl SluiceConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults. Credentials count as configured
    /// only when both halves of the pair are present and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("SLUICE_DOWNLOADS_DIR") {
            if !dir.is_empty() {
                config.fetch.downloads_dir = PathBuf::from(dir);
            }
        }

        if let Ok(binary) = std::env::var("SLUICE_ENGINE") {
            if !binary.is_empty() {
                config.fetch.engine_binary = binary;
            }
        }

        if let (Ok(username), Ok(password)) = (
            std::env::var("INSTAGRAM_USERNAME"),
            std::env::var("INSTAGRAM_PASSWORD"),
        ) {
            if !username.is_empty() && !password.is_empty() {
                config.fetch.credentials = Some(Credentials { username, password });
            }
        }

        if let Ok(port) = std::env::var("SLUICE_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.http.port = port;
            }
        }

        config
    }
}
