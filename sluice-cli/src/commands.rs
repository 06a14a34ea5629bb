//! CLI command implementations

use std::path::PathBuf;

use clap::Subcommand;
use sluice_core::{Acquirer, RuntimeMode, SluiceConfig};
use sluice_web::run_server;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the media server
    Serve {
        /// Host to bind to (overrides the configured default)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides SLUICE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory that receives acquired files (overrides SLUICE_DOWNLOADS_DIR)
        #[arg(long)]
        downloads_dir: Option<PathBuf>,
        /// Serve fabricated clips instead of running the download engine
        #[arg(long)]
        demo: bool,
    },
    /// Download a single video without starting the server
    Fetch {
        /// Video page URL
        url: String,
        /// Directory that receives the acquired file
        #[arg(long)]
        downloads_dir: Option<PathBuf>,
    },
    /// Verify that the download engine is installed and runnable
    Check,
}

/// Handle the CLI command
///
/// # Errors
/// Returns an error when the selected command fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            downloads_dir,
            demo,
        } => serve(host, port, downloads_dir, demo).await,
        Commands::Fetch { url, downloads_dir } => fetch(url, downloads_dir).await,
        Commands::Check => check().await,
    }
}

/// Start the media server
///
/// # Errors
/// Returns an error when the listener cannot bind or the server loop fails
pub async fn serve(
    host: Option<String>,
    port: Option<u16>,
    downloads_dir: Option<PathBuf>,
    demo: bool,
) -> anyhow::Result<()> {
    let mut config = SluiceConfig::from_env();
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }
    if let Some(dir) = downloads_dir {
        config.fetch.downloads_dir = dir;
    }

    let mode = if demo {
        RuntimeMode::Demo
    } else {
        RuntimeMode::Production
    };

    println!("Starting Sluice media server...");
    println!("URL: http://{}:{}", config.http.host, config.http.port);
    println!("Downloads: {}", config.fetch.downloads_dir.display());
    println!("Mode: {mode}");
    println!();
    println!("Press Ctrl+C to stop the server");

    run_server(config, mode).await
}

/// Download a single video and print where it landed
///
/// # Errors
/// Returns an error when the URL is rejected or the download engine fails
pub async fn fetch(url: String, downloads_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = SluiceConfig::from_env();
    if let Some(dir) = downloads_dir {
        config.fetch.downloads_dir = dir;
    }

    let acquirer = Acquirer::new(config.fetch);

    println!("Fetching: {url}");
    let media = acquirer.acquire(&url).await?;

    println!("Title: {}", media.title);
    println!("Saved to: {}", media.path.display());

    Ok(())
}

/// Probe the configured download engine
///
/// # Errors
/// Returns an error when the engine binary is missing or not runnable
pub async fn check() -> anyhow::Result<()> {
    let config = SluiceConfig::from_env();
    let binary = config.fetch.engine_binary.clone();
    let acquirer = Acquirer::new(config.fetch);

    acquirer.check_engine().await?;
    println!("Download engine '{binary}' is available.");

    Ok(())
}
