//! Folder Browser Server Entry Point
//!
//! Initializes logging, loads configuration, validates the base directory
//! and starts the HTTP server.

use anyhow::{Result, ensure};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use folder_browser_server::core::config::LoggingConfig;
use folder_browser_server::core::{Config, HttpTransport};
use folder_browser_server::FolderService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // Misconfiguration stops the process before anything is served
    let folders = FolderService::from_config(&config)?;
    let base = folders.base().as_path();
    ensure!(
        base.is_dir(),
        "base directory {} does not exist or is not a directory",
        base.display()
    );

    let transport = HttpTransport::new(config.http.clone());
    info!("Starting transport: {}", config.http.description());
    transport.run(folders).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
