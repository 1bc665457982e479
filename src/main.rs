//! Notification Center replay tool
//!
//! Loads a project datafile, builds a notification center with logging
//! listeners and replays a recorded stream of SDK notifications through it.

use anyhow::{Context, Result};
use clap::Parser;
use notification_center::{
    cli::Cli,
    config::Config,
    core::ProjectConfig,
    error_handler::LoggingErrorHandler,
    notification::{logging_listener, NotificationCenter},
    replay,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Manually initialize logging for this specific error
        let _ = tracing_subscriber::fmt().with_writer(std::io::stderr).try_init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Notification center replay starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Log Dispatch: {}", config.notifications.log_dispatch);
    match config.notifications.slow_listener_threshold_ms {
        Some(ms) => info!("Slow Listener Threshold: {}ms", ms),
        None => info!("Slow Listener Threshold: disabled"),
    }
    info!("Datafile: {}", cli.datafile.display());
    info!("Replay File: {}", cli.replay.display());
    info!("-------------------------------------------------------");

    let project_config = ProjectConfig::from_datafile(&cli.datafile)
        .with_context(|| format!("failed to load datafile {}", cli.datafile.display()))?;
    info!(
        project_id = %project_config.project_id,
        revision = %project_config.revision,
        "Project configuration loaded."
    );

    let center = NotificationCenter::builder()
        .project_config(Arc::new(project_config))
        .error_handler(Arc::new(LoggingErrorHandler))
        .settings(config.notifications.clone())
        .build()?;
    logging_listener::register(&center);

    let records = replay::load(&cli.replay)?;
    let sent = replay::run(&center, &records);

    info!("Replay finished.");
    println!("replayed {} notifications", sent);
    Ok(())
}
