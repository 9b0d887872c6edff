pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Facade service module

use std::sync::Arc;

use anyhow::Context;
use modules::logger;
use proxy::{ArticleService, AxumServer};
use tracing::{error, info};

/// Load configuration, start the facade and serve until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    let config_path = modules::get_config_path()?;
    let first_run = !config_path.exists();
    let config = modules::load_app_config_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logger
    logger::init_logger(config.log_to_file);

    if first_run {
        match modules::save_app_config_to(&config, &config_path) {
            Ok(()) => info!("Default configuration written to {}", config_path.display()),
            Err(e) => error!("Failed to write default configuration: {}", e),
        }
    } else {
        info!("Configuration loaded from {}", config_path.display());
    }

    let proxy_config = config.proxy;
    let articles = Arc::new(
        ArticleService::new(&proxy_config).context("Failed to initialize downstream client")?,
    );

    let (server, handle) = AxumServer::start(
        proxy_config.get_bind_address().to_string(),
        proxy_config.port,
        articles,
    )
    .await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    server.stop();
    if let Err(e) = handle.await {
        error!("Server task ended abnormally: {}", e);
    }
    Ok(())
}
