use crate::error::AppResult;
use crate::modules::config::get_data_dir;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn get_log_dir() -> AppResult<PathBuf> {
    let log_dir = get_data_dir()?.join("logs");

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    Ok(log_dir)
}

/// Initialize logger system
pub fn init_logger(log_to_file: bool) {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    // 1. Console output layer
    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    // 2. File output layer (daily rolling, no ANSI)
    let mut file_error = None;
    let file_layer = if log_to_file {
        match get_log_dir() {
            Ok(log_dir) => {
                let file_appender = tracing_appender::rolling::daily(log_dir, "facade.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                // Leak the guard so the writer lives until process exit
                std::mem::forget(guard);
                Some(
                    fmt::Layer::new()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_level(true)
                        .boxed(),
                )
            }
            Err(e) => {
                file_error = Some(e);
                None
            }
        }
    } else {
        None
    };

    // 3. Filter layer (default to INFO and above)
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 4. Initialize global subscriber (try_init tolerates re-initialization)
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match file_error {
        Some(e) => tracing::warn!("File logging disabled, failed to prepare log directory: {}", e),
        None if log_to_file => info!("Logger system initialized (Console + File Persistence)"),
        None => info!("Logger system initialized (Console)"),
    }
}
