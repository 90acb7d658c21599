use crate::config::LoggingSettings;
use anyhow::{Result, anyhow};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging to stderr, and to a daily-rotated file if one is configured.
///
/// The returned guard flushes the file writer when dropped, so hold it for as long as the
/// process runs.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| anyhow!("Failed to create log filter: {}", e))?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let (file_layer, guard) = match &settings.file {
        Some(log_path) => {
            let directory = log_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = log_path
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "attendance.log".into());

            let (writer, guard) = non_blocking(rolling::daily(directory, file_name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true);

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(level = %settings.level, file = ?settings.file, "logging initialized");
    Ok(guard)
}
