use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::infra::{config::LogConfig, error::AppError, storage_layout::StorageLayout};

const LOG_FILE_PREFIX: &str = "messx.log";

/// Where log records go besides the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// The TUI owns the terminal, so records only reach the file.
    FileOnly,
    FileAndStdout,
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered records are lost.
pub fn init(
    config: &LogConfig,
    layout: &StorageLayout,
    sink: LogSink,
) -> Result<WorkerGuard, AppError> {
    layout.ensure_dirs()?;

    let appender = tracing_appender::rolling::daily(&layout.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);
    let stdout_layer = (sink == LogSink::FileAndStdout).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|error| AppError::LoggingInit(Box::new(error)))?;

    Ok(guard)
}
