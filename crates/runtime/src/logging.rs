//! Tracing subscriber setup for hosts embedding the runtime.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE_NAME: &str = "quiz.log";
/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// Logs go to stderr, or to `<log_dir>/quiz.log` through a non-blocking
/// writer when a directory is given. `RUST_LOG` sets the filter; without it
/// everything at `info` and above is logged. Keep the returned guard alive
/// until exit so buffered lines are flushed.
pub fn setup_logging(log_dir: Option<&Path>) -> std::io::Result<Option<WorkerGuard>> {
    let env_filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    let Some(log_dir) = log_dir else {
        let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global subscriber already set");
        }
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already set");
    }

    tracing::info!("Log file: {}", log_dir.join(LOG_FILE_NAME).display());

    Ok(Some(guard))
}

fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
