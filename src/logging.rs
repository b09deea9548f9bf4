use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_PREFIX: &str = "mathdash.log";

/// Pick the filter: `RUST_LOG` wins, otherwise `debug` or `info`.
pub fn env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug_mode { "debug" } else { "info" }))
}

/// Send tracing output to a daily rotating file in `log_dir`.
///
/// The terminal is owned by the TUI, so nothing is written to stdout/stderr.
/// The returned guard flushes the background writer when dropped and must be
/// held for as long as logging should stay active.
pub fn setup_logging(log_dir: &Path, debug_mode: bool) -> io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let file_appender = rolling::daily(log_dir, LOG_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter(debug_mode))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(dir = %log_dir.display(), debug = debug_mode, "logging initialized");

    Ok(guard)
}
