//! Subscriber setup driven by [`Config`].

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "mentor.log";

/// Keeps the background file writer alive; buffered lines flush on drop.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn rolling_writer(dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("log directory {} unavailable, file logging off: {err}", dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}

/// Installs stdout logging, plus a daily file under `config.log_dir` when
/// `config.file_logs` is set. Returns `None` when no file layer was
/// installed, including when a global subscriber already exists.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let file = if config.file_logs {
        rolling_writer(&config.log_dir)
    } else {
        None
    };
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .ok()?;

    guard.map(|guard| FileLogGuard { _guard: guard })
}
