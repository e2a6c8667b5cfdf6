//! Console + daily log files
//!
//! The console gets a compact line per event. Files under the log directory
//! (`anilist_spinner.log.YYYY-MM-DD`) keep thread ids and source locations.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "anilist_spinner.log";

/// Used when `RUST_LOG` is unset or unparseable
const DEFAULT_FILTER: &str = "info,anilist_spinner=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber; fails if one is already set
pub fn init_logging(log_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(Path::new(log_dir))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Flushes on drop; logging lasts the whole program
    std::mem::forget(guard);

    let console_layer = fmt::layer().compact().with_target(false);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging to {}/{}.*", log_dir, LOG_FILE_PREFIX);
    Ok(())
}

/// Log an error with context fields
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {
        tracing::error!(error = %$err, "Error occurred")
    };
    ($err:expr, $($field:tt)*) => {
        tracing::error!(error = %$err, $($field)*, "Error occurred")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
