//! Logging infrastructure
//!
//! Structured logging setup for development and production environments.

use std::path::Path;

/// Initialize the logger with stdout output only
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional daily-rolling file output
///
/// `log_level` falls back to the `RUST_LOG` env filter, then "info".
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.unwrap_or("info")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "gatepass");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
