use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_PREFIX: &str = "risk-analyzer";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

fn daily_appender(dir: impl AsRef<Path>) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(14)
        .build(dir)
}

/// Installs the global subscriber. A second call is a no-op; an unusable log
/// directory degrades to stdout only.
pub fn init_tracing(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let stdout_layer = fmt::layer().with_target(true);
    let registry = Registry::default().with(env_filter).with(stdout_layer);

    let file_layer = if config.enable_file_logs {
        match daily_appender(&config.log_dir) {
            Ok(appender) => Some(fmt::layer().with_writer(appender).with_ansi(false).json()),
            Err(e) => {
                eprintln!("file logging disabled, cannot write to {}: {e}", config.log_dir);
                None
            }
        }
    } else {
        None
    };

    // a global subscriber may already be set, e.g. by another test
    if registry.with(file_layer).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
