//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Patient field values are protected health information. They only reach
//! the log when `logging.log_data` is enabled; everywhere else call sites
//! pass them through [`redact_value`].
//!
//! # Log Levels
//!
//! - `error`: inference failures, fatal startup errors
//! - `warn`: unknown categorical labels, device fallbacks
//! - `info`: startup summary, one line per prediction
//! - `debug`: per-field form values (redacted unless enabled), report layout

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use stroke_core::config::{LogFormat, LoggingSettings};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder written in place of patient values.
pub const REDACTED_VALUE: &str = "[REDACTED]";

pub fn log_data_enabled() -> bool { LOG_DATA_ENABLED.load(Ordering::Relaxed) }

pub fn set_log_data(enable: bool) { LOG_DATA_ENABLED.store(enable, Ordering::Release); }

/// Returns the input value when patient-data logging is enabled, otherwise a
/// redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() { value } else { REDACTED_VALUE }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub log_data: bool,
}

impl Default for LogConfig {
    fn default() -> Self { Self::from_settings(&LoggingSettings::default()) }
}

impl LogConfig {
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format,
            with_ansi: true,
            with_target: false,
            log_data: settings.log_data,
        }
    }
}

/// Install the global subscriber writing to stderr. Call once at startup.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> { init_logging_with_writer(config, io::stderr) }

pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> anyhow::Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    set_log_data(config.log_data);
    let filter = build_env_filter(&config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer).with_target(config.with_target))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(writer).with_ansi(config.with_ansi).with_target(config.with_target))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(writer).with_ansi(config.with_ansi).with_target(config.with_target))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}

/// `RUST_LOG` wins over the configured level; otherwise our crates log at
/// `level` and everything else at `warn`.
pub fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(format!(
        "warn,stroke_web={level},stroke_core={level},stroke_model={level},stroke_report={level}"
    ))
    .with_context(|| format!("Invalid log level {level:?}"))
}
