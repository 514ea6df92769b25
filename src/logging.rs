//! Structured logging setup using the `tracing` ecosystem.
//!
//! Configures a `tracing-subscriber` with either JSON output (for
//! production) or pretty-printed output (for TTY / local dev) on stdout,
//! plus a JSON log file in the configured output directory. Format is
//! auto-detected from the terminal but can be forced via `--json` or
//! `--pretty`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;
use crate::error::ProxyError;

pub const LOG_FILE_NAME: &str = "inference-proxy.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[must_use]
pub fn log_file_path(output_dir: &Path) -> PathBuf {
    output_dir.join(LOG_FILE_NAME)
}

/// Install the global subscriber. Creates `output_dir` if needed.
pub fn init(level: LogLevel, format: LogFormat, output_dir: &Path) -> Result<(), ProxyError> {
    std::fs::create_dir_all(output_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(output_dir))?;

    let filter = Targets::new().with_default(level.to_tracing_level());

    let json_stdout =
        (format == LogFormat::Json).then(|| fmt::layer().json().with_target(false));
    let pretty_stdout = (format == LogFormat::Pretty).then(|| fmt::layer().pretty());
    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_stdout)
        .with(pretty_stdout)
        .with(file_layer)
        .init();

    Ok(())
}
