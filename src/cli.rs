//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate), and their associated argument
//! structs. Listener flags have environment variable equivalents for
//! container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_CONFIG_FILE: &str = "inference-proxy.yaml";

#[derive(Parser)]
#[command(
    name = "inference-proxy",
    version,
    about = "HTTP reverse proxy for inference services",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        inference-proxy init                     Create a starter config\n  \
        inference-proxy run                      Start with ./inference-proxy.yaml\n  \
        inference-proxy run -c services.yaml     Start with a specific config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        inference-proxy run                                  Use ./inference-proxy.yaml\n  \
        inference-proxy run -c services.yaml -p 9000         Specific config and port\n  \
        AI_PROXY_SERVICE_PORT=8080 inference-proxy run       Override every service port")]
pub struct RunArgs {
    /// Config file path (.yaml)
    #[arg(short, long, env = "AI_PROXY_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Listen port
    #[arg(short, long, env = "AI_PROXY_LISTEN_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "AI_PROXY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Logging --
    /// Log level (overrides the config file and AI_PROXY_LOG_LEVEL)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "AI_PROXY_MAX_BODY_SIZE",
        default_value_t = 16_777_216,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Parse the upper-case level names accepted in the config file.
    #[must_use]
    pub fn from_config(level: &str) -> Option<Self> {
        match level {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            // tracing has no level above ERROR
            Self::Error | Self::Critical => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
