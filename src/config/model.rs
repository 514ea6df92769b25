//! Serde data structures for the proxy configuration file.
//!
//! Contains [`Config`] (the root), [`ServiceSettings`] and
//! [`LogSettings`]. All types derive `Deserialize` with
//! `deny_unknown_fields` for strict parsing.

use std::path::PathBuf;

use serde::Deserialize;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_level() -> String {
    "INFO".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub services: Vec<ServiceSettings>,

    pub logging: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSettings {
    pub name: String,

    /// Container image the service runs from. Not used on the forwarding path.
    pub image: String,

    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

impl ServiceSettings {
    /// `host:port` the backend listens on.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    pub output_dir: PathBuf,

    #[serde(default = "default_level")]
    pub level: String,
}
