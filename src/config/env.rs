//! Environment variable overrides applied on top of the config file.
//!
//! `AI_PROXY_SERVICE_PORT` replaces the port of every configured
//! service and `AI_PROXY_LOG_LEVEL` replaces the log level. Overrides
//! run before validation so overridden values are checked like any
//! other.

use super::model::Config;
use crate::error::ProxyError;

pub const SERVICE_PORT_VAR: &str = "AI_PROXY_SERVICE_PORT";
pub const LOG_LEVEL_VAR: &str = "AI_PROXY_LOG_LEVEL";

/// Apply overrides from a variable lookup, normally `std::env::var`.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ProxyError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(SERVICE_PORT_VAR) {
        let port: u16 = raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ProxyError::InvalidEnvOverride {
                var: SERVICE_PORT_VAR,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        tracing::debug!(port, "overriding service ports from environment");
        for service in &mut config.services {
            service.port = port;
        }
    }

    if let Some(level) = lookup(LOG_LEVEL_VAR) {
        tracing::debug!(level = %level, "overriding log level from environment");
        config.logging.level = level;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;
    use crate::config::model::{LogSettings, ServiceSettings};

    fn config() -> Config {
        Config {
            services: vec![
                ServiceSettings {
                    name: "llm".into(),
                    image: "llm:latest".into(),
                    port: 8001,
                    host: "localhost".into(),
                },
                ServiceSettings {
                    name: "embeddings".into(),
                    image: "embeddings:latest".into(),
                    port: 8002,
                    host: "localhost".into(),
                },
            ],
            logging: LogSettings {
                output_dir: PathBuf::from("/var/log"),
                level: "INFO".into(),
            },
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn no_overrides_leaves_config_untouched() {
        let mut config = config();
        apply_overrides(&mut config, |_| None).unwrap();
        assert_eq!(config.services[0].port, 8001);
        assert_eq!(config.services[1].port, 8002);
        assert_eq!(config.logging.level, "INFO");
    }

    #[test]
    fn port_override_applies_to_every_service() {
        let env = vars(&[(SERVICE_PORT_VAR, "9000")]);
        let mut config = config();
        apply_overrides(&mut config, |k| env.get(k).cloned()).unwrap();
        assert!(config.services.iter().all(|s| s.port == 9000));
    }

    #[test]
    fn level_override_replaces_level() {
        let env = vars(&[(LOG_LEVEL_VAR, "DEBUG")]);
        let mut config = config();
        apply_overrides(&mut config, |k| env.get(k).cloned()).unwrap();
        assert_eq!(config.logging.level, "DEBUG");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let env = vars(&[(SERVICE_PORT_VAR, "eighty")]);
        let mut config = config();
        let err = apply_overrides(&mut config, |k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            ProxyError::InvalidEnvOverride { var: SERVICE_PORT_VAR, .. }
        ));
    }
}
