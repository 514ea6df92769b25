//! Configuration loading, environment overrides, and validation.
//!
//! [`load`] reads a YAML file, applies environment overrides, and
//! validates the result, so callers only ever see a [`Config`] that is
//! safe to build a backend registry from. Submodules provide the data
//! model, the override rules, and validation logic.

pub mod env;
pub mod model;
pub mod validation;

use std::path::Path;

use crate::error::ProxyError;
use model::Config;
use validation::validate;

/// Parse a YAML config string without validating it.
pub fn parse_config_str(content: &str, path_display: &str) -> Result<Config, ProxyError> {
    serde_yml::from_str(content).map_err(|e| ProxyError::ConfigParse {
        path: path_display.to_string(),
        source: Box::new(e),
    })
}

/// Load, override from the process environment, and validate a config file.
pub fn load(path: &Path) -> Result<Config, ProxyError> {
    load_with(path, |var| std::env::var(var).ok())
}

/// Like [`load`], with an explicit environment lookup.
pub fn load_with<F>(path: &Path, lookup: F) -> Result<Config, ProxyError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProxyError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProxyError::Io(e)
        }
    })?;

    let mut config = parse_config_str(&content, &path.display().to_string())?;
    env::apply_overrides(&mut config, lookup)?;

    if let Err(errors) = validate(&config) {
        return Err(ProxyError::ConfigValidation { errors });
    }

    Ok(config)
}
