//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors such as an empty service list, blank names or images,
//! duplicate service names, port 0, unusable hosts, and unknown log
//! levels. Returns a list of [`ValidationError`] values with per-field
//! suggestions.

use std::collections::HashSet;

use url::Url;

use super::model::Config;
use crate::cli::LogLevel;
use crate::error::ValidationError;

pub const VALID_LEVELS: &[&str] = &["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

/// Validate a configured log level. Returns the parsed level or a human-readable error.
pub fn validate_level(level: &str) -> Result<LogLevel, String> {
    LogLevel::from_config(level).ok_or_else(|| {
        format!(
            "'{level}' is not a valid log level (expected one of: {})",
            VALID_LEVELS.join(", ")
        )
    })
}

/// Validate that `host:port` forms a usable `http://` base URL.
pub fn validate_address(host: &str, port: u16) -> Result<(), String> {
    if host.is_empty() {
        return Err("host cannot be empty".into());
    }
    if port == 0 {
        return Err("port must be between 1 and 65535".into());
    }
    match Url::parse(&format!("http://{host}:{port}")) {
        Ok(parsed) if parsed.path() == "/" && parsed.query().is_none() => Ok(()),
        _ => Err(format!("'{host}:{port}' is not a valid host and port")),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.logging.output_dir.as_os_str().is_empty() {
        errors.push(ValidationError {
            service: "(logging)".into(),
            field: "logging.output_dir".into(),
            message: "output directory must be set".into(),
            suggestion: Some("e.g. './logs'".into()),
        });
    }

    if let Err(msg) = validate_level(&config.logging.level) {
        let upper = config.logging.level.to_uppercase();
        errors.push(ValidationError {
            service: "(logging)".into(),
            field: "logging.level".into(),
            message: msg,
            suggestion: VALID_LEVELS
                .contains(&upper.as_str())
                .then(|| format!("did you mean '{upper}'?")),
        });
    }

    if config.services.is_empty() {
        errors.push(ValidationError {
            service: "(root)".into(),
            field: "services".into(),
            message: "at least one service must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    let mut seen_names = HashSet::new();

    for (i, service) in config.services.iter().enumerate() {
        let service_id = if service.name.is_empty() {
            format!("services[{i}]")
        } else {
            service.name.clone()
        };

        if service.name.is_empty() {
            errors.push(ValidationError {
                service: service_id.clone(),
                field: "name".into(),
                message: "service name cannot be empty".into(),
                suggestion: None,
            });
        } else if !seen_names.insert(service.name.as_str()) {
            errors.push(ValidationError {
                service: service_id.clone(),
                field: "name".into(),
                message: "duplicate service name".into(),
                suggestion: None,
            });
        }

        if service.image.is_empty() {
            errors.push(ValidationError {
                service: service_id.clone(),
                field: "image".into(),
                message: "image cannot be empty".into(),
                suggestion: Some("e.g. 'registry/model-server:latest'".into()),
            });
        }

        if let Err(msg) = validate_address(&service.host, service.port) {
            let field = if service.port == 0 { "port" } else { "host" };
            errors.push(ValidationError {
                service: service_id.clone(),
                field: field.into(),
                message: msg,
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!(
        "  {} services, log level {}\n",
        config.services.len(),
        config.logging.level
    )];

    for (i, service) in config.services.iter().enumerate() {
        let marker = if i == 0 { " (default route)" } else { "" };
        lines.push(format!(
            "  {}  -> http://{}{marker}",
            service.name,
            service.address()
        ));
        lines.push(format!("    image: {}", service.image));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}
