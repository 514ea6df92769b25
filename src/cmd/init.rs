//! `inference-proxy init`: generate a starter configuration file.

use crate::cli::InitArgs;
use crate::error::ProxyError;

pub fn execute(args: &InitArgs) -> Result<(), ProxyError> {
    let output = &args.output;

    if output.exists() {
        return Err(ProxyError::FileExists {
            path: output.clone(),
        });
    }

    std::fs::write(output, TEMPLATE)?;
    println!("Created {}", output.display());
    Ok(())
}

pub const TEMPLATE: &str = r#"# inference-proxy config
#
# Every request is forwarded to the first service listed below.
# AI_PROXY_SERVICE_PORT overrides the port of every service and
# AI_PROXY_LOG_LEVEL overrides logging.level.

services:
  - name: "llm"
    image: "ghcr.io/example/llm-server:latest"
    port: 8001
    # host: "localhost"          # Default: localhost

  # - name: "embeddings"
  #   image: "ghcr.io/example/embeddings:latest"
  #   port: 8002

logging:
  output_dir: "./logs"
  level: "INFO"                  # DEBUG | INFO | WARNING | ERROR | CRITICAL
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config_str, validation::validate};

    #[test]
    fn template_is_a_valid_config() {
        let config = parse_config_str(TEMPLATE, "template").unwrap();
        validate(&config).unwrap();
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].address(), "localhost:8001");
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("inference-proxy.yaml");
        std::fs::write(&output, "existing").unwrap();

        let err = execute(&InitArgs {
            output: output.clone(),
        })
        .unwrap_err();
        assert!(matches!(err, ProxyError::FileExists { .. }));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "existing");
    }

    #[test]
    fn writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("proxy.yaml");
        execute(&InitArgs {
            output: output.clone(),
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), TEMPLATE);
    }
}
