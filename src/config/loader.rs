//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "EMPLOYEES_BIND_ADDRESS";
/// Overrides `storage.uri`.
pub const ENV_STORE_URI: &str = "EMPLOYEES_STORE_URI";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: TOML file if given, else defaults, then environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse TOML without validating.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply overrides from a variable lookup (the process environment in
/// production).
pub fn apply_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ENV_BIND_ADDRESS).filter(|v| !v.is_empty()) {
        config.listener.bind_address = addr;
    }
    if let Some(uri) = lookup(ENV_STORE_URI).filter(|v| !v.is_empty()) {
        config.storage.uri = uri;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            [storage]
            uri = "file:///tmp/employees.json"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.uri, "file:///tmp/employees.json");
        assert!(config.storage.acknowledge_writes);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.listener.bind_address, "0.0.0.0:5200");
        assert_eq!(config.api.base_path, "/employees");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_config("[listener\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = ServiceConfig::default();
        apply_overrides(&mut config, |key| match key {
            ENV_BIND_ADDRESS => Some("127.0.0.1:6000".into()),
            ENV_STORE_URI => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.listener.bind_address, "127.0.0.1:6000");
        assert_eq!(config.storage.uri, "memory://");
    }

    #[test]
    fn test_load_validates_file() {
        let path = std::env::temp_dir().join(format!(
            "employee-api-config-{}.toml",
            crate::store::ObjectId::new()
        ));
        fs::write(&path, "[timeouts]\nrequest_secs = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "timeouts.request_secs"))
            }
            other => panic!("unexpected error: {}", other),
        }

        fs::remove_file(&path).unwrap_or_default();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Io(_))));
    }
}
