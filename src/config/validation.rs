//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, paths and the storage URI
//! - Validate value ranges (timeouts > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServiceConfig;

/// Storage URI schemes the service can open.
pub const SUPPORTED_SCHEMES: &[&str] = &["memory", "file"];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address: {}", config.listener.bind_address, e),
        ));
    }

    if !config.api.base_path.starts_with('/') {
        errors.push(ValidationError::new(
            "api.base_path",
            format!("`{}` must start with '/'", config.api.base_path),
        ));
    } else if config.api.base_path.contains(['{', '}', '*']) {
        errors.push(ValidationError::new(
            "api.base_path",
            format!("`{}` must not contain route parameters", config.api.base_path),
        ));
    }

    match Url::parse(&config.storage.uri) {
        Ok(url) if SUPPORTED_SCHEMES.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::new(
            "storage.uri",
            format!(
                "unsupported scheme `{}` (expected one of {})",
                url.scheme(),
                SUPPORTED_SCHEMES.join(", ")
            ),
        )),
        Err(e) => errors.push(ValidationError::new(
            "storage.uri",
            format!("`{}` is not a valid URI: {}", config.storage.uri, e),
        )),
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level `{}`", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!(
                    "`{}` is not a socket address: {}",
                    config.observability.metrics_address, e
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
