//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window > 0, addresses parse)
//! - Check production prerequisites (site URL set when gating is live)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. "security.rate_limit.window_ms").
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: &str) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(err("listener.bind_address", "not a valid socket address"));
    }
    if config.listener.max_connections == 0 {
        errors.push(err("listener.max_connections", "must be greater than zero"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be greater than zero"));
    }

    let rl = &config.security.rate_limit;
    if rl.enabled {
        if rl.window_ms == 0 {
            errors.push(err("security.rate_limit.window_ms", "must be greater than zero"));
        }
        if rl.max_requests == 0 {
            errors.push(err("security.rate_limit.max_requests", "must be greater than zero"));
        }
        if rl.max_tracked_ips == 0 {
            errors.push(err("security.rate_limit.max_tracked_ips", "must be greater than zero"));
        }
    }

    if let Some(url) = &config.security.site_url {
        if url::Url::parse(url).is_err() {
            errors.push(err("security.site_url", "not a valid URL"));
        }
    }
    if config.security.environment.is_production() && config.security.production_domain.is_empty() {
        errors.push(err("security.production_domain", "must be set in production"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(err("observability.metrics_address", "not a valid socket address"));
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(err("admin.api_key", "must be set when admin endpoints are enabled"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.security.rate_limit.window_ms = 0;
        config.security.site_url = Some("::bad::".to_string());

        let errors = validate_config(&config).expect_err("config should be invalid");
        assert_eq!(errors.len(), 3);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"security.rate_limit.window_ms"));
        assert!(fields.contains(&"security.site_url"));
    }

    #[test]
    fn test_admin_key_required_when_enabled() {
        let mut config = AppConfig::default();
        config.admin.enabled = true;
        config.admin.api_key = String::new();

        let errors = validate_config(&config).expect_err("config should be invalid");
        assert_eq!(errors[0].field, "admin.api_key");
    }
}
