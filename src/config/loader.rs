//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{AppConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides (`CALIRA_ENV`, `CALIRA_SITE_URL`,
/// `CALIRA_ALLOWED_DOMAIN`) are applied after the file is parsed and before
/// validation runs.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
/// Used when no config file is given.
pub fn config_from_env() -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(env) = std::env::var("CALIRA_ENV") {
        config.security.environment = if env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        };
    }
    if let Ok(url) = std::env::var("CALIRA_SITE_URL") {
        if !url.is_empty() {
            config.security.site_url = Some(url);
        }
    }
    if let Ok(domain) = std::env::var("CALIRA_ALLOWED_DOMAIN") {
        if !domain.is_empty() {
            config.security.allowed_domain = Some(domain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses() {
        let config: AppConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.security.rate_limit.max_requests, 50);
        assert_eq!(config.security.rate_limit.window_ms, 60_000);
        assert!(!config.security.environment.is_production());
    }

    #[test]
    fn test_partial_config_overrides_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [security]
            environment = "production"
            site_url = "https://app.calira.com"

            [security.rate_limit]
            max_requests = 10
            "#,
        )
        .expect("config should parse");

        assert!(config.security.environment.is_production());
        assert_eq!(config.security.site_url.as_deref(), Some("https://app.calira.com"));
        assert_eq!(config.security.rate_limit.max_requests, 10);
        // Untouched siblings keep defaults
        assert_eq!(config.security.rate_limit.window_ms, 60_000);
        assert_eq!(config.security.production_domain, "calira.com");
    }
}
