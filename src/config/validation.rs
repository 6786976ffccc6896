use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;

/// Upper bound on the worker count
pub const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.max_depth == Some(0) {
        return Err(ConfigError::Validation(
            "max-depth must be >= 1 (the seed page is depth 1)".to_string(),
        ));
    }

    Ok(())
}

/// Validates page reader configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout-ms must be > 0".to_string(),
        ));
    }

    if config.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-ms must be > 0".to_string(),
        ));
    }

    if config.connect_timeout_ms > config.timeout_ms {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-ms ({}) cannot exceed timeout-ms ({})",
            config.connect_timeout_ms, config.timeout_ms
        )));
    }

    if config.max_body_bytes == 0 {
        return Err(ConfigError::Validation(
            "max-body-bytes must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.summary_path.as_deref(), Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
