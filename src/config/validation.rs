use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler timings and limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.capped_pages < 1 || config.uncapped_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "page caps must be >= 1, got capped={} uncapped={}",
            config.capped_pages, config.uncapped_pages
        )));
    }

    // Sleeps of zero are allowed (useful against a local mock server)
    Ok(())
}

/// Validates the site origin
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "origin '{}' must use http or https",
            config.origin
        )));
    }

    if origin.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "origin '{}' has no host",
            config.origin
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if config.name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "user-agent name must not contain whitespace, got '{}'",
            config.name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.save_path.is_empty() {
        return Err(ConfigError::Validation(
            "save-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
