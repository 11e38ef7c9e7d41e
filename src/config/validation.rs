use crate::config::types::{Config, CrawlerConfig, OutputConfig, SeedsConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for `delay-seconds` (one day)
const MAX_DELAY_SECONDS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32

    if config.max_urls < 1 {
        return Err(ConfigError::Validation(format!(
            "max-urls must be >= 1, got {}",
            config.max_urls
        )));
    }

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be a finite number >= 0, got {}",
            config.delay_seconds
        )));
    }

    if config.delay_seconds > MAX_DELAY_SECONDS {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be at most {}, got {}",
            MAX_DELAY_SECONDS, config.delay_seconds
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.robots_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "robots-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // The crawler name doubles as the robots.txt product token
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only letters, digits, '-' and '_', got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.documents_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "documents-dir cannot be empty".to_string(),
        ));
    }

    if matches!(&config.stats_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "stats-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates inline seed URLs
///
/// Seeds from a seed file are not checked here; malformed entries there are
/// dropped during the crawl.
fn validate_seeds(config: &SeedsConfig) -> Result<(), ConfigError> {
    for seed in &config.urls {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }
    }

    Ok(())
}
