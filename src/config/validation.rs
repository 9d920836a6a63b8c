use crate::config::types::Config;
use crate::ConfigError;

/// Validates the entire configuration
///
/// All checks here are fatal: a config that fails validation never starts
/// a crawl.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(config)?;
    validate_keyword(config)?;
    validate_limits(config)?;
    Ok(())
}

fn validate_seeds(config: &Config) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    // Parse every seed up front so a typo fails the run before any fetch
    config.seed_urls().map(|_| ())
}

fn validate_keyword(config: &Config) -> Result<(), ConfigError> {
    if config.keyword.trim().is_empty() {
        return Err(ConfigError::Validation(
            "keyword cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.concurrency < 1 || config.concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 64, got {}",
            config.concurrency
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config::new(vec!["https://example.com/".to_string()], "rust")
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_seeds_rejected() {
        let mut config = valid_config();
        config.seeds.clear();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_malformed_seed_rejected() {
        let mut config = valid_config();
        config.seeds.push("ftp://example.com/".to_string());
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let mut config = valid_config();
        config.keyword = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = valid_config();
        config.max_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = valid_config();
        config.concurrency = 0;
        assert!(validate(&config).is_err());

        config.concurrency = 65;
        assert!(validate(&config).is_err());

        config.concurrency = 64;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }
}
