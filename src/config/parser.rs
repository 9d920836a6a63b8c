use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Loads and validates a configuration from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Parsed and validated configuration
/// * `Err(ConfigError)` - Unreadable file, malformed TOML, or failed validation
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads a configuration and returns it with its content hash
///
/// The hash identifies the exact configuration a run was started with, which
/// is useful when comparing results from different invocations.
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    let hash = compute_config_hash(&content);
    Ok((config, hash))
}

/// Computes a short SHA-256 hash of the raw config file content
pub fn compute_config_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}
