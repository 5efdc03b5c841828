use crate::config::types::{Config, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses TOML configuration content on top of the built-in defaults
///
/// No validation is performed; the file layer alone is allowed to be
/// incomplete (for example, sources may come from the command line).
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Reads and parses a configuration file without validating it
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Resolves the layered configuration: defaults < file < overrides
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
/// * `overrides` - Explicit overrides, applied last
///
/// # Returns
///
/// * `Ok(Config)` - Resolved and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use substack_dl::config::{load_config, ConfigOverrides};
///
/// let overrides = ConfigOverrides {
///     url: Some("https://example.substack.com".to_string()),
///     ..ConfigOverrides::default()
/// };
/// let config = load_config(None, &overrides).unwrap();
/// assert_eq!(config.substack_urls.len(), 1);
/// ```
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };

    config.apply_overrides(overrides);

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is logged at startup so a run can be matched with the exact
/// configuration that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Resolves a configuration and returns the file hash alongside it
///
/// The hash is `None` when no configuration file was used.
pub fn load_config_with_hash(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<(Config, Option<String>), ConfigError> {
    let config = load_config(path, overrides)?;
    let hash = path.map(compute_config_hash).transpose()?;
    Ok((config, hash))
}
