use crate::config::types::Config;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
///
/// Unknown format names are deliberately accepted here; the renderer logs
/// and skips them per post.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sources(&config.substack_urls)?;
    validate_formats(&config.formats)?;
    validate_delay(config.delay)?;
    validate_output(config)?;
    Ok(())
}

/// Validates the source list: at least one non-empty entry, all http(s)
fn validate_sources(urls: &[String]) -> Result<(), ConfigError> {
    if urls.iter().all(|u| u.trim().is_empty()) {
        return Err(ConfigError::NoSources);
    }

    // Empty entries are skipped with a warning at run time
    for raw in urls.iter().filter(|u| !u.trim().is_empty()) {
        let url = Url::parse(raw.trim())
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid source URL '{}': {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Source URL '{}' must use http or https",
                raw
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Source URL '{}' has no host",
                raw
            )));
        }
    }

    Ok(())
}

fn validate_formats(formats: &[String]) -> Result<(), ConfigError> {
    if formats.iter().all(|f| f.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "formats must name at least one output format".to_string(),
        ));
    }
    Ok(())
}

fn validate_delay(delay: f64) -> Result<(), ConfigError> {
    if !delay.is_finite() || delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            delay
        )));
    }
    if Duration::try_from_secs_f64(delay).is_err() {
        return Err(ConfigError::Validation(format!(
            "delay of {} seconds is too large",
            delay
        )));
    }
    Ok(())
}

/// Validates output directory and asset directory name
fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    let assets = config.assets_dir_name.trim();
    if assets.is_empty() {
        return Err(ConfigError::Validation(
            "assets_dir_name cannot be empty".to_string(),
        ));
    }

    // Must be a single path component, it becomes part of rewritten image paths
    if assets.contains('/') || assets.contains('\\') || assets == "." || assets == ".." {
        return Err(ConfigError::Validation(format!(
            "assets_dir_name must be a plain directory name, got '{}'",
            config.assets_dir_name
        )));
    }

    Ok(())
}
