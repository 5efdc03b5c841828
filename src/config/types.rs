use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Main configuration structure for substack-dl
///
/// Every field has a default, so a config file only needs to name the
/// options it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URLs of the newsletters to archive
    pub substack_urls: Vec<String>,

    /// Output format names (md, html, json, pdf, epub)
    pub formats: Vec<String>,

    /// Directory where posts are written
    pub output_dir: PathBuf,

    /// Download images and rewrite references to local paths
    pub download_images: bool,

    /// Skip posts already recorded in the download log
    pub incremental: bool,

    /// Delay between network requests, in seconds
    pub delay: f64,

    /// Name of the asset directory inside each output directory
    pub assets_dir_name: String,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            substack_urls: Vec::new(),
            formats: vec!["md".to_string(), "json".to_string()],
            output_dir: PathBuf::from("substack_posts"),
            download_images: true,
            incremental: false,
            delay: 1.0,
            assets_dir_name: "assets".to_string(),
            user_agent: format!("substack-dl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Returns the configured delay as a Duration
    ///
    /// Only meaningful after validation, which rejects negative, non-finite
    /// and out-of-range values; those map to zero here.
    pub fn delay_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay).unwrap_or(Duration::ZERO)
    }

    /// Applies explicit overrides on top of this configuration
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.url {
            self.substack_urls = vec![url.clone()];
        }
        if let Some(formats) = &overrides.formats {
            self.formats = formats.clone();
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(download_images) = overrides.download_images {
            self.download_images = download_images;
        }
        if let Some(incremental) = overrides.incremental {
            self.incremental = incremental;
        }
        if let Some(delay) = overrides.delay {
            self.delay = delay;
        }
        if let Some(assets_dir_name) = &overrides.assets_dir_name {
            self.assets_dir_name = assets_dir_name.clone();
        }
    }

    /// Returns the requested format names, trimmed and lowercased
    pub fn normalized_formats(&self) -> Vec<String> {
        self.formats
            .iter()
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect()
    }
}

/// Explicit overrides, highest precedence layer
///
/// A single `url` replaces the whole configured source list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub formats: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub download_images: Option<bool>,
    pub incremental: Option<bool>,
    pub delay: Option<f64>,
    pub assets_dir_name: Option<String>,
}
