//! substack-dl: a newsletter archive downloader
//!
//! This crate walks the paginated archive of a newsletter site, fetches every
//! post, extracts the article body and its metadata, optionally localizes the
//! embedded images, and writes each post in one or more document formats.
//! Repeated runs are idempotent when the incremental download log is enabled.

pub mod assets;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for substack-dl operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Render error: {0}")]
    Render(#[from] output::RenderError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No source URL provided; pass --url or set substack_urls in the config file")]
    NoSources,
}

/// Errors raised by the fetch primitive
///
/// Network failures (connection, timeout, body read) are kept apart from
/// responses that arrived with a non-success status so callers can treat a
/// 404 on an archive page as the end of the listing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Returns the HTTP status code, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }

    /// Returns true if the server answered 404 Not Found
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for substack-dl operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{discover_posts, Orchestrator};
pub use extract::{extract_metadata, PostContent, PostMetadata};
pub use output::{OutputFormat, PostRenderer};
pub use state::PostOutcome;
pub use storage::DownloadLog;
