//! Renderer error type and the conversion collaborators
//!
//! Markdown conversion and binary document conversion are external concerns;
//! the renderer talks to them only through these traits so they can be
//! swapped (and faked in tests).

use crate::output::OutputFormat;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while rendering one format of one post
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown output format '{0}'")]
    UnknownFormat(String),

    #[error("Failed to serialize {format} output: {message}")]
    Serialize { format: OutputFormat, message: String },

    #[error("Document converter not found: {0}")]
    ConverterMissing(String),

    #[error("Conversion to {format} failed: {message}")]
    Conversion { format: OutputFormat, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Returns true if the external converter binary is not installed
    pub fn is_converter_missing(&self) -> bool {
        matches!(self, Self::ConverterMissing(_))
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Converts an HTML fragment to markdown text
pub trait MarkdownConverter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// Options handed to the document converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Inline every referenced resource (images, styles) into the output
    pub embed_resources: bool,

    /// Produce a complete document rather than a fragment
    pub standalone: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            embed_resources: true,
            standalone: true,
        }
    }
}

/// Converts a standalone HTML file into a binary document format
///
/// Relative resource paths inside `input` are resolved from the directory
/// containing `input`.
pub trait DocumentConverter: Send + Sync {
    fn convert(
        &self,
        input: &Path,
        format: OutputFormat,
        output: &Path,
        options: &ConversionOptions,
    ) -> RenderResult<()>;
}
