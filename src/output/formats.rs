use std::fmt;
use std::str::FromStr;

use crate::output::RenderError;

/// Output formats a post can be rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Markdown with a YAML front matter block
    Markdown,
    /// Raw article markup with a metadata comment
    Html,
    /// `{metadata, content_html}` object
    Json,
    /// Paginated document produced by the document converter
    Pdf,
    /// E-book produced by the document converter
    Epub,
}

impl OutputFormat {
    /// File extension used for rendered files (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::Epub => "epub",
        }
    }

    /// Returns true if the format is produced by the external document converter
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Pdf | Self::Epub)
    }

    /// Returns all supported formats
    pub fn all() -> [Self; 5] {
        [Self::Markdown, Self::Html, Self::Json, Self::Pdf, Self::Epub]
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "pdf" => Ok(Self::Pdf),
            "epub" => Ok(Self::Epub),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
