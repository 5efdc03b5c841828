//! Extraction module for post pages
//!
//! This module turns a fetched post page into:
//! - `PostMetadata`: title, author, publish date, tags and canonical URL,
//!   resolved through a structured-data-first fallback chain
//! - `PostContent`: the main article fragment plus the title the content
//!   extractor found

mod content;
mod metadata;

pub use content::{ContentExtractor, ReadabilityLikeExtractor};
pub use metadata::{extract_metadata, normalize_date};

use serde::Serialize;

/// Title used when neither structured data nor content yields one
pub const UNTITLED_POST: &str = "Untitled Post";

/// Structured description of one post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostMetadata {
    /// Post headline (resolved to a non-empty fallback before rendering)
    pub title: Option<String>,

    /// Author display name
    pub author: Option<String>,

    /// `YYYY-MM-DD` when it could be normalized, otherwise the raw string
    pub published_date: Option<String>,

    /// Tags in source order, duplicates allowed
    pub tags: Vec<String>,

    /// Canonical post URL, always set
    pub url: String,
}

impl PostMetadata {
    /// Creates metadata carrying only the post URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Merges the content extractor's title into this metadata
    ///
    /// The structured-data title is kept unless it is missing, or the
    /// content title is strictly longer. If both are missing the title
    /// becomes `"Untitled Post"`.
    pub fn resolve_title(&mut self, content_title: Option<&str>) {
        let structured = self.title.take().filter(|t| !t.trim().is_empty());
        let content = content_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let chosen = match (structured, content) {
            (None, content) => content,
            (Some(structured), Some(content)) if content.chars().count() > structured.chars().count() => {
                Some(content)
            }
            (Some(structured), _) => Some(structured),
        };

        self.title = match chosen {
            Some(title) => Some(title),
            None => {
                tracing::warn!("No title found for {}, using '{}'", self.url, UNTITLED_POST);
                Some(UNTITLED_POST.to_string())
            }
        };
    }

    /// Returns the title, or the placeholder when it is unresolved
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED_POST)
    }

    /// Returns true if the title is the placeholder
    pub fn has_placeholder_title(&self) -> bool {
        self.display_title() == UNTITLED_POST
    }
}

/// Article body produced by the content extractor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostContent {
    /// Article body markup (a fragment, not a full document)
    pub html_fragment: String,

    /// Title found by the content extractor, if any
    pub extracted_title: Option<String>,
}
