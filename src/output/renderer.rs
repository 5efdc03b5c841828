//! Post renderer: writes one post in one format

use crate::extract::PostMetadata;
use crate::output::document::{render_document, PandocConverter};
use crate::output::markdown::{format_html, format_json, format_markdown, Html2MdConverter};
use crate::output::traits::{DocumentConverter, MarkdownConverter, RenderResult};
use crate::output::OutputFormat;
use std::path::Path;

/// A single render request
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub format: OutputFormat,
    pub output_path: &'a Path,
    pub metadata: &'a PostMetadata,
    /// Article fragment, image sources already rewritten when localized
    pub fragment: &'a str,
}

/// Renders posts through the configured converters
pub struct PostRenderer {
    markdown: Box<dyn MarkdownConverter>,
    documents: Box<dyn DocumentConverter>,
}

impl Default for PostRenderer {
    fn default() -> Self {
        Self::new(Box::new(Html2MdConverter), Box::new(PandocConverter::default()))
    }
}

impl PostRenderer {
    pub fn new(markdown: Box<dyn MarkdownConverter>, documents: Box<dyn DocumentConverter>) -> Self {
        Self { markdown, documents }
    }

    /// Replaces the markdown converter
    pub fn with_markdown_converter(mut self, converter: Box<dyn MarkdownConverter>) -> Self {
        self.markdown = converter;
        self
    }

    /// Replaces the document converter
    pub fn with_document_converter(mut self, converter: Box<dyn DocumentConverter>) -> Self {
        self.documents = converter;
        self
    }

    /// Renders `job` to its output path
    ///
    /// Text formats are written directly. Document formats go through the
    /// document converter with a temporary html input next to the output.
    pub fn render(&self, job: &RenderJob<'_>) -> RenderResult<()> {
        let text = match job.format {
            OutputFormat::Markdown => {
                format_markdown(job.metadata, job.fragment, self.markdown.as_ref())?
            }
            OutputFormat::Html => format_html(job.metadata, job.fragment)?,
            OutputFormat::Json => format_json(job.metadata, job.fragment)?,
            OutputFormat::Pdf | OutputFormat::Epub => {
                return render_document(
                    self.documents.as_ref(),
                    job.format,
                    job.metadata,
                    job.fragment,
                    job.output_path,
                );
            }
        };

        std::fs::write(job.output_path, text)?;
        tracing::debug!("Wrote {}", job.output_path.display());
        Ok(())
    }
}
