//! Post rendering and run summaries
//!
//! This module handles:
//! - Rendering a post as markdown, html, json, pdf or epub
//! - Naming rendered files
//! - Collecting and printing per-source statistics

mod document;
mod formats;
mod markdown;
mod naming;
mod renderer;
pub mod stats;
mod traits;

pub use document::{render_document, synthesize_document, PandocConverter, PANDOC_BINARY};
pub use formats::OutputFormat;
pub use markdown::{
    escape_html, format_html, format_json, format_markdown, metadata_yaml, Html2MdConverter,
};
pub use naming::{date_prefix, output_filename};
pub use renderer::{PostRenderer, RenderJob};
pub use stats::{print_run_summary, SourceSummary};
pub use traits::{
    ConversionOptions, DocumentConverter, MarkdownConverter, RenderError, RenderResult,
};
