//! Text renderers: markdown, html and json
//!
//! All three share the same metadata block, serialized as YAML for markdown
//! front matter and the html comment header, and as a nested object for json.

use crate::extract::PostMetadata;
use crate::output::traits::{MarkdownConverter, RenderError, RenderResult};
use crate::output::OutputFormat;
use serde::Serialize;

/// Markdown converter backed by `html2md`
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl MarkdownConverter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        html2md::parse_html(html)
    }
}

/// Serializes the metadata block as YAML, field order preserved
pub fn metadata_yaml(metadata: &PostMetadata, format: OutputFormat) -> RenderResult<String> {
    serde_yaml::to_string(metadata).map_err(|e| RenderError::Serialize {
        format,
        message: e.to_string(),
    })
}

/// Formats a post as markdown
///
/// Layout: `---` front matter `---`, blank line, `# {title}`, blank line, body.
pub fn format_markdown(
    metadata: &PostMetadata,
    fragment: &str,
    converter: &dyn MarkdownConverter,
) -> RenderResult<String> {
    let front_matter = metadata_yaml(metadata, OutputFormat::Markdown)?;
    let body = converter.to_markdown(fragment);

    let mut md = String::with_capacity(front_matter.len() + body.len() + 64);
    md.push_str("---\n");
    md.push_str(&front_matter);
    md.push_str("---\n\n");
    md.push_str(&format!("# {}\n\n", metadata.display_title()));
    md.push_str(&body);
    Ok(md)
}

/// Formats a post as html: metadata comment, title heading, raw fragment
pub fn format_html(metadata: &PostMetadata, fragment: &str) -> RenderResult<String> {
    // A literal "-->" inside the YAML would close the comment early
    let header = metadata_yaml(metadata, OutputFormat::Html)?.replace("-->", "--&gt;");

    let mut html = String::with_capacity(header.len() + fragment.len() + 64);
    html.push_str("<!--\n");
    html.push_str(&header);
    html.push_str("-->\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(metadata.display_title())));
    html.push_str(fragment);
    Ok(html)
}

#[derive(Serialize)]
struct JsonPost<'a> {
    metadata: &'a PostMetadata,
    content_html: &'a str,
}

/// Formats a post as a pretty-printed json object, non-ASCII kept as is
pub fn format_json(metadata: &PostMetadata, fragment: &str) -> RenderResult<String> {
    serde_json::to_string_pretty(&JsonPost {
        metadata,
        content_html: fragment,
    })
    .map_err(|e| RenderError::Serialize {
        format: OutputFormat::Json,
        message: e.to_string(),
    })
}

/// Escapes text for use inside html element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
