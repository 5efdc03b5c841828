//! Binary document rendering (pdf, epub)
//!
//! The converter resolves relative image paths from the location of its
//! input file, so the synthesized html document is written as a temporary
//! file next to the rendered output (the directory the images were
//! localized under) and removed once the conversion returns, whatever the
//! outcome.

use crate::extract::PostMetadata;
use crate::output::markdown::escape_html;
use crate::output::traits::{ConversionOptions, DocumentConverter, RenderError, RenderResult};
use crate::output::OutputFormat;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

/// Default converter binary
pub const PANDOC_BINARY: &str = "pandoc";

/// Document converter that shells out to pandoc
#[derive(Debug, Clone)]
pub struct PandocConverter {
    binary: String,
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new(PANDOC_BINARY)
    }
}

impl PandocConverter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl DocumentConverter for PandocConverter {
    fn convert(
        &self,
        input: &Path,
        format: OutputFormat,
        output: &Path,
        options: &ConversionOptions,
    ) -> RenderResult<()> {
        let mut command = Command::new(&self.binary);
        command.arg(input).args(["--from", "html"]);

        // pdf output is selected from the extension through a pdf engine
        if format == OutputFormat::Epub {
            command.args(["--to", "epub"]);
        }

        command.arg("--output").arg(output);

        if let Some(dir) = input.parent() {
            command.arg("--resource-path").arg(dir);
        }
        if options.embed_resources {
            command.arg("--embed-resources");
        }
        if options.standalone {
            command.arg("--standalone");
        }

        let result = match command.output() {
            Ok(result) => result,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RenderError::ConverterMissing(self.binary.clone()));
            }
            Err(e) => return Err(RenderError::Io(e)),
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::Conversion {
                format,
                message: format!("{} exited with {}: {}", self.binary, result.status, stderr.trim()),
            });
        }

        Ok(())
    }
}

/// Builds the standalone html document handed to the converter
pub fn synthesize_document(metadata: &PostMetadata, fragment: &str) -> String {
    let title = escape_html(metadata.display_title());
    let author = escape_html(metadata.author.as_deref().unwrap_or(""));
    let date = escape_html(metadata.published_date.as_deref().unwrap_or(""));

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <meta name=\"author\" content=\"{author}\">\n<meta name=\"date\" content=\"{date}\">\n\
         </head>\n<body>\n<h1>{title}</h1>\n{fragment}\n</body>\n</html>\n",
    )
}

/// Renders a pdf or epub file at `output_path`
///
/// The temporary input lives in the output file's directory, named after
/// the output file, and is deleted on every exit path.
pub fn render_document(
    converter: &dyn DocumentConverter,
    format: OutputFormat,
    metadata: &PostMetadata,
    fragment: &str,
    output_path: &Path,
) -> RenderResult<()> {
    let dir = match output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "post".to_string());

    let mut temp = tempfile::Builder::new()
        .prefix(&format!("{}_", stem))
        .suffix("_temp.html")
        .tempfile_in(dir)?;
    temp.write_all(synthesize_document(metadata, fragment).as_bytes())?;
    temp.flush()?;

    let result = converter.convert(temp.path(), format, output_path, &ConversionOptions::default());

    if let Err(e) = temp.close() {
        tracing::warn!("Could not remove temporary conversion input: {}", e);
    }

    result
}
