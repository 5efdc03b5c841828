//! Image download and `src` rewriting

use crate::assets::naming::{base_filename, image_extension, unique_filename};
use crate::crawler::{HttpFetcher, IMAGE_TIMEOUT};
use crate::ArchiveError;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

/// An `<img>` tag; a `>` inside a quoted attribute value does not end it
fn img_tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?is)<img\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).ok())
        .as_ref()
}

/// One attribute of a tag: name in group 1, quoted or bare value in 2
/// (inner text in 3, 4 or 5)
fn attr_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)\s([^\s"'>/=]+)(?:\s*=\s*("([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).ok()
    })
    .as_ref()
}

/// Finds the `src` attribute of a tag, skipping text inside other values
fn src_attr<'t>(re: &Regex, tag: &'t str) -> Option<regex::Captures<'t>> {
    re.captures_iter(tag)
        .find(|caps| caps.get(1).is_some_and(|name| name.as_str().eq_ignore_ascii_case("src")))
}

/// What happened to the images of one fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizeReport {
    /// Images downloaded and rewritten
    pub localized: usize,
    /// Inline `data:` images left as they were
    pub inline_skipped: usize,
    /// Images whose download failed; their references stay remote
    pub failed: usize,
}

/// Downloads every image in `fragment` and rewrites its `src`
///
/// Images are processed in document order, so filename collisions resolve
/// deterministically (`name.ext`, then `name_1.ext`). `dest_dir` is created
/// just before the first image is written. Each rewritten `src` becomes
/// `{assets_dir_name}/{post_slug}/{filename}`, relative to the directory the
/// post is rendered into.
///
/// A failed download is logged and leaves that one reference pointing at its
/// remote URL. Failing to write an image to disk is returned as an error.
///
/// Everything outside the rewritten attribute values is left untouched.
pub async fn localize_images(
    fetcher: &HttpFetcher,
    fragment: &str,
    base_url: &Url,
    dest_dir: &Path,
    post_slug: &str,
    assets_dir_name: &str,
) -> Result<(String, LocalizeReport), ArchiveError> {
    let mut report = LocalizeReport::default();
    let (Some(img_re), Some(attr_re)) = (img_tag_regex(), attr_regex()) else {
        return Ok((fragment.to_string(), report));
    };
    let mut output = String::with_capacity(fragment.len());
    let mut taken: HashSet<String> = HashSet::new();
    let mut dir_ready = false;
    let mut last = 0usize;

    for (index, tag) in img_re.find_iter(fragment).enumerate() {
        output.push_str(&fragment[last..tag.start()]);
        last = tag.end();

        let tag_text = tag.as_str();
        let Some(src) = src_attr(attr_re, tag_text) else {
            output.push_str(tag_text);
            continue;
        };
        let Some(value) = src.get(3).or_else(|| src.get(4)).or_else(|| src.get(5)) else {
            output.push_str(tag_text);
            continue;
        };
        let Some(quoted) = src.get(2) else {
            output.push_str(tag_text);
            continue;
        };

        let original_src = decode_attr(value.as_str());
        if original_src.trim().is_empty() {
            output.push_str(tag_text);
            continue;
        }

        let image_url = match base_url.join(original_src.trim()) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Could not resolve image {}: {}", original_src, e);
                report.failed += 1;
                output.push_str(tag_text);
                continue;
            }
        };

        if image_url.scheme() == "data" {
            tracing::info!(
                "Skipping data URI image: {}...",
                original_src.chars().take(100).collect::<String>()
            );
            report.inline_skipped += 1;
            output.push_str(tag_text);
            continue;
        }

        tracing::info!("Downloading image: {}", image_url);
        let response = match fetcher.get(image_url.as_str(), IMAGE_TIMEOUT).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to download image {}: {}", image_url, e);
                report.failed += 1;
                output.push_str(tag_text);
                continue;
            }
        };

        let extension = image_extension(&image_url, response.content_type());
        let base = base_filename(&image_url, index);

        if !dir_ready {
            std::fs::create_dir_all(dest_dir)?;
            dir_ready = true;
        }

        let filename = unique_filename(dest_dir, &base, &extension, &taken);
        let local_path = dest_dir.join(&filename);
        std::fs::write(&local_path, &response.body)?;
        taken.insert(filename.clone());

        let relative = format!("{}/{}/{}", assets_dir_name, post_slug, filename);
        tracing::info!(
            "Saved image to {} and updated src to {}",
            local_path.display(),
            relative
        );

        // Replace only the attribute value, quoting it with double quotes
        let value_range = quoted.range();
        output.push_str(&tag_text[..value_range.start]);
        output.push('"');
        output.push_str(&relative.replace('"', "&quot;"));
        output.push('"');
        output.push_str(&tag_text[value_range.end..]);

        report.localized += 1;
    }

    output.push_str(&fragment[last..]);
    Ok((output, report))
}

/// Decodes the entities serializers commonly emit inside attribute values
fn decode_attr(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
