//! Local filenames for downloaded images

use crate::url::slugify;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Extension used when neither the URL nor the content type names one
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Splits the last path segment of `url` into (stem, extension-with-dot)
fn split_basename(url: &Url) -> (String, Option<String>) {
    let basename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match basename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), Some(format!(".{}", ext)))
        }
        _ => (basename.to_string(), None),
    }
}

/// Picks the file extension for a downloaded image
///
/// Resolution order: the URL path's extension, then the declared content
/// type, then `.jpg`. The result always starts with a dot.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use substack_dl::assets::image_extension;
///
/// let url = Url::parse("https://cdn.example.com/img/photo.png?w=600").unwrap();
/// assert_eq!(image_extension(&url, Some("image/jpeg")), ".png");
///
/// let url = Url::parse("https://cdn.example.com/img/photo").unwrap();
/// assert_eq!(image_extension(&url, Some("image/jpeg")), ".jpg");
/// assert_eq!(image_extension(&url, Some("image/webp")), ".webp");
/// assert_eq!(image_extension(&url, None), ".jpg");
/// ```
pub fn image_extension(url: &Url, content_type: Option<&str>) -> String {
    if let (_, Some(ext)) = split_basename(url) {
        return ext;
    }

    content_type
        .and_then(extension_for_content_type)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}

fn extension_for_content_type(content_type: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    if essence.is_empty() {
        return None;
    }

    // mime_guess lists several JPEG extensions; keep the conventional one
    if matches!(essence.as_str(), "image/jpeg" | "image/jpg" | "image/pjpeg") {
        return Some("jpg".to_string());
    }

    mime_guess::get_mime_extensions_str(&essence)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
}

/// Derives the base filename (no extension) for an image
///
/// Slugifies the URL's basename stem; when that is empty, falls back to
/// `image_{index}` where `index` is the image's position in the fragment.
pub fn base_filename(url: &Url, index: usize) -> String {
    let (stem, _) = split_basename(url);
    let slug = slugify(&stem);
    if slug.is_empty() {
        format!("image_{}", index)
    } else {
        slug
    }
}

/// Returns a filename in `dir` that is not already used
///
/// A name is taken if a file with that name exists on disk or it appears in
/// `taken` (names assigned earlier in the same fragment). Collisions get an
/// incrementing suffix: `name.ext`, `name_1.ext`, `name_2.ext`, ...
pub fn unique_filename(dir: &Path, base: &str, ext: &str, taken: &HashSet<String>) -> String {
    let is_free = |name: &str| !taken.contains(name) && !dir.join(name).exists();

    let first = format!("{}{}", base, ext);
    if is_free(&first) {
        return first;
    }

    let mut counter = 1usize;
    loop {
        let candidate = format!("{}_{}{}", base, counter, ext);
        if is_free(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
