use crate::url::POST_PATH_MARKER;
use crate::ArchiveError;
use url::Url;

/// Maximum length of the slug taken from a post URL's last segment
const URL_SLUG_MAX_CHARS: usize = 100;

/// Normalizes a source root so that it ends with exactly one slash
///
/// Relative archive and post links are resolved against the result, which
/// keeps sources hosted under a sub-path working.
///
/// # Examples
///
/// ```
/// use substack_dl::url::normalize_source_root;
///
/// let root = normalize_source_root("https://example.substack.com//").unwrap();
/// assert_eq!(root.as_str(), "https://example.substack.com/");
///
/// let root = normalize_source_root("https://example.com/blog").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/blog/");
/// ```
pub fn normalize_source_root(raw: &str) -> Result<Url, ArchiveError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let mut url = Url::parse(&format!("{}/", trimmed))?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Builds the URL of one archive listing page
///
/// # Examples
///
/// ```
/// use substack_dl::url::{archive_page_url, normalize_source_root};
///
/// let root = normalize_source_root("https://example.substack.com").unwrap();
/// let page = archive_page_url(&root, 3).unwrap();
/// assert_eq!(page.as_str(), "https://example.substack.com/archive?page=3");
/// ```
pub fn archive_page_url(root: &Url, page: u32) -> Result<Url, ArchiveError> {
    let mut url = root.join("archive")?;
    url.set_query(Some(&format!("page={}", page)));
    Ok(url)
}

/// Returns true if both URLs point at the same host and port
pub fn is_same_site(url: &Url, root: &Url) -> bool {
    url.host_str().map(|h| h.to_lowercase()) == root.host_str().map(|h| h.to_lowercase())
        && url.port_or_known_default() == root.port_or_known_default()
}

/// Resolves a candidate post link against the source root
///
/// Returns None unless the link resolves to an http(s) URL on the source's
/// own host whose path contains the post marker. Query string and fragment
/// are stripped so the same post reached through tracking links dedups to
/// one entry.
pub fn normalize_post_url(href: &str, root: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut url = root.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    if !is_same_site(&url, root) || !url.path().contains(POST_PATH_MARKER) {
        return None;
    }

    url.set_query(None);
    url.set_fragment(None);
    Some(url)
}

/// Returns the last non-empty path segment of a URL, truncated to 100 chars
///
/// # Examples
///
/// ```
/// use url::Url;
/// use substack_dl::url::url_slug;
///
/// let url = Url::parse("https://example.substack.com/p/hello-world").unwrap();
/// assert_eq!(url_slug(&url), "hello-world");
/// ```
pub fn url_slug(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("")
        .chars()
        .take(URL_SLUG_MAX_CHARS)
        .collect()
}
