//! Archive page parser
//!
//! Post links are found with a layered selector strategy:
//! 1. Narrow selectors matching the archive's own post cards
//! 2. Any link whose href contains `/p/`
//!
//! If both come up empty the page is treated as the end of the archive.

use crate::url::normalize_post_url;
use scraper::{Html, Selector};
use url::Url;

/// Selectors matching the post cards of an archive listing
const NARROW_SELECTORS: &str =
    r#".portable-archive-post a[href*="/p/"], .post-preview a[href*="/p/"], a.pencraft[href*="/p/"]"#;

/// Fallback selector used when the page layout is unknown
const BROAD_SELECTOR: &str = r#"a[href*="/p/"]"#;

/// Extracted information from an archive page
#[derive(Debug, Clone, Default)]
pub struct ArchivePage {
    /// Number of candidate links the selectors matched
    pub candidate_links: usize,

    /// Same-site post URLs, in document order, without duplicates
    pub post_urls: Vec<Url>,
}

impl ArchivePage {
    /// Returns true if no selector matched anything
    pub fn has_no_links(&self) -> bool {
        self.candidate_links == 0
    }
}

/// Parses an archive page and extracts post URLs
///
/// Links are resolved against `root`; only links on the same host whose
/// path contains `/p/` are kept, with their query string and fragment
/// stripped.
///
/// # Example
///
/// ```
/// use substack_dl::crawler::parse_archive_page;
/// use url::Url;
///
/// let root = Url::parse("https://example.substack.com/").unwrap();
/// let html = r#"<div class="post-preview"><a href="/p/hello?r=1">Hello</a></div>"#;
/// let page = parse_archive_page(html, &root);
/// assert_eq!(page.post_urls[0].as_str(), "https://example.substack.com/p/hello");
/// ```
pub fn parse_archive_page(html: &str, root: &Url) -> ArchivePage {
    let document = Html::parse_document(html);

    let mut hrefs = select_hrefs(&document, NARROW_SELECTORS);
    if hrefs.is_empty() {
        hrefs = select_hrefs(&document, BROAD_SELECTOR);
    }

    let mut post_urls: Vec<Url> = Vec::new();
    for href in &hrefs {
        match normalize_post_url(href, root) {
            Some(url) if !post_urls.contains(&url) => post_urls.push(url),
            Some(_) => {}
            None => tracing::trace!("Ignoring archive link {}", href),
        }
    }

    ArchivePage {
        candidate_links: hrefs.len(),
        post_urls,
    }
}

fn select_hrefs(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
