use crate::extract::PostContent;
use scraper::{Html, Selector};

/// Maps a raw post page to its readable article fragment
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, html: &str) -> PostContent;
}

/// Containers tried in order when looking for the article body
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".available-content",
    ".post-content",
    "main",
    "body",
];

/// Lightweight "readability-like" extractor:
/// - pulls `<title>` text if present
/// - returns the inner markup of the first matching content container
///   (`article`, `.available-content`, `.post-content`, `main`, `body`)
/// - falls back to the full document markup
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadabilityLikeExtractor;

impl ContentExtractor for ReadabilityLikeExtractor {
    fn extract(&self, html: &str) -> PostContent {
        let doc = Html::parse_document(html);

        let extracted_title = Selector::parse("title")
            .ok()
            .and_then(|sel| {
                doc.select(&sel)
                    .next()
                    .map(|t| t.text().collect::<String>().trim().to_string())
            })
            .filter(|t| !t.is_empty());

        let html_fragment = CONTENT_SELECTORS
            .iter()
            .filter_map(|raw| Selector::parse(raw).ok())
            .find_map(|sel| doc.select(&sel).next().map(|node| node.inner_html()))
            .unwrap_or_else(|| doc.root_element().html());

        PostContent {
            html_fragment,
            extracted_title,
        }
    }
}
