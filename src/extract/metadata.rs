//! Post metadata extraction
//!
//! Each field is resolved independently, structured data first:
//!
//! | Field | Structured data | Fallback |
//! |-------|-----------------|----------|
//! | title | `headline` | (content extractor, see `PostMetadata::resolve_title`) |
//! | author | `author.name` / `author[0].name` | `article:author_name`, `author` meta |
//! | published_date | `datePublished` | `article:published_time`, `og:published_time`, `cXenseParse:recs:publishtime` |
//! | tags | `keywords` (string or list) | repeated `article:tag` meta |

use crate::extract::PostMetadata;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::{Html, Selector};
use serde_json::Value;

/// Structured-data types preferred when the block holds a list
const ARTICLE_TYPES: &[&str] = &["NewsArticle", "Article"];

/// Extracts metadata from a post page
///
/// Never fails: malformed structured data is logged and extraction continues
/// with whatever the meta tags provide. The returned title may be empty;
/// resolving it is the caller's job.
///
/// # Example
///
/// ```
/// use substack_dl::extract::extract_metadata;
///
/// let html = r#"<html><head>
///   <script type="application/ld+json">{"headline":"T","author":{"name":"A"}}</script>
/// </head><body></body></html>"#;
/// let meta = extract_metadata(html, "https://example.com/p/t");
/// assert_eq!(meta.title.as_deref(), Some("T"));
/// assert_eq!(meta.author.as_deref(), Some("A"));
/// ```
pub fn extract_metadata(raw_html: &str, post_url: &str) -> PostMetadata {
    let document = Html::parse_document(raw_html);
    let mut metadata = PostMetadata::new(post_url);

    if let Some(data) = structured_data(&document, post_url) {
        apply_structured_data(&mut metadata, &data);
    }

    if metadata.author.is_none() {
        metadata.author = first_meta_content(
            &document,
            &[
                r#"meta[property="article:author_name"]"#,
                r#"meta[name="author"]"#,
            ],
        );
    }

    if metadata.published_date.is_none() {
        metadata.published_date = first_meta_content(
            &document,
            &[
                r#"meta[property="article:published_time"]"#,
                r#"meta[property="og:published_time"]"#,
                r#"meta[name="cXenseParse:recs:publishtime"]"#,
            ],
        );
    }

    metadata.published_date = metadata
        .published_date
        .take()
        .map(|raw| normalize_date_or_keep(raw, post_url));

    if metadata.tags.is_empty() {
        metadata.tags = all_meta_content(&document, r#"meta[property="article:tag"]"#);
    }

    metadata.tags.retain(|tag| !tag.is_empty());

    metadata
}

/// ISO-8601 date-times with a UTC offset, `T` or space separated
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// ISO-8601 date-times without an offset
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalizes a publish date to `YYYY-MM-DD`
///
/// Tries ISO-8601 forms first, then the long form used on rendered pages
/// ("Thursday, October 26, 2023"). Returns None if nothing matches.
///
/// # Examples
///
/// ```
/// use substack_dl::extract::normalize_date;
///
/// assert_eq!(normalize_date("2023-10-26T12:00:00.000Z").as_deref(), Some("2023-10-26"));
/// assert_eq!(normalize_date("Thursday, October 26, 2023").as_deref(), Some("2023-10-26"));
/// assert_eq!(normalize_date("sometime last week"), None);
/// ```
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            OFFSET_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(raw, "%A, %B %d, %Y").ok())?;

    Some(date.format("%Y-%m-%d").to_string())
}

fn normalize_date_or_keep(raw: String, post_url: &str) -> String {
    match normalize_date(&raw) {
        Some(date) => date,
        None => {
            tracing::warn!(
                "Could not parse date '{}' into YYYY-MM-DD for {}. Using original.",
                raw,
                post_url
            );
            raw
        }
    }
}

/// Finds and parses the first structured-data block
///
/// A list is narrowed to its first article-typed entry, or else its first
/// object entry.
fn structured_data(document: &Html, post_url: &str) -> Option<Value> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    let script = document.select(&selector).next()?;
    let text = script.text().collect::<String>();

    let parsed: Value = match serde_json::from_str(text.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Could not parse structured data for {}: {}", post_url, e);
            return None;
        }
    };

    match parsed {
        Value::Object(_) => Some(parsed),
        Value::Array(items) => {
            let article = items.iter().find(|item| {
                item.get("@type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| ARTICLE_TYPES.contains(&t))
            });
            article
                .or_else(|| items.first().filter(|item| item.is_object()))
                .cloned()
        }
        _ => None,
    }
}

fn apply_structured_data(metadata: &mut PostMetadata, data: &Value) {
    metadata.title = non_empty_str(data.get("headline"));

    metadata.author = match data.get("author") {
        Some(Value::Object(_)) => data.get("author").and_then(|a| non_empty_str(a.get("name"))),
        Some(Value::Array(authors)) => authors.first().and_then(|a| non_empty_str(a.get("name"))),
        _ => None,
    };

    metadata.published_date = non_empty_str(data.get("datePublished"));

    metadata.tags = match data.get("keywords") {
        Some(Value::String(keywords)) => keywords
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(keywords)) => keywords
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Returns the `content` of the first element matching any selector, in order
fn first_meta_content(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn all_meta_content(document: &Html, raw: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(raw) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
