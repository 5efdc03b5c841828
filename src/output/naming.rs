//! Output file naming: `{YYYYMMDD}_{slug}.{ext}`

use crate::output::OutputFormat;
use chrono::NaiveDate;

/// Builds the `YYYYMMDD` filename prefix from a publish date
///
/// Takes the part before any `T`; a valid `YYYY-MM-DD` is reformatted, a
/// three-part dashed string of eight digits has its dashes removed, and
/// everything else (including a missing date) falls back to `today`. The
/// result is always eight ASCII digits.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use substack_dl::output::date_prefix;
///
/// let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
/// assert_eq!(date_prefix(Some("2023-01-01"), today), "20230101");
/// assert_eq!(date_prefix(Some("2023-01-01T08:00:00Z"), today), "20230101");
/// assert_eq!(date_prefix(None, today), "20240506");
/// ```
pub fn date_prefix(published_date: Option<&str>, today: NaiveDate) -> String {
    let Some(raw) = published_date.map(str::trim).filter(|d| !d.is_empty()) else {
        return today.format("%Y%m%d").to_string();
    };

    let day_part = raw.split('T').next().unwrap_or(raw);
    if let Ok(date) = NaiveDate::parse_from_str(day_part, "%Y-%m-%d") {
        return date.format("%Y%m%d").to_string();
    }

    if raw.split('-').count() == 3 {
        let compact = raw.replace('-', "");
        if compact.len() == 8 && compact.bytes().all(|b| b.is_ascii_digit()) {
            return compact;
        }
    }

    tracing::warn!(
        "Could not reliably format date '{}' for a filename. Using current date.",
        raw
    );
    today.format("%Y%m%d").to_string()
}

/// Builds the output filename for one format of one post
pub fn output_filename(prefix: &str, slug: &str, format: OutputFormat) -> String {
    format!("{}_{}.{}", prefix, slug, format.extension())
}
