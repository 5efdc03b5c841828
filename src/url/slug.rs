/// Converts arbitrary text into a lowercase, hyphen-separated slug
///
/// ASCII letters and digits are kept (lowercased); every other run of
/// characters collapses into a single `-`. Leading and trailing separators
/// are trimmed, so the result may be empty.
///
/// # Examples
///
/// ```
/// use substack_dl::url::slugify;
///
/// assert_eq!(slugify("Mock Post Title"), "mock-post-title");
/// assert_eq!(slugify("  What's new? (2023)  "), "what-s-new-2023");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
