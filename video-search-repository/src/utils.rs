//! Utility functions for the video search repository.

/// Escape the wildcard metacharacters `*`, `?` and `\` so the term matches literally.
///
/// # Example
///
/// ```
/// use video_search_repository::escape_wildcard;
///
/// assert_eq!(escape_wildcard("c*t?"), "c\\*t\\?");
/// ```
pub fn escape_wildcard(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the `*term*` wildcard pattern for a case-insensitive substring match.
///
/// The term is expected to be normalized already (trimmed and lower-cased).
pub fn substring_pattern(term: &str) -> String {
    format!("*{}*", escape_wildcard(term))
}
