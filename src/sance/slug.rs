/// Longest slug (in characters) used as a cache file name.
pub const MAX_SLUG_LEN: usize = 250;

/// Cache key for an utterance, cut to [`MAX_SLUG_LEN`].
pub fn slugify(text: &str) -> String {
    slugify_with_limit(text, MAX_SLUG_LEN)
}

/// Spaces become `_`; dots and path separators are dropped; the result is
/// truncated to `limit` characters.
pub fn slugify_with_limit(text: &str, limit: usize) -> String {
    text.chars()
        .filter(|c| !matches!(c, '.' | '/' | '\\' | '\0'))
        .map(|c| if c == ' ' { '_' } else { c })
        .take(limit)
        .collect()
}
