use crate::regex::Regex;
use std::sync::LazyLock;

static PUNCTUATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Removes every punctuation character (anything that is neither a word
/// character nor whitespace).
pub(crate) fn strip_punctuation(text: &str) -> String {
    PUNCTUATION_RE.replace_all(text, "").into_owned()
}

/// Normalizes an author-list string for matching: punctuation becomes a
/// space, whitespace runs collapse to one space, and the result is
/// lowercased.
pub(crate) fn normalize_author_list(text: &str) -> String {
    let spaced = PUNCTUATION_RE.replace_all(text, " ");
    WHITESPACE_RE.replace_all(&spaced, " ").to_lowercase()
}

/// Counts non-overlapping, case-insensitive occurrences of `needle` in
/// `haystack`. A blank needle never matches.
pub(crate) fn count_occurrences(haystack: &str, needle: &str) -> usize {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().match_indices(&needle).count()
}
