//! Citation counting for a single named author.
//!
//! Bibliography entries are free text, so author matching is heuristic:
//! the author list is the text before the first open parenthesis, and the
//! query matches if it is a substring of any author token after both sides
//! are stripped of punctuation and lowercased.
//!
//! # Example
//!
//! ```
//! use teilib::{count_citations, BibEntry};
//!
//! let entries = vec![BibEntry::new("Smith, J. & Doe, A. (2020) Title.")];
//! assert_eq!(count_citations("Smith", &entries), 1);
//! assert_eq!(count_citations("zzz", &entries), 0);
//! ```

use std::sync::LazyLock;

use crate::regex::Regex;
use crate::utils::{normalize_author_list, strip_punctuation};
use crate::{BibEntry, Corpus};

// Hard delimiters between author names. Deliberately not word-bounded:
// "et"/"and" split wherever they occur, and punctuation has already been
// replaced by spaces when this runs.
static AUTHOR_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&|,|et|and").unwrap());

/// Counts the bibliography entries citing `author_name`.
///
/// Each entry counts at most once, however many of its author tokens
/// match. Entries without text are skipped; no match anywhere yields 0.
///
/// The match is a substring test over normalized tokens, so a short query
/// can spuriously match a longer unrelated name ("li" matches inside
/// "lim"). That over-counting is a known limitation of the heuristic, kept
/// deliberately: tightening to word-boundary semantics would change
/// observable counts.
#[must_use]
pub fn count_citations(author_name: &str, entries: &[BibEntry]) -> usize {
    let query = strip_punctuation(&author_name.to_lowercase());

    entries
        .iter()
        .filter_map(|entry| entry.text.as_deref())
        .filter(|text| entry_cites(text, &query))
        .count()
}

/// Whether one entry's author-list prefix contains the normalized query.
fn entry_cites(text: &str, query: &str) -> bool {
    let authors_part = match text.find('(') {
        Some(index) => text[..index].trim(),
        None => text.trim(),
    };
    let normalized = normalize_author_list(authors_part);

    AUTHOR_SPLIT_RE
        .split(&normalized)
        .map(str::trim)
        .any(|token| token.contains(query))
}

impl Corpus {
    /// Counts the bibliography entries citing `author_name`.
    ///
    /// See [`count_citations`].
    #[must_use]
    pub fn count_citations(&self, author_name: &str) -> usize {
        count_citations(author_name, &self.bibliography)
    }
}
