//! Census of every author cited in the bibliography.
//!
//! Each bibliography entry is read line by line; lines carrying a "(YYYY)"
//! year marker are truncated to their author-list prefix, split into
//! candidate author tokens, and aggregated by exact token text. Unlike the
//! single-author counter, no case folding or punctuation normalization is
//! applied: "Smith, J." and "smith j" are distinct census keys.
//!
//! # Example
//!
//! ```
//! use teilib::{AuthorCensus, BibEntry, SortOrder};
//!
//! let entries = vec![BibEntry::new(
//!     "Smith, J. (2020) One.\nSmith, J. (2019) Two.\nJones, K. (2019) Other.",
//! )];
//! let census = AuthorCensus::from_entries(&entries);
//!
//! assert_eq!(
//!     census.ranked(SortOrder::Descending, Some(1)),
//!     vec![("Smith, J.", 2)]
//! );
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use compact_str::CompactString;
use itertools::Itertools;

use crate::regex::Regex;
use crate::{BibEntry, Corpus, CorpusError};

// A parenthesized four-digit year anywhere in the line marks it as a
// citation line.
static YEAR_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d{4}\)").unwrap());

// Everything from the first whitespace-then-open-parenthesis onward is the
// year and title; what precedes it is the author-list prefix.
static TRUNCATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s\(.+").unwrap());

/// Requested ranking direction for census views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(CorpusError::InvalidOption(format!(
                "unknown sort order '{other}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// Occurrence counts of candidate author tokens, in first-seen order.
///
/// Tokens are exactly the trimmed fragments the tokenizer produced; no
/// entity resolution is attempted, so variant spellings of one author are
/// counted separately.
#[derive(Debug, Clone, Default)]
pub struct AuthorCensus {
    counts: HashMap<CompactString, usize>,
    order: Vec<CompactString>,
}

impl AuthorCensus {
    /// Builds the census over `entries`.
    ///
    /// Entries without text are skipped; so are blank lines, lines without
    /// a year marker, and fragments of fewer than two words (bare initials
    /// and stray surnames).
    #[must_use]
    pub fn from_entries(entries: &[BibEntry]) -> Self {
        let mut census = Self::default();
        for text in entries.iter().filter_map(|entry| entry.text.as_deref()) {
            census.add_entry(text);
        }
        census
    }

    fn add_entry(&mut self, text: &str) {
        for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            if !YEAR_MARKER_RE.is_match(line) {
                continue;
            }
            let prefix = TRUNCATE_RE.replace(line, "");
            for fragment in split_author_tokens(&prefix) {
                let fragment = fragment.trim();
                if fragment.split_whitespace().count() < 2 {
                    continue;
                }
                self.record(fragment);
            }
        }
    }

    fn record(&mut self, token: &str) {
        if let Some(count) = self.counts.get_mut(token) {
            *count += 1;
        } else {
            let key = CompactString::from(token);
            self.order.push(key.clone());
            self.counts.insert(key, 1);
        }
    }

    /// Number of distinct author tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Occurrence count for an exact token, 0 if never seen.
    #[must_use]
    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Iterates over `(token, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order
            .iter()
            .map(|token| (token.as_str(), self.counts[token.as_str()]))
    }

    /// Tokens ranked by count.
    ///
    /// The sort is stable, so tokens with equal counts keep first-seen
    /// order. `top_n` truncates the view; `None` returns every token.
    #[must_use]
    pub fn ranked(&self, order: SortOrder, top_n: Option<usize>) -> Vec<(&str, usize)> {
        let ranked = match order {
            SortOrder::Ascending => self.iter().sorted_by(|a, b| a.1.cmp(&b.1)),
            SortOrder::Descending => self.iter().sorted_by(|a, b| b.1.cmp(&a.1)),
        };
        match top_n {
            Some(n) => ranked.take(n).collect(),
            None => ranked.collect(),
        }
    }
}

impl Corpus {
    /// Builds the author census over this corpus's bibliography.
    ///
    /// See [`AuthorCensus::from_entries`].
    #[must_use]
    pub fn author_census(&self) -> AuthorCensus {
        AuthorCensus::from_entries(&self.bibliography)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `rest` opens with the space-capital-period shape of an initial,
/// e.g. the " J." of "Smith, J.".
fn initial_follows(rest: &[char]) -> bool {
    rest.len() >= 3 && rest[0].is_whitespace() && rest[1].is_ascii_uppercase() && rest[2] == '.'
}

/// Length of a standalone "et"/"and" conjunction starting at `i`, if any.
fn conjunction_at(chars: &[char], i: usize) -> Option<usize> {
    if i > 0 && is_word_char(chars[i - 1]) {
        return None;
    }
    for word in ["and", "et"] {
        let len = word.len();
        if chars[i..].len() >= len
            && chars[i..i + len].iter().copied().eq(word.chars())
            && chars.get(i + len).is_none_or(|c| !is_word_char(*c))
        {
            return Some(len);
        }
    }
    None
}

/// Splits an author-list prefix into candidate author fragments.
///
/// The scanner treats standalone "&" and word-bounded "et"/"and" as
/// delimiters. A comma is also a delimiter, except when immediately
/// followed by an initial (" J."), which keeps "Smith, J." together as one
/// fragment while "Smith, Jones" still splits in two. Fragments are
/// returned untrimmed and possibly empty; the caller filters.
pub(crate) fn split_author_tokens(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '&' {
            tokens.push(std::mem::take(&mut current));
            i += 1;
        } else if c == ',' {
            if initial_follows(&chars[i + 1..]) {
                current.push(c);
            } else {
                tokens.push(std::mem::take(&mut current));
            }
            i += 1;
        } else if let Some(len) = conjunction_at(&chars, i) {
            tokens.push(std::mem::take(&mut current));
            i += len;
        } else {
            current.push(c);
            i += 1;
        }
    }
    tokens.push(current);
    tokens
}
