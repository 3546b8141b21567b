//! Term frequency per publication year.
//!
//! Counts how often a term occurs in article body text, grouped by the
//! year string of each article. Every article participates, whatever
//! filters a report might apply elsewhere.

use itertools::Itertools;
use std::collections::BTreeMap;

use crate::utils::count_occurrences;
use crate::Corpus;

/// Occurrences of `term` per year string, over the space-joined body
/// paragraphs of every article.
///
/// Matching is case-insensitive and non-overlapping. Years without any
/// occurrence still appear with a count of 0, so the caller can tell "year
/// present, term absent" from "year absent". Articles without a date node
/// are grouped under [`crate::NO_YEAR`]. A blank term yields an empty map.
#[must_use]
pub fn term_frequency_by_year(corpus: &Corpus, term: &str) -> BTreeMap<String, usize> {
    let mut frequency_by_year = BTreeMap::new();
    if term.trim().is_empty() {
        return frequency_by_year;
    }

    for article in &corpus.articles {
        let body_text = article.body.iter().join(" ");
        let occurrences = count_occurrences(&body_text, term);
        *frequency_by_year.entry(article.year.clone()).or_insert(0) += occurrences;
    }
    frequency_by_year
}
