//! Booklet rendering of filtered articles.
//!
//! Writes the title, year, and per-language abstract and keyword lines of
//! every article matching a filter to any [`std::io::Write`] destination:
//! standard output and an appended text file share the same code path.

use std::io::Write;
use std::str::FromStr;

use crate::{Corpus, CorpusError, FilterCriteria, Language, Result};

/// Which languages a report includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LanguageFilter {
    /// Every language.
    #[default]
    All,
    /// Only the given language.
    Only(Language),
}

impl LanguageFilter {
    /// Whether texts in `language` should be rendered.
    #[must_use]
    pub fn admits(self, language: Language) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Only(wanted) => wanted == language,
        }
    }
}

impl FromStr for LanguageFilter {
    type Err = CorpusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(LanguageFilter::Only(Language::Primary)),
            "en" => Ok(LanguageFilter::Only(Language::Secondary)),
            "all" | "" => Ok(LanguageFilter::All),
            other => Err(CorpusError::InvalidOption(format!(
                "unknown language '{other}', expected 'fr', 'en' or 'all'"
            ))),
        }
    }
}

/// Renders the articles matching `criteria` to `out` and returns how many
/// were written.
///
/// When nothing matches, an explicit no-results line is written instead of
/// an empty report. Empty abstract or keyword texts are skipped on output.
///
/// # Errors
///
/// Returns `CorpusError::Io` if writing to `out` fails.
pub fn write_booklet<W: Write>(
    corpus: &Corpus,
    criteria: &FilterCriteria,
    language: LanguageFilter,
    out: &mut W,
) -> Result<usize> {
    let matched = corpus.filter(criteria);
    if matched.is_empty() {
        writeln!(out, "No articles matched the given criteria.")?;
        return Ok(0);
    }

    for article in &matched {
        writeln!(out, "Title: {}", article.title)?;
        writeln!(out, "Year: {}", article.year)?;
        for (lang, text) in article.abstracts.iter() {
            if language.admits(lang) && !text.is_empty() {
                writeln!(out, "Abstract ({}): {}", lang.code(), text)?;
            }
        }
        for (lang, text) in article.keywords.iter() {
            if language.admits(lang) && !text.is_empty() {
                writeln!(out, "Keywords ({}): {}", lang.code(), text)?;
            }
        }
        writeln!(out)?;
    }

    Ok(matched.len())
}
