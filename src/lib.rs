//! A library for extracting, filtering, and analyzing bibliographic article
//! records from TEI-XML corpora.
//!
//! `teilib` parses a TEI corpus into an in-memory [`Corpus`] of articles and
//! free-text bibliography entries, then offers the analyses an abstract
//! booklet or citation report is built from.
//!
//! # Key Features
//!
//! - **TEI corpus loading**: one [`Article`] per `TEI` element (title, year,
//!   per-language abstracts and keywords, body paragraphs), with bibliography
//!   entries collected from every `listBibl`.
//! - **Multi-criterion filtering**: optional exact-match year plus required
//!   keyword substrings, combined with logical AND.
//! - **Citation counting**: heuristic parsing of free-text bibliography
//!   entries, both for a single named author and as a census of every author
//!   token with a ranking view.
//! - **Term frequency**: occurrences of a term per publication year, over
//!   article body text.
//!
//! # Basic Usage
//!
//! ```rust
//! use teilib::{FilterCriteria, TeiParser};
//!
//! let input = r#"<teiCorpus xmlns="http://www.tei-c.org/ns/1.0">
//! <TEI>
//!   <teiHeader><fileDesc>
//!     <titleStmt><title>Analyse syntaxique du corpus oral</title></titleStmt>
//!     <publicationStmt><date>2014</date></publicationStmt>
//!   </fileDesc></teiHeader>
//!   <text>
//!     <body>
//!       <div type="abstract"><p>Nous analysons le corpus.</p><p>We analyze the corpus.</p></div>
//!       <div type="keywords"><p>analyse, corpus</p><p>parsing, corpus</p></div>
//!       <p>Le corpus oral est analyse en detail.</p>
//!     </body>
//!     <back><listBibl><bibl>Tanguy, L. (2012) Outils TAL.</bibl></listBibl></back>
//!   </text>
//! </TEI>
//! </teiCorpus>"#;
//!
//! let corpus = TeiParser::new().parse(input).unwrap();
//! assert_eq!(corpus.articles.len(), 1);
//! assert_eq!(corpus.articles[0].year, "2014");
//!
//! let criteria = FilterCriteria::new().with_year("2014").with_keyword("PARSING");
//! assert_eq!(corpus.filter(&criteria).len(), 1);
//!
//! assert_eq!(corpus.count_citations("tanguy"), 1);
//! ```
//!
//! # Language Convention
//!
//! The corpora this crate targets carry abstracts and keywords in up to two
//! languages without per-paragraph language tags; identity is positional.
//! [`LanguageTexts`] makes that convention explicit: the first text in
//! document order is [`Language::Primary`] ("fr"), every later one
//! [`Language::Secondary`] ("en"). A sequence with a single entry therefore
//! always denotes the primary language.
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type that wraps [`CorpusError`].
//! Only document loading is fatal; missing optional fields (no date node, no
//! abstract in a language, empty bibliography text) are absent values, not
//! errors.

use itertools::Itertools;
use quick_xml::events::attributes::AttrError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub mod census;
pub mod citations;
pub mod filter;
pub mod report;
pub mod tei;
pub mod term_freq;

mod regex;
mod utils;

// Reexports
pub use census::{AuthorCensus, SortOrder};
pub use citations::count_citations;
pub use filter::FilterCriteria;
pub use report::{write_booklet, LanguageFilter};
pub use tei::TeiParser;
pub use term_freq::term_frequency_by_year;

/// A specialized Result type for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Year string recorded for articles without a date node.
pub const NO_YEAR: &str = "N/A";

/// Represents errors that can occur while loading or analyzing a corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    InvalidXml(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl From<quick_xml::Error> for CorpusError {
    fn from(err: quick_xml::Error) -> Self {
        CorpusError::InvalidXml(err.to_string())
    }
}

impl From<AttrError> for CorpusError {
    fn from(err: AttrError) -> Self {
        CorpusError::InvalidXml(err.to_string())
    }
}

/// Language of a positional text entry.
///
/// The TEI corpora this crate targets list abstract and keyword paragraphs
/// in a fixed order rather than tagging each one: first the primary language
/// ("fr"), then the secondary language ("en").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Primary,
    Secondary,
}

impl Language {
    /// The two-letter code reports use for this language.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Language::Primary => "fr",
            Language::Secondary => "en",
        }
    }

    /// Maps a document-order position to its language: position 0 is the
    /// primary language, every later position the secondary one.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index == 0 {
            Language::Primary
        } else {
            Language::Secondary
        }
    }
}

/// An ordered sequence of per-language text values.
///
/// Entries keep document order; a matched-but-empty node is kept as an empty
/// string, while missing nodes are simply absent. Language identity follows
/// [`Language::from_index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTexts {
    texts: Vec<String>,
}

impl LanguageTexts {
    pub fn push(&mut self, text: impl Into<String>) {
        self.texts.push(text.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// The text recorded for `language`, if present.
    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        let index = match language {
            Language::Primary => 0,
            Language::Secondary => 1,
        };
        self.texts.get(index).map(String::as_str)
    }

    /// Iterates over `(language, text)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
        self.texts
            .iter()
            .enumerate()
            .map(|(i, text)| (Language::from_index(i), text.as_str()))
    }

    /// All entries joined with a single space, regardless of language.
    #[must_use]
    pub fn joined(&self) -> String {
        self.texts.iter().join(" ")
    }
}

impl From<Vec<String>> for LanguageTexts {
    fn from(texts: Vec<String>) -> Self {
        Self { texts }
    }
}

/// A single article extracted from a `TEI` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    /// Title of the article
    pub title: String,
    /// Publication year as written in the document, or [`NO_YEAR`]
    pub year: String,
    /// Abstract paragraphs, one per language
    pub abstracts: LanguageTexts,
    /// Keyword paragraphs, one per language
    pub keywords: LanguageTexts,
    /// Body paragraph texts in document order
    pub body: Vec<String>,
}

/// A free-text bibliography entry.
///
/// An entry may contain several newline-delimited citation lines; no
/// structure beyond the raw text is parsed at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
    /// Raw entry text; `None` for entries without any text content.
    pub text: Option<String>,
}

impl BibEntry {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub(crate) fn from_text(text: String) -> Self {
        Self {
            text: (!text.is_empty()).then_some(text),
        }
    }
}

/// Root of a parsed TEI corpus.
///
/// Created once by [`TeiParser::parse`] or [`Corpus::from_path`] and
/// read-only thereafter; every analysis takes the corpus as an explicit
/// input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub articles: Vec<Article>,
    pub bibliography: Vec<BibEntry>,
}

impl Corpus {
    /// Loads and parses the TEI document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` if the file cannot be read or the XML is
    /// malformed; load failure is fatal to the session.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        TeiParser::new().parse(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_error_display() {
        let error = CorpusError::InvalidXml("unexpected element".to_string());
        assert_eq!(error.to_string(), "XML error: unexpected element");

        let error = CorpusError::MissingField("title".to_string());
        assert_eq!(error.to_string(), "Missing required field: title");
    }

    #[test]
    fn test_language_from_index() {
        assert_eq!(Language::from_index(0), Language::Primary);
        assert_eq!(Language::from_index(1), Language::Secondary);
        // Positions past the second are still read as the secondary language.
        assert_eq!(Language::from_index(5), Language::Secondary);
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Primary.code(), "fr");
        assert_eq!(Language::Secondary.code(), "en");
    }

    #[test]
    fn test_language_texts_single_entry_is_primary() {
        let mut texts = LanguageTexts::default();
        texts.push("Résumé en français.");

        let tagged: Vec<_> = texts.iter().collect();
        assert_eq!(tagged, vec![(Language::Primary, "Résumé en français.")]);
        assert_eq!(texts.get(Language::Secondary), None);
    }

    #[test]
    fn test_language_texts_joined() {
        let texts = LanguageTexts::from(vec!["analyse, corpus".to_string(), "parsing".to_string()]);
        assert_eq!(texts.joined(), "analyse, corpus parsing");
        assert_eq!(LanguageTexts::default().joined(), "");
    }

    #[test]
    fn test_language_texts_keeps_empty_entries() {
        let texts = LanguageTexts::from(vec![String::new(), "english only".to_string()]);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts.get(Language::Primary), Some(""));
        assert_eq!(texts.get(Language::Secondary), Some("english only"));
    }

    #[test]
    fn test_bib_entry_from_text_empty_is_none() {
        assert_eq!(BibEntry::from_text(String::new()).text, None);
        assert_eq!(
            BibEntry::from_text("Smith (2020)".to_string()).text.as_deref(),
            Some("Smith (2020)")
        );
    }
}
