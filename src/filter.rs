//! Article filtering by publication year and required keywords.
//!
//! # Example
//!
//! ```
//! use teilib::FilterCriteria;
//!
//! let criteria = FilterCriteria::new()
//!     .with_year("2014")
//!     .with_keyword("corpus");
//! assert!(!criteria.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::{Article, Corpus, LanguageTexts};

/// Inclusion criteria for articles.
///
/// Both checks must pass for an article to be included:
///
/// - **Year**: exact string equality against the article's year, including
///   the literal `"N/A"` recorded for articles without a date node. No
///   criterion admits every year.
/// - **Keywords**: every requested keyword must appear as a
///   case-insensitive substring of the article's keyword texts joined
///   across languages. An empty set admits every article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    year: Option<String>,
    keywords: Vec<String>,
}

impl FilterCriteria {
    /// Creates criteria that admit every article.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the article year to equal `year` exactly.
    #[must_use]
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Requires `keyword` to appear in the article's keyword texts.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Requires every keyword in `keywords` to appear.
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Whether these criteria constrain anything at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.keywords.is_empty()
    }

    /// Decides inclusion of `article`.
    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        self.matches_year(&article.year) && self.matches_keywords(&article.keywords)
    }

    fn matches_year(&self, year: &str) -> bool {
        self.year.as_deref().is_none_or(|wanted| wanted == year)
    }

    fn matches_keywords(&self, keywords: &LanguageTexts) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let haystack = keywords.joined().to_lowercase();
        self.keywords
            .iter()
            .all(|keyword| haystack.contains(&keyword.to_lowercase()))
    }
}

impl Corpus {
    /// Articles matching `criteria`, in document order.
    ///
    /// An empty result is not an error; report rendering surfaces the
    /// explicit no-results message.
    #[must_use]
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|article| criteria.matches(article))
            .collect()
    }
}
