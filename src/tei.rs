//! TEI-XML corpus parser implementation.
//!
//! Provides functionality to parse a TEI corpus into a [`Corpus`] of
//! articles and bibliography entries.
//!
//! # Example
//!
//! ```
//! use teilib::TeiParser;
//!
//! let input = r#"<teiCorpus xmlns="http://www.tei-c.org/ns/1.0">
//! <TEI>
//!   <teiHeader><fileDesc>
//!     <titleStmt><title>Example Title</title></titleStmt>
//!   </fileDesc></teiHeader>
//! </TEI>
//! </teiCorpus>"#;
//!
//! let corpus = TeiParser::new().parse(input).unwrap();
//! assert_eq!(corpus.articles[0].title, "Example Title");
//! assert_eq!(corpus.articles[0].year, "N/A");
//! ```

use nanoid::nanoid;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::BufRead;

use crate::{Article, BibEntry, Corpus, CorpusError, LanguageTexts, Result, NO_YEAR};

/// Parser for TEI-XML corpora.
///
/// Articles are read from `TEI` elements: the title from the
/// `teiHeader/fileDesc/titleStmt` chain, the year from the first `date`
/// element in document order, abstracts and keywords from the `p` children
/// of the correspondingly typed `div` elements, and body paragraphs from
/// every `p` under `body`. Bibliography entries are the `bibl` children of
/// any `listBibl`, aggregated corpus-wide.
///
/// Elements are matched by local name, so documents with or without an
/// explicit `tei:` prefix parse the same way.
#[derive(Debug, Clone, Default)]
pub struct TeiParser;

impl TeiParser {
    /// Creates a new TEI parser instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use teilib::TeiParser;
    /// let parser = TeiParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a string containing a TEI corpus.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError` if the input is empty, the XML is malformed,
    /// or an article lacks a title.
    pub fn parse(&self, input: &str) -> Result<Corpus> {
        if input.trim().is_empty() {
            return Err(CorpusError::InvalidXml("empty input".into()));
        }

        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut articles = Vec::new();
        let mut bibliography = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"TEI" => {
                    articles.push(parse_article(&mut reader, &mut buf, &mut bibliography)?);
                }
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"listBibl" => {
                    parse_bibliography(&mut reader, &mut buf, &mut bibliography)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(CorpusError::from(e)),
                _ => (),
            }
            buf.clear();
        }

        Ok(Corpus {
            articles,
            bibliography,
        })
    }
}

/// Kind of a `div` element, as far as article extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DivKind {
    Abstract,
    Keywords,
    Other,
}

fn div_kind(e: &BytesStart) -> Result<DivKind> {
    for attr in e.attributes() {
        let attr = attr.map_err(CorpusError::from)?;
        if attr.key.as_ref() == b"type" {
            let value = attr.unescape_value().map_err(CorpusError::from)?;
            return Ok(match value.as_ref() {
                "abstract" => DivKind::Abstract,
                "keywords" => DivKind::Keywords,
                _ => DivKind::Other,
            });
        }
    }
    Ok(DivKind::Other)
}

fn path_ends_with(path: &[Vec<u8>], suffix: &[&[u8]]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(name, expected)| name.as_slice() == *expected)
}

/// Routes one paragraph text to the sequences its context selects.
///
/// A `p` that is a direct child of an abstract or keywords `div` inside
/// `body` belongs to both that sequence and the body paragraphs.
fn store_paragraph(
    text: String,
    path: &[Vec<u8>],
    divs: &[DivKind],
    abstracts: &mut LanguageTexts,
    keywords: &mut LanguageTexts,
    body: &mut Vec<String>,
) {
    let in_body = path.iter().any(|name| name.as_slice() == b"body");
    if path.last().is_some_and(|name| name.as_slice() == b"div") {
        match divs.last() {
            Some(DivKind::Abstract) => abstracts.push(text.clone()),
            Some(DivKind::Keywords) => keywords.push(text.clone()),
            _ => (),
        }
    }
    if in_body {
        body.push(text);
    }
}

/// Parse a single `TEI` element into an [`Article`], appending any
/// bibliography entries found in its back matter to `bibliography`.
fn parse_article<B: BufRead>(
    reader: &mut Reader<B>,
    buf: &mut Vec<u8>,
    bibliography: &mut Vec<BibEntry>,
) -> Result<Article> {
    let mut title: Option<String> = None;
    let mut year: Option<String> = None;
    let mut abstracts = LanguageTexts::default();
    let mut keywords = LanguageTexts::default();
    let mut body = Vec::new();

    // Open ancestor elements within this TEI element, by local name.
    // Elements whose content is consumed wholesale (title, date, p, bibl)
    // are never pushed, so their closing tags do not reach this loop.
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut divs: Vec<DivKind> = Vec::new();

    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"title"
                        if title.is_none()
                            && path_ends_with(
                                &path,
                                &[b"teiHeader", b"fileDesc", b"titleStmt"],
                            ) =>
                    {
                        title = Some(extract_text(reader, buf, b"title")?);
                    }
                    b"date" => {
                        let text = extract_text(reader, buf, b"date")?;
                        if year.is_none() && !text.is_empty() {
                            year = Some(text);
                        }
                    }
                    b"p" => {
                        let text = extract_text(reader, buf, b"p")?;
                        store_paragraph(text, &path, &divs, &mut abstracts, &mut keywords, &mut body);
                    }
                    b"bibl" if path.last().is_some_and(|n| n.as_slice() == b"listBibl") => {
                        let text = extract_text(reader, buf, b"bibl")?;
                        bibliography.push(BibEntry::from_text(text));
                    }
                    b"div" => {
                        divs.push(div_kind(e)?);
                        path.push(name);
                    }
                    _ => path.push(name),
                }
            }
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"title"
                    if title.is_none()
                        && path_ends_with(&path, &[b"teiHeader", b"fileDesc", b"titleStmt"]) =>
                {
                    title = Some(String::new());
                }
                b"p" => store_paragraph(
                    String::new(),
                    &path,
                    &divs,
                    &mut abstracts,
                    &mut keywords,
                    &mut body,
                ),
                b"bibl" if path.last().is_some_and(|n| n.as_slice() == b"listBibl") => {
                    bibliography.push(BibEntry { text: None });
                }
                _ => (),
            },
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"TEI" {
                    break;
                }
                if e.local_name().as_ref() == b"div" {
                    divs.pop();
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CorpusError::from(e)),
            _ => (),
        }
        buf.clear();
    }

    let title = title.ok_or_else(|| CorpusError::MissingField("title".to_string()))?;

    Ok(Article {
        id: nanoid!(),
        title,
        year: year.unwrap_or_else(|| NO_YEAR.to_string()),
        abstracts,
        keywords,
        body,
    })
}

/// Parse the `bibl` children of a `listBibl` element outside any article.
fn parse_bibliography<B: BufRead>(
    reader: &mut Reader<B>,
    buf: &mut Vec<u8>,
    bibliography: &mut Vec<BibEntry>,
) -> Result<()> {
    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"bibl" => {
                let text = extract_text(reader, buf, b"bibl")?;
                bibliography.push(BibEntry::from_text(text));
            }
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"bibl" => {
                bibliography.push(BibEntry { text: None });
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"listBibl" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(CorpusError::from(e)),
            _ => (),
        }
        buf.clear();
    }
    Ok(())
}

/// Extracts text content from XML events until the closing tag is found.
fn extract_text<B: BufRead>(
    reader: &mut Reader<B>,
    buf: &mut Vec<u8>,
    closing_tag: &[u8],
) -> Result<String> {
    let mut text = String::new();

    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Text(e)) => {
                text.push_str(&e.unescape().map_err(|e| {
                    CorpusError::InvalidXml(format!("invalid XML text content: {}", e))
                })?);
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == closing_tag => break,
            Ok(Event::Eof) => {
                return Err(CorpusError::InvalidXml(format!(
                    "unexpected EOF while looking for closing tag '{}'",
                    String::from_utf8_lossy(closing_tag)
                )));
            }
            Err(e) => return Err(CorpusError::from(e)),
            _ => continue,
        }
        buf.clear();
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Language;
    use pretty_assertions::assert_eq;

    const CORPUS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<teiCorpus xmlns="http://www.tei-c.org/ns/1.0">
  <TEI>
    <teiHeader>
      <fileDesc>
        <titleStmt><title>Analyse automatique du discours</title></titleStmt>
        <publicationStmt><date>2014</date></publicationStmt>
      </fileDesc>
    </teiHeader>
    <text>
      <body>
        <div type="abstract">
          <p>Nous proposons une analyse du discours.</p>
          <p>We propose a discourse analysis.</p>
        </div>
        <div type="keywords">
          <p>discours, analyse</p>
          <p>discourse, analysis</p>
        </div>
        <p>Le discours oral est segmente puis annote.</p>
      </body>
      <back>
        <listBibl>
          <bibl>Tanguy, L. (2012) Outils TAL.</bibl>
        </listBibl>
      </back>
    </text>
  </TEI>
  <TEI>
    <teiHeader>
      <fileDesc>
        <titleStmt><title>Segmentation thematique</title></titleStmt>
      </fileDesc>
    </teiHeader>
    <text>
      <body>
        <div type="abstract"><p>Un seul resume.</p></div>
        <p>La segmentation est evaluee.</p>
      </body>
    </text>
  </TEI>
  <listBibl>
    <bibl>Dupont, M. &amp; Martin, P. (2001) Grammaires.
Durand, C. (1999) Lexiques.</bibl>
    <bibl/>
  </listBibl>
</teiCorpus>"#;

    #[test]
    fn test_parse_corpus_articles() {
        let corpus = TeiParser::new().parse(CORPUS).unwrap();
        assert_eq!(corpus.articles.len(), 2);

        let first = &corpus.articles[0];
        assert_eq!(first.title, "Analyse automatique du discours");
        assert_eq!(first.year, "2014");
        assert_eq!(
            first.abstracts.get(Language::Primary),
            Some("Nous proposons une analyse du discours.")
        );
        assert_eq!(
            first.abstracts.get(Language::Secondary),
            Some("We propose a discourse analysis.")
        );
        assert_eq!(first.keywords.joined(), "discours, analyse discourse, analysis");
    }

    #[test]
    fn test_missing_date_yields_na_year() {
        let corpus = TeiParser::new().parse(CORPUS).unwrap();
        assert_eq!(corpus.articles[1].year, "N/A");
    }

    #[test]
    fn test_single_abstract_is_primary_language() {
        let corpus = TeiParser::new().parse(CORPUS).unwrap();
        let second = &corpus.articles[1];
        assert_eq!(second.abstracts.len(), 1);
        let tagged: Vec<_> = second.abstracts.iter().collect();
        assert_eq!(tagged, vec![(Language::Primary, "Un seul resume.")]);
    }

    #[test]
    fn test_body_includes_abstract_and_keyword_paragraphs() {
        // Abstract and keyword divs sit inside body, so their paragraphs
        // appear both in their own sequence and among the body paragraphs.
        let corpus = TeiParser::new().parse(CORPUS).unwrap();
        let first = &corpus.articles[0];
        assert_eq!(first.body.len(), 5);
        assert_eq!(first.body[4], "Le discours oral est segmente puis annote.");
    }

    #[test]
    fn test_bibliography_aggregated_across_document() {
        let corpus = TeiParser::new().parse(CORPUS).unwrap();
        // One entry in the first article's back matter, two in the trailing
        // corpus-level list (one of which is empty).
        assert_eq!(corpus.bibliography.len(), 3);
        assert_eq!(
            corpus.bibliography[0].text.as_deref(),
            Some("Tanguy, L. (2012) Outils TAL.")
        );
        assert_eq!(corpus.bibliography[2].text, None);
    }

    #[test]
    fn test_multiline_bibl_text_preserves_newlines() {
        let corpus = TeiParser::new().parse(CORPUS).unwrap();
        let text = corpus.bibliography[1].text.as_deref().unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Dupont, M. & Martin, P. (2001)"));
    }

    #[test]
    fn test_empty_paragraph_kept_as_empty_string() {
        let input = r#"<teiCorpus>
          <TEI>
            <teiHeader><fileDesc><titleStmt><title>T</title></titleStmt></fileDesc></teiHeader>
            <text><body>
              <div type="abstract"><p/><p>English abstract.</p></div>
            </body></text>
          </TEI>
        </teiCorpus>"#;
        let corpus = TeiParser::new().parse(input).unwrap();
        let abstracts = &corpus.articles[0].abstracts;
        assert_eq!(abstracts.len(), 2);
        assert_eq!(abstracts.get(Language::Primary), Some(""));
        assert_eq!(abstracts.get(Language::Secondary), Some("English abstract."));
    }

    #[test]
    fn test_header_bibl_is_not_a_bibliography_entry() {
        let input = r#"<teiCorpus>
          <TEI>
            <teiHeader><fileDesc>
              <titleStmt><title>T</title></titleStmt>
              <sourceDesc><bibl>Proceedings volume, 2014.</bibl></sourceDesc>
            </fileDesc></teiHeader>
          </TEI>
        </teiCorpus>"#;
        let corpus = TeiParser::new().parse(input).unwrap();
        assert_eq!(corpus.bibliography.len(), 0);
    }

    #[test]
    fn test_prefixed_element_names() {
        let input = r#"<tei:teiCorpus xmlns:tei="http://www.tei-c.org/ns/1.0">
          <tei:TEI>
            <tei:teiHeader><tei:fileDesc><tei:titleStmt>
              <tei:title>Prefixed</tei:title>
            </tei:titleStmt></tei:fileDesc></tei:teiHeader>
          </tei:TEI>
        </tei:teiCorpus>"#;
        let corpus = TeiParser::new().parse(input).unwrap();
        assert_eq!(corpus.articles[0].title, "Prefixed");
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let input = r#"<teiCorpus>
          <TEI><teiHeader><fileDesc/></teiHeader></TEI>
        </teiCorpus>"#;
        let result = TeiParser::new().parse(input);
        assert!(matches!(result, Err(CorpusError::MissingField(_))));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(TeiParser::new().parse("   ").is_err());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let input = r#"<teiCorpus><TEI><teiHeader><title>Broken"#;
        assert!(TeiParser::new().parse(input).is_err());
    }

    #[test]
    fn test_reload_is_deterministic() {
        let first = TeiParser::new().parse(CORPUS).unwrap();
        let second = TeiParser::new().parse(CORPUS).unwrap();

        let view = |corpus: &Corpus| {
            corpus
                .articles
                .iter()
                .map(|a| (a.title.clone(), a.year.clone(), a.keywords.joined()))
                .collect::<Vec<_>>()
        };
        assert_eq!(view(&first), view(&second));
        assert_eq!(first.bibliography, second.bibliography);
    }
}
