use std::borrow::Cow;
use std::sync::Arc;

use bible_db::Library;
use bible_text::normalize;
use bible_types::{BookCounts, Corpus, SearchMode, VerseMatch};
use tracing::info;

use crate::report::CountTable;

/// A normalized search term bound to a match mode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Matcher {
    term: String,
    mode: SearchMode,
}

impl Matcher {
    /// Normalize `term` once. Blank terms never match and yield `None`.
    pub fn new(term: &str, mode: SearchMode) -> Option<Self> {
        let term = normalize(term);
        if term.trim().is_empty() {
            return None;
        }
        Some(Self { term, mode })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Occurrences in already-normalized text.
    ///
    /// Substring mode counts non-overlapping occurrences scanning left to
    /// right; exact mode counts word tokens equal to the term.
    pub fn count(&self, normalized: &str) -> usize {
        match self.mode {
            SearchMode::Substring => normalized.matches(self.term.as_str()).count(),
            SearchMode::Exact => words(normalized).filter(|w| *w == self.term).count(),
        }
    }
}

/// Maximal runs of word characters: Unicode letters, digits and `_`.
pub fn words(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split(|c: char| !is_word_char(c))
        .filter(|w| !w.is_empty())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Verse<'a> {
    book: &'a str,
    chapter: usize,
    verse: usize,
    raw: &'a str,
    normalized: Cow<'a, str>,
}

fn corpus_verses(corpus: &Corpus) -> impl Iterator<Item = (&str, usize, usize, &str)> + '_ {
    corpus.books().iter().flat_map(|book| {
        book.verses()
            .map(move |(chapter, verse, raw)| (book.abbrev.as_str(), chapter, verse, raw))
    })
}

fn tally<'a>(
    corpus: &'a Corpus,
    matcher: Option<&Matcher>,
    verses: impl Iterator<Item = Verse<'a>>,
) -> BookCounts<'a> {
    let mut counts: BookCounts<'a> = corpus
        .books()
        .iter()
        .map(|b| (b.abbrev.as_str(), 0))
        .collect();
    let Some(matcher) = matcher else {
        return counts;
    };
    for verse in verses {
        let hits = matcher.count(&verse.normalized);
        if hits > 0 {
            *counts.entry(verse.book).or_insert(0) += hits;
        }
    }
    counts
}

fn collect_matches<'a>(
    matcher: Option<&Matcher>,
    verses: impl Iterator<Item = Verse<'a>>,
) -> Vec<VerseMatch<'a>> {
    let Some(matcher) = matcher else {
        return Vec::new();
    };
    verses
        .filter(|v| matcher.count(&v.normalized) > 0)
        .map(|v| VerseMatch {
            book: v.book,
            chapter: v.chapter,
            verse: v.verse,
            text: v.raw,
        })
        .collect()
}

fn on_the_fly(corpus: &Corpus) -> impl Iterator<Item = Verse<'_>> + '_ {
    corpus_verses(corpus).map(|(book, chapter, verse, raw)| Verse {
        book,
        chapter,
        verse,
        raw,
        normalized: Cow::Owned(normalize(raw)),
    })
}

/// Occurrences of `term` per book of `corpus`.
///
/// Every book of the corpus gets an entry (0 when nothing matched); books
/// the corpus lacks are absent. Duplicate book entries are summed.
pub fn count_by_book<'a>(corpus: &'a Corpus, term: &str, mode: SearchMode) -> BookCounts<'a> {
    let matcher = Matcher::new(term, mode);
    tally(corpus, matcher.as_ref(), on_the_fly(corpus))
}

/// Verses containing `term` at least once, in document order.
pub fn list_matches<'a>(corpus: &'a Corpus, term: &str, mode: SearchMode) -> Vec<VerseMatch<'a>> {
    let matcher = Matcher::new(term, mode);
    collect_matches(matcher.as_ref(), on_the_fly(corpus))
}

/// A corpus with every verse normalized up front, for repeated queries.
#[derive(Debug)]
pub struct SearchIndex {
    corpus: Corpus,
    // Document order, parallel to `corpus_verses`.
    normalized: Vec<String>,
}

impl SearchIndex {
    pub fn build(corpus: Corpus) -> Self {
        let normalized = corpus_verses(&corpus)
            .map(|(_, _, _, raw)| normalize(raw))
            .collect();
        Self { corpus, normalized }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn name(&self) -> &str {
        self.corpus.name()
    }

    fn verses(&self) -> impl Iterator<Item = Verse<'_>> + '_ {
        corpus_verses(&self.corpus).zip(&self.normalized).map(
            |((book, chapter, verse, raw), normalized)| Verse {
                book,
                chapter,
                verse,
                raw,
                normalized: Cow::Borrowed(normalized.as_str()),
            },
        )
    }

    /// Same contract as [`count_by_book`].
    pub fn count_by_book(&self, term: &str, mode: SearchMode) -> BookCounts<'_> {
        let matcher = Matcher::new(term, mode);
        tally(&self.corpus, matcher.as_ref(), self.verses())
    }

    /// Same contract as [`list_matches`].
    pub fn list_matches(&self, term: &str, mode: SearchMode) -> Vec<VerseMatch<'_>> {
        let matcher = Matcher::new(term, mode);
        collect_matches(matcher.as_ref(), self.verses())
    }
}

/// Search indexes for every loaded version, in column order.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    versions: Vec<SearchIndex>,
}

impl LibraryIndex {
    pub fn build(library: Library) -> Arc<Self> {
        let versions: Vec<SearchIndex> = library
            .into_iter()
            .map(|corpus| {
                let index = SearchIndex::build(corpus);
                info!(
                    "indexed {} verses of {}",
                    index.normalized.len(),
                    index.name()
                );
                index
            })
            .collect();
        Arc::new(Self { versions })
    }

    pub fn versions(&self) -> &[SearchIndex] {
        &self.versions
    }

    pub fn get(&self, name: &str) -> Option<&SearchIndex> {
        self.versions.iter().find(|v| v.name() == name)
    }

    /// Per-book counts for every version, reindexed against the catalog.
    pub fn count_table(&self, term: &str, mode: SearchMode) -> CountTable {
        CountTable::build(
            term,
            mode,
            self.versions
                .iter()
                .map(|v| (v.name(), v.count_by_book(term, mode))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bible_types::{BookContent, DroppedRecords};

    fn corpus(books: &[(&str, &[&[&str]])]) -> Corpus {
        let books = books
            .iter()
            .map(|(abbrev, chapters)| {
                BookContent::new(
                    *abbrev,
                    chapters
                        .iter()
                        .map(|c| c.iter().map(|v| v.to_string()).collect())
                        .collect(),
                )
            })
            .collect();
        Corpus::new("test", books, DroppedRecords::default())
    }

    #[test]
    fn substring_versus_exact() {
        let c = corpus(&[("jo", &[&["amar ama"]])]);
        assert_eq!(count_by_book(&c, "ama", SearchMode::Substring)["jo"], 2);
        assert_eq!(count_by_book(&c, "ama", SearchMode::Exact)["jo"], 1);

        let c = corpus(&[("jo", &[&["o amor ama"]])]);
        assert_eq!(count_by_book(&c, "ama", SearchMode::Substring)["jo"], 1);
        assert_eq!(count_by_book(&c, "ama", SearchMode::Exact)["jo"], 1);
        assert_eq!(count_by_book(&c, "amo", SearchMode::Substring)["jo"], 1);
        assert_eq!(count_by_book(&c, "amo", SearchMode::Exact)["jo"], 0);
    }

    #[test]
    fn substring_count_is_non_overlapping() {
        let c = corpus(&[("sl", &[&["aaaa"]])]);
        assert_eq!(count_by_book(&c, "aa", SearchMode::Substring)["sl"], 2);
    }

    #[test]
    fn term_and_text_are_normalized() {
        let c = corpus(&[("jo", &[&["Ἐν ἀρχῇ ἦν ὁ λόγος, καὶ ὁ λόγος ἦν πρὸς τὸν θεόν"]])]);
        assert_eq!(count_by_book(&c, "ΛΟΓΟΣ", SearchMode::Exact)["jo"], 2);
        assert_eq!(count_by_book(&c, "λογος", SearchMode::Substring)["jo"], 2);

        let c = corpus(&[("gn", &[&["CORAÇÃO, coração; Coracao."]])]);
        assert_eq!(count_by_book(&c, "coração", SearchMode::Exact)["gn"], 3);
    }

    #[test]
    fn blank_terms_never_match() {
        let c = corpus(&[("gn", &[&["a b c"]]), ("ex", &[&["  "]])]);
        for term in ["", "   ", "\u{0301}"] {
            for mode in [SearchMode::Substring, SearchMode::Exact] {
                let counts = count_by_book(&c, term, mode);
                assert_eq!(counts.len(), 2);
                assert!(counts.values().all(|n| *n == 0));
                assert!(list_matches(&c, term, mode).is_empty());
            }
        }
    }

    #[test]
    fn counts_cover_corpus_books_only() {
        let c = corpus(&[("mt", &[&["luz"]]), ("mc", &[&["trevas"]])]);
        let counts = count_by_book(&c, "luz", SearchMode::Substring);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["mt"], 1);
        assert_eq!(counts["mc"], 0);
        assert!(!counts.contains_key("gn"));
    }

    #[test]
    fn matches_in_document_order() {
        let c = corpus(&[
            ("gn", &[&["luz", "nada"], &["luz e luz"]]),
            ("ex", &[&["luz"]]),
        ]);
        let found = list_matches(&c, "luz", SearchMode::Exact);
        let keys: Vec<_> = found.iter().map(|m| (m.book, m.chapter, m.verse)).collect();
        assert_eq!(keys, vec![("gn", 1, 1), ("gn", 2, 1), ("ex", 1, 1)]);
        // one entry per verse, not per occurrence
        assert_eq!(found[1].text, "luz e luz");
    }

    #[test]
    fn every_match_contributes_to_its_book_count() {
        let c = corpus(&[
            ("gn", &[&["amar ama", "amigo"], &["o amor"]]),
            ("ex", &[&["ama-me"], &["nada"]]),
        ]);
        for mode in [SearchMode::Substring, SearchMode::Exact] {
            for term in ["ama", "am", "amor"] {
                let counts = count_by_book(&c, term, mode);
                let found = list_matches(&c, term, mode);
                for m in &found {
                    assert!(counts[m.book] >= 1, "{term} {mode} {m:?}");
                }
                let matched_books = found.iter().map(|m| m.book).collect::<Vec<_>>();
                for (book, n) in &counts {
                    assert_eq!(*n > 0, matched_books.contains(book));
                }
            }
        }
    }

    #[test]
    fn exact_mode_splits_on_punctuation_not_underscore() {
        let c = corpus(&[("pv", &[&["sábio-sabio; sabio_x"]])]);
        assert_eq!(count_by_book(&c, "sabio", SearchMode::Exact)["pv"], 2);
        assert_eq!(count_by_book(&c, "sabio_x", SearchMode::Exact)["pv"], 1);
    }

    #[test]
    fn index_agrees_with_on_the_fly_search() {
        let c = corpus(&[
            ("gn", &[&["No princípio", "Princípios"]]),
            ("ex", &[&["principio"]]),
        ]);
        let index = SearchIndex::build(c.clone());
        for mode in [SearchMode::Substring, SearchMode::Exact] {
            assert_eq!(
                index.count_by_book("principio", mode),
                count_by_book(&c, "principio", mode)
            );
            assert_eq!(
                index.list_matches("principio", mode),
                list_matches(&c, "principio", mode)
            );
        }
    }

    #[test]
    fn library_index_builds_a_table_per_version() {
        let library = Library::new(vec![
            Corpus::new(
                "ACF",
                vec![BookContent::new("gn", vec![vec!["luz".into()]])],
                DroppedRecords::default(),
            ),
            Corpus::new(
                "Grego",
                vec![BookContent::new("jo", vec![vec!["φως".into()]])],
                DroppedRecords::default(),
            ),
        ]);
        let index = LibraryIndex::build(library);
        assert!(index.get("Grego").is_some());
        let table = index.count_table("luz", SearchMode::Substring);
        assert_eq!(table.versions, vec!["ACF", "Grego"]);
        assert_eq!(table.totals, vec![1, 0]);
    }
}
