//! Shared types describing a loaded Bible version and the results of
//! searching it.
//!
//! Every version, whatever its source schema, is converted into a [`Corpus`]:
//! an ordered list of [`BookContent`] entries keyed by canonical book
//! abbreviation, each holding chapters of verse strings in document order.
//! Search results borrow from the corpus ([`VerseMatch`]) so listing matches
//! never copies verse text.
//!
//! ```rust
//! use bible_types::{BookContent, Corpus, DroppedRecords, SearchMode};
//!
//! let gn = BookContent::new("gn", vec![vec!["No princípio".to_string()]]);
//! let corpus = Corpus::new("ACF", vec![gn], DroppedRecords::default());
//! assert_eq!(corpus.stats().verses, 1);
//! assert_eq!("exato".parse::<SearchMode>().unwrap(), SearchMode::Exact);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How a search term is compared against verse text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SearchMode {
    /// Raw substring occurrences of the normalized term. This is not
    /// stemming: `"ama"` is found inside `"amar"`.
    #[default]
    Substring,
    /// Whole-token equality against the normalized verse's word runs.
    Exact,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Substring => "substring",
            SearchMode::Exact => "exact",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = ModeError;

    /// Accepts the English names plus the Portuguese labels used by the
    /// dashboard (`raiz`, `frase`, `exato`) and the legacy `fuzzy`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "" | "substring" | "root" | "raiz" | "frase" | "fuzzy" => Ok(SearchMode::Substring),
            "exact" | "exato" | "word" => Ok(SearchMode::Exact),
            _ => Err(ModeError(raw.to_string())),
        }
    }
}

/// Unrecognised search mode string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModeError(pub String);

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid search mode {:?} (expected substring or exact)",
            self.0
        )
    }
}

impl std::error::Error for ModeError {}

/// A catalog entry: canonical short code plus display name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Book {
    pub abbreviation: &'static str,
    pub full_name: &'static str,
}

/// Verses of one chapter, in source order.
pub type Chapter = Vec<String>;

/// One book of a version: canonical abbreviation and chapters sorted by
/// ascending chapter number. Chapter `n` lives at index `n - 1` only when the
/// source had no gaps; positions are what searches report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BookContent {
    pub abbrev: String,
    pub chapters: Vec<Chapter>,
}

impl BookContent {
    pub fn new(abbrev: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            abbrev: abbrev.into(),
            chapters,
        }
    }

    /// Iterate `(chapter, verse, text)` with 1-based positions in document
    /// order.
    pub fn verses(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.chapters
            .iter()
            .enumerate()
            .flat_map(|(c_idx, chapter)| {
                chapter
                    .iter()
                    .enumerate()
                    .map(move |(v_idx, text)| (c_idx + 1, v_idx + 1, text.as_str()))
            })
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(Vec::len).sum()
    }
}

/// Records discarded while adapting a source into a [`Corpus`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DroppedRecords {
    /// Book identifier did not resolve to a catalog book.
    pub unknown_book: usize,
    /// Hebrew chapter label decoded to 0.
    pub invalid_chapter: usize,
}

impl DroppedRecords {
    pub fn total(&self) -> usize {
        self.unknown_book + self.invalid_chapter
    }
}

/// Size summary of a corpus.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CorpusStats {
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
}

/// One loaded version. Immutable once built; share it behind `Arc` for
/// concurrent readers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Corpus {
    name: String,
    books: Vec<BookContent>,
    dropped: DroppedRecords,
}

impl Corpus {
    pub fn new(name: impl Into<String>, books: Vec<BookContent>, dropped: DroppedRecords) -> Self {
        Self {
            name: name.into(),
            books,
            dropped,
        }
    }

    /// Version label, e.g. `ACF` or `Hebraico`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Books in load order.
    pub fn books(&self) -> &[BookContent] {
        &self.books
    }

    /// First book stored under `abbrev`, if any.
    pub fn book(&self, abbrev: &str) -> Option<&BookContent> {
        self.books.iter().find(|b| b.abbrev == abbrev)
    }

    /// Diagnostics for records the adapter discarded.
    pub fn dropped(&self) -> DroppedRecords {
        self.dropped
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            books: self.books.len(),
            chapters: self.books.iter().map(|b| b.chapters.len()).sum(),
            verses: self.books.iter().map(BookContent::verse_count).sum(),
        }
    }
}

/// Occurrence count per canonical book abbreviation for one version.
pub type BookCounts<'a> = HashMap<&'a str, usize>;

/// A verse that satisfied the search predicate, borrowed from its corpus.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerseMatch<'a> {
    pub book: &'a str,
    pub chapter: usize,
    pub verse: usize,
    pub text: &'a str,
}
