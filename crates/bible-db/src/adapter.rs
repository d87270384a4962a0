//! Conversion of raw source records into a uniform [`Corpus`].

use std::collections::{BTreeMap, HashMap};

use bible_text::{canonical_abbrev, decode_hebrew_numeral, hebrew_book_abbrev, is_canonical};
use bible_types::{BookContent, Chapter, Corpus, DroppedRecords};
use tracing::debug;

use crate::raw::{ChapterLabel, HebrewVerse, RawRecords, StructuredBook, text_of};

/// Build a corpus from parsed records, whatever their layout.
///
/// Records whose book does not resolve to a catalog code, and Hebrew
/// verses whose chapter decodes to 0, are discarded and tallied in
/// [`Corpus::dropped`].
pub fn load_corpus(version: &str, records: RawRecords) -> Corpus {
    let (books, dropped) = match records {
        RawRecords::Structured(books) => adapt_structured(version, books),
        RawRecords::HebrewVerses(verses) => adapt_hebrew(version, verses),
    };
    Corpus::new(version, books, dropped)
}

fn adapt_structured(
    version: &str,
    records: Vec<StructuredBook>,
) -> (Vec<BookContent>, DroppedRecords) {
    let mut dropped = DroppedRecords::default();
    let mut books = Vec::with_capacity(records.len());

    for record in records {
        let abbrev = record.identifier().map(canonical_abbrev).unwrap_or_default();
        if !is_canonical(&abbrev) {
            debug!(
                "{version}: dropping book {:?} (resolved to {abbrev:?})",
                record.identifier()
            );
            dropped.unknown_book += 1;
            continue;
        }
        let chapters: Vec<Chapter> = record
            .chapters
            .iter()
            .map(|chapter| chapter.iter().map(text_of).collect())
            .collect();
        books.push(BookContent::new(abbrev, chapters));
    }

    (books, dropped)
}

fn adapt_hebrew(version: &str, records: Vec<HebrewVerse>) -> (Vec<BookContent>, DroppedRecords) {
    let mut dropped = DroppedRecords::default();
    // Books keep first-seen order; chapters sort by number.
    let mut order: Vec<&'static str> = Vec::new();
    let mut grouped: HashMap<&'static str, BTreeMap<u32, Chapter>> = HashMap::new();

    for record in records {
        let Some(abbrev) = hebrew_book_abbrev(&record.book) else {
            debug!("{version}: unknown hebrew book {:?}", record.book);
            dropped.unknown_book += 1;
            continue;
        };
        let chapter = chapter_number(&record.chapter);
        if chapter == 0 {
            debug!(
                "{version}: invalid chapter label {:?} in {abbrev}",
                record.chapter
            );
            dropped.invalid_chapter += 1;
            continue;
        }
        let chapters = grouped.entry(abbrev).or_insert_with(|| {
            order.push(abbrev);
            BTreeMap::new()
        });
        chapters
            .entry(chapter)
            .or_default()
            .push(text_of(&record.content));
    }

    let books = order
        .into_iter()
        .filter_map(|abbrev| {
            grouped
                .remove(abbrev)
                .map(|chapters| BookContent::new(abbrev, chapters.into_values().collect()))
        })
        .collect();

    (books, dropped)
}

fn chapter_number(label: &ChapterLabel) -> u32 {
    match label {
        ChapterLabel::Text(text) => decode_hebrew_numeral(text),
        ChapterLabel::Number(n) => u32::try_from(*n).unwrap_or(0),
    }
}
