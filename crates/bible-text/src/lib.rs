//! Text canonicalization shared by the loader and the search engine.
//!
//! Three independent pieces live here:
//! 1. [`normalize`]: decomposes text, drops combining marks (accents, Greek
//!    breathings, Hebrew points), lower-cases and folds Greek final sigma.
//! 2. The book catalog ([`CATALOG`], [`CANONICAL_ORDER`], [`canonical_abbrev`],
//!    [`full_name`], [`hebrew_book_abbrev`]) that joins every version on one
//!    abbreviation per book.
//! 3. [`decode_hebrew_numeral`], the additive letter-value decoder used for
//!    Hebrew chapter labels.
//!
//! # Example
//! ```rust
//! use bible_text::{canonical_abbrev, decode_hebrew_numeral, full_name, normalize};
//!
//! assert_eq!(normalize("Ἀγάπη"), normalize("αγαπη"));
//! assert_eq!(canonical_abbrev("Ps."), "sl");
//! assert_eq!(full_name("sl"), "Salmos");
//! assert_eq!(decode_hebrew_numeral("יא"), 11);
//! ```

mod catalog;
mod hebrew;
mod normalize;

pub use catalog::{
    CANONICAL_ORDER, CATALOG, canonical_abbrev, full_name, hebrew_book_abbrev, is_canonical,
};
pub use hebrew::{decode_hebrew_numeral, hebrew_letter_value};
pub use normalize::normalize;
