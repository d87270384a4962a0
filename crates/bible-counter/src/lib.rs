pub mod handlers;
pub mod report;
pub mod search;

pub use handlers::{AppState, MAX_TERM_LEN, router};
pub use report::{CountRow, CountTable, heat_level};
pub use search::{LibraryIndex, Matcher, SearchIndex, count_by_book, list_matches, words};
