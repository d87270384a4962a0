use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bible_db::{FailurePolicy, Library, LoadMode, default_versions};
use bible_text::{CANONICAL_ORDER, full_name};

fn main() -> Result<()> {
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p bible-db --example stats -- <path-to-data-dir>")?;

    let library = Library::load(
        &data_dir,
        &default_versions(),
        LoadMode::Mmap,
        FailurePolicy::Skip,
    )
    .with_context(|| format!("loading versions from {}", data_dir.display()))?;

    println!("Data directory: {}", data_dir.display());
    for corpus in library.iter() {
        let stats = corpus.stats();
        let dropped = corpus.dropped();
        println!("\n{}", corpus.name());
        println!("  Books    : {}", stats.books);
        println!("  Chapters : {}", stats.chapters);
        println!("  Verses   : {}", stats.verses);
        println!(
            "  Dropped  : {} unknown book, {} invalid chapter",
            dropped.unknown_book, dropped.invalid_chapter
        );

        let missing: Vec<_> = CANONICAL_ORDER
            .iter()
            .copied()
            .filter(|abbrev| corpus.book(abbrev).is_none())
            .map(full_name)
            .collect();
        if !missing.is_empty() {
            println!("  Missing  : {}", missing.join(", "));
        }
    }

    Ok(())
}
