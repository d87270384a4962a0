use std::fmt::Write;

use bible_text::{CANONICAL_ORDER, full_name};
use bible_types::{BookCounts, SearchMode};
use serde::Serialize;

const BOOK_HEADER: &str = "Livro";
const TOTAL_LABEL: &str = "TOTAL";

/// Per-book counts of every version, reindexed against the catalog.
///
/// Rows follow [`CANONICAL_ORDER`] and always number 66; columns follow the
/// order versions were supplied. Books a version lacks count 0, and keys
/// outside the catalog are left out.
#[derive(Clone, Debug, Serialize)]
pub struct CountTable {
    pub term: String,
    pub mode: &'static str,
    pub versions: Vec<String>,
    pub rows: Vec<CountRow>,
    pub totals: Vec<usize>,
    /// Largest single cell; the heat scale's upper bound.
    pub max: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct CountRow {
    pub abbrev: &'static str,
    pub name: &'static str,
    pub counts: Vec<usize>,
    /// `count / max` per cell, in `[0, 1]`.
    pub heat: Vec<f32>,
}

impl CountTable {
    pub fn build<'a>(
        term: &str,
        mode: SearchMode,
        columns: impl IntoIterator<Item = (&'a str, BookCounts<'a>)>,
    ) -> Self {
        let (versions, counts): (Vec<String>, Vec<BookCounts<'a>>) = columns
            .into_iter()
            .map(|(name, counts)| (name.to_string(), counts))
            .unzip();

        let mut rows: Vec<CountRow> = CANONICAL_ORDER
            .iter()
            .copied()
            .map(|abbrev| CountRow {
                abbrev,
                name: full_name(abbrev),
                counts: counts
                    .iter()
                    .map(|c| c.get(abbrev).copied().unwrap_or(0))
                    .collect(),
                heat: Vec::new(),
            })
            .collect();

        let totals: Vec<usize> = (0..versions.len())
            .map(|col| rows.iter().map(|r| r.counts[col]).sum::<usize>())
            .collect();
        let max = rows
            .iter()
            .flat_map(|r| r.counts.iter().copied())
            .max()
            .unwrap_or(0);
        for row in &mut rows {
            row.heat = row.counts.iter().map(|n| heat_level(*n, max)).collect();
        }

        Self {
            term: term.to_string(),
            mode: mode.as_str(),
            versions,
            rows,
            totals,
            max,
        }
    }

    pub fn grand_total(&self) -> usize {
        self.totals.iter().sum()
    }

    /// Aligned plain-text rendering with a trailing TOTAL line.
    pub fn render_text(&self) -> String {
        let name_width = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .chain([BOOK_HEADER.len(), TOTAL_LABEL.len()])
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self
            .versions
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let widest = self.totals[col].to_string().len();
                name.chars().count().max(widest)
            })
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{BOOK_HEADER:<name_width$}");
        for (name, width) in self.versions.iter().zip(&widths) {
            let _ = write!(out, "  {name:>width$}");
        }
        out.push('\n');

        for row in &self.rows {
            let _ = write!(out, "{:<name_width$}", row.name);
            for (count, width) in row.counts.iter().zip(&widths) {
                let _ = write!(out, "  {count:>width$}");
            }
            out.push('\n');
        }

        let _ = write!(out, "{TOTAL_LABEL:<name_width$}");
        for (total, width) in self.totals.iter().zip(&widths) {
            let _ = write!(out, "  {total:>width$}");
        }
        out.push('\n');
        out
    }
}

/// Fraction of the table maximum, 0 when the table is empty.
pub fn heat_level(count: usize, max: usize) -> f32 {
    if max == 0 {
        0.0
    } else {
        count as f32 / max as f32
    }
}
