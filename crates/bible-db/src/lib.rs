//! Load Bible versions from JSON files into uniform [`Corpus`] values.
//!
//! Each version is one JSON document in one of two layouts
//! ([`SourceSchema`]): structured book arrays (Portuguese and Greek
//! editions) or flat Hebrew verse records. Both pass through a single
//! adapter ([`load_corpus`]) so the search layer never sees the source
//! schema. Files are read either memory-mapped or into an owned buffer
//! ([`LoadMode`]); a leading UTF-8 byte-order mark is accepted.
//!
//! A failure is per version: [`load_version`] returns a [`LoadError`] and
//! never publishes a partial corpus. [`Library::load`] applies a
//! [`FailurePolicy`] across a set of versions.
//!
//! # Example
//! ```no_run
//! use bible_db::{FailurePolicy, Library, LoadMode, default_versions};
//!
//! # fn main() -> Result<(), bible_db::LoadError> {
//! let library = Library::load("data", &default_versions(), LoadMode::Mmap, FailurePolicy::Skip)?;
//! for corpus in library.iter() {
//!     println!("{}: {} verses", corpus.name(), corpus.stats().verses);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p bible-db --example stats -- <data-dir>`.

mod adapter;
mod raw;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use bible_types::Corpus;
use memmap2::Mmap;
use thiserror::Error;
use tracing::{info, warn};

pub use adapter::load_corpus;
pub use raw::{ChapterLabel, HebrewVerse, RawRecords, SourceSchema, StructuredBook, text_of};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strategy for reading version files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file and parse in place.
    #[default]
    Mmap,
    /// Read the file into an owned buffer.
    Owned,
}

impl LoadMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

/// What [`Library::load`] does when one version fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// Log the error and keep the versions that loaded.
    #[default]
    Skip,
    /// Return the first error.
    Abort,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} does not match the {schema} layout: {source}", path.display())]
    Shape {
        path: PathBuf,
        schema: SourceSchema,
        #[source]
        source: serde_json::Error,
    },
}

/// One configured version: display name, file and layout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VersionSpec {
    pub name: String,
    pub file: PathBuf,
    pub schema: SourceSchema,
}

impl VersionSpec {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, schema: SourceSchema) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            schema,
        }
    }

    /// Parse `NAME=FILE` or `NAME=FILE:SCHEMA`. Without a schema the
    /// version name decides ([`SourceSchema::for_version`]).
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (name, rest) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=FILE[:SCHEMA], got {raw:?}"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing version name in {raw:?}"));
        }
        let (file, schema) = match rest.rsplit_once(':') {
            Some((file, schema)) if schema.parse::<SourceSchema>().is_ok() => {
                (file, schema.parse::<SourceSchema>()?)
            }
            _ => (rest, SourceSchema::for_version(name)),
        };
        if file.trim().is_empty() {
            return Err(format!("missing file for version {name}"));
        }
        Ok(Self::new(name, file.trim(), schema))
    }
}

/// The versions shipped with the dashboard, in column order.
pub fn default_versions() -> Vec<VersionSpec> {
    vec![
        VersionSpec::new("ACF", "acf.json", SourceSchema::Structured),
        VersionSpec::new("AA", "aa.json", SourceSchema::Structured),
        VersionSpec::new("NVI", "nvi.json", SourceSchema::Structured),
        VersionSpec::new("Grego", "el_greek.json", SourceSchema::Structured),
        VersionSpec::new("Hebraico", "hebrew.json", SourceSchema::HebrewVerses),
    ]
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    match mode {
        LoadMode::Mmap => unsafe { Mmap::map(&file) }
            .map(Buffer::Mmap)
            .map_err(io_err),
        LoadMode::Owned => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).map_err(io_err)?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Read and parse one version file without adapting it.
pub fn read_records(
    path: impl AsRef<Path>,
    schema: SourceSchema,
    mode: LoadMode,
) -> Result<RawRecords, LoadError> {
    let path = path.as_ref();
    let buffer = load_file(path, mode)?;
    let bytes = buffer.as_slice();
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|source| LoadError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;
    RawRecords::from_json(text, schema).map_err(|source| {
        if source.is_data() {
            LoadError::Shape {
                path: path.to_path_buf(),
                schema,
                source,
            }
        } else {
            LoadError::Json {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Load one version from `data_dir`. Relative file paths resolve against
/// `data_dir`; absolute ones are used as is.
pub fn load_version(
    data_dir: impl AsRef<Path>,
    spec: &VersionSpec,
    mode: LoadMode,
) -> Result<Corpus, LoadError> {
    let path = data_dir.as_ref().join(&spec.file);
    let start = Instant::now();
    let records = read_records(&path, spec.schema, mode)?;
    let raw_count = records.len();
    let corpus = load_corpus(&spec.name, records);

    let stats = corpus.stats();
    info!(
        "loaded {} from {} ({} records -> {} books, {} verses) in {} ms",
        spec.name,
        path.display(),
        raw_count,
        stats.books,
        stats.verses,
        start.elapsed().as_millis()
    );
    let dropped = corpus.dropped();
    if dropped.total() > 0 {
        warn!(
            "{}: dropped {} records with unknown books and {} with invalid chapters",
            spec.name, dropped.unknown_book, dropped.invalid_chapter
        );
    }
    Ok(corpus)
}

/// Loaded versions in configured order. Immutable after construction.
#[derive(Clone, Debug, Default)]
pub struct Library {
    corpora: Vec<Corpus>,
}

impl Library {
    pub fn new(corpora: Vec<Corpus>) -> Self {
        Self { corpora }
    }

    /// Load every version from `data_dir`, applying `policy` to failures.
    pub fn load(
        data_dir: impl AsRef<Path>,
        specs: &[VersionSpec],
        mode: LoadMode,
        policy: FailurePolicy,
    ) -> Result<Self, LoadError> {
        let dir = data_dir.as_ref();
        let mut corpora = Vec::with_capacity(specs.len());
        for spec in specs {
            match load_version(dir, spec, mode) {
                Ok(corpus) => corpora.push(corpus),
                Err(err) if policy == FailurePolicy::Skip => {
                    warn!("skipping version {}: {err}", spec.name);
                }
                Err(err) => return Err(err),
            }
        }
        info!("{} of {} versions loaded", corpora.len(), specs.len());
        Ok(Self { corpora })
    }

    pub fn get(&self, name: &str) -> Option<&Corpus> {
        self.corpora.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Corpus> + '_ {
        self.corpora.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.corpora.iter().map(Corpus::name)
    }

    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }
}

impl IntoIterator for Library {
    type Item = Corpus;
    type IntoIter = std::vec::IntoIter<Corpus>;

    fn into_iter(self) -> Self::IntoIter {
        self.corpora.into_iter()
    }
}
