//! Source record shapes as they appear in the JSON files.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

/// Which record layout a version file uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SourceSchema {
    /// Array of books, each with an abbreviation and `chapters: [[verse]]`.
    Structured,
    /// Array of single verses carrying a Hebrew book name and a
    /// Hebrew-numeral chapter label.
    HebrewVerses,
}

impl SourceSchema {
    /// Schema used by a version name when none is configured.
    pub fn for_version(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "hebraico" | "hebrew" | "wlc" => SourceSchema::HebrewVerses,
            _ => SourceSchema::Structured,
        }
    }
}

impl fmt::Display for SourceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceSchema::Structured => "structured",
            SourceSchema::HebrewVerses => "hebrew-verses",
        })
    }
}

impl FromStr for SourceSchema {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "structured" | "books" => Ok(SourceSchema::Structured),
            "hebrew" | "hebrew-verses" | "flat" => Ok(SourceSchema::HebrewVerses),
            other => Err(format!("unknown source schema: {other}")),
        }
    }
}

/// One book of a structured source.
#[derive(Clone, Debug, Deserialize)]
pub struct StructuredBook {
    #[serde(default)]
    pub abbrev: Option<String>,
    #[serde(default)]
    pub book: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Vec<Value>>,
}

impl StructuredBook {
    /// First non-empty identifier among `abbrev`, `book` and `name`.
    pub fn identifier(&self) -> Option<&str> {
        [&self.abbrev, &self.book, &self.name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
    }
}

/// Chapter label of a flat Hebrew record: normally Hebrew letters, though
/// some exports use plain integers.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ChapterLabel {
    Number(u64),
    Text(String),
}

/// One verse of the flat Hebrew source.
#[derive(Clone, Debug, Deserialize)]
pub struct HebrewVerse {
    pub book: String,
    pub chapter: ChapterLabel,
    #[serde(default)]
    pub content: Value,
}

/// A parsed version file, before adaptation.
#[derive(Clone, Debug)]
pub enum RawRecords {
    Structured(Vec<StructuredBook>),
    HebrewVerses(Vec<HebrewVerse>),
}

impl RawRecords {
    /// Parse a JSON document with the given layout.
    pub fn from_json(text: &str, schema: SourceSchema) -> serde_json::Result<Self> {
        Ok(match schema {
            SourceSchema::Structured => RawRecords::Structured(serde_json::from_str(text)?),
            SourceSchema::HebrewVerses => RawRecords::HebrewVerses(serde_json::from_str(text)?),
        })
    }

    pub fn len(&self) -> usize {
        match self {
            RawRecords::Structured(books) => books.len(),
            RawRecords::HebrewVerses(verses) => verses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Coerce a JSON verse value to text. Null becomes empty; numbers and other
/// scalars use their JSON rendering.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_identifier_falls_back() {
        let raw = r#"[{"abbrev": "", "book": "Gn", "chapters": [["a"]]}, {"name": "Ex"}]"#;
        let RawRecords::Structured(books) =
            RawRecords::from_json(raw, SourceSchema::Structured).unwrap()
        else {
            panic!("expected structured records");
        };
        assert_eq!(books[0].identifier(), Some("Gn"));
        assert_eq!(books[1].identifier(), Some("Ex"));
        assert!(books[1].chapters.is_empty());
    }

    #[test]
    fn chapter_label_accepts_text_or_number() {
        let raw = r#"[{"book": "רות", "chapter": "ב", "content": "x"},
                      {"book": "רות", "chapter": 3, "content": "y"}]"#;
        let RawRecords::HebrewVerses(verses) =
            RawRecords::from_json(raw, SourceSchema::HebrewVerses).unwrap()
        else {
            panic!("expected hebrew records");
        };
        assert!(matches!(verses[0].chapter, ChapterLabel::Text(ref s) if s == "ב"));
        assert!(matches!(verses[1].chapter, ChapterLabel::Number(3)));
    }

    #[test]
    fn coerces_verse_values() {
        assert_eq!(text_of(&json!("amor")), "amor");
        assert_eq!(text_of(&json!(12)), "12");
        assert_eq!(text_of(&Value::Null), "");
    }

    #[test]
    fn schema_defaults_by_version_name() {
        assert_eq!(
            SourceSchema::for_version("Hebraico"),
            SourceSchema::HebrewVerses
        );
        assert_eq!(SourceSchema::for_version("ACF"), SourceSchema::Structured);
        assert_eq!(
            "flat".parse::<SourceSchema>().unwrap(),
            SourceSchema::HebrewVerses
        );
    }
}
