use std::collections::HashMap;
use std::sync::LazyLock;

use bible_types::Book;
use unicode_normalization::UnicodeNormalization;

use crate::normalize::normalize;

const fn book(abbreviation: &'static str, full_name: &'static str) -> Book {
    Book {
        abbreviation,
        full_name,
    }
}

/// The 66 books in Portuguese-tradition order: Old Testament then New.
pub const CATALOG: [Book; 66] = [
    book("gn", "Gênesis"),
    book("ex", "Êxodo"),
    book("lv", "Levítico"),
    book("nm", "Números"),
    book("dt", "Deuteronômio"),
    book("js", "Josué"),
    book("jz", "Juízes"),
    book("rt", "Rute"),
    book("1sm", "1 Samuel"),
    book("2sm", "2 Samuel"),
    book("1rs", "1 Reis"),
    book("2rs", "2 Reis"),
    book("1cr", "1 Crônicas"),
    book("2cr", "2 Crônicas"),
    book("ed", "Esdras"),
    book("ne", "Neemias"),
    book("et", "Ester"),
    book("jó", "Jó"),
    book("sl", "Salmos"),
    book("pv", "Provérbios"),
    book("ec", "Eclesiastes"),
    book("ct", "Cânticos"),
    book("is", "Isaías"),
    book("jr", "Jeremias"),
    book("lm", "Lamentações"),
    book("ez", "Ezequiel"),
    book("dn", "Daniel"),
    book("os", "Oséias"),
    book("jl", "Joel"),
    book("am", "Amós"),
    book("ob", "Obadias"),
    book("jn", "Jonas"),
    book("mq", "Miquéias"),
    book("na", "Naum"),
    book("hc", "Habacuque"),
    book("sf", "Sofonias"),
    book("ag", "Ageu"),
    book("zc", "Zacarias"),
    book("ml", "Malaquias"),
    book("mt", "Mateus"),
    book("mc", "Marcos"),
    book("lc", "Lucas"),
    book("jo", "João"),
    book("at", "Atos"),
    book("rm", "Romanos"),
    book("1co", "1 Coríntios"),
    book("2co", "2 Coríntios"),
    book("gl", "Gálatas"),
    book("ef", "Efésios"),
    book("fp", "Filipenses"),
    book("cl", "Colossenses"),
    book("1ts", "1 Tessalonicenses"),
    book("2ts", "2 Tessalonicenses"),
    book("1tm", "1 Timóteo"),
    book("2tm", "2 Timóteo"),
    book("tt", "Tito"),
    book("fm", "Filemom"),
    book("hb", "Hebreus"),
    book("tg", "Tiago"),
    book("1pe", "1 Pedro"),
    book("2pe", "2 Pedro"),
    book("1jo", "1 João"),
    book("2jo", "2 João"),
    book("3jo", "3 João"),
    book("jd", "Judas"),
    book("ap", "Apocalipse"),
];

/// Canonical abbreviations in catalog order; the row order of every report.
pub static CANONICAL_ORDER: [&str; 66] = {
    let mut out = [""; 66];
    let mut i = 0;
    while i < CATALOG.len() {
        out[i] = CATALOG[i].abbreviation;
        i += 1;
    }
    out
};

/// Foreign and variant abbreviations, keyed by their normalized form.
const ALIASES: &[(&str, &str)] = &[
    ("1ch", "1cr"),
    ("2ch", "2cr"),
    ("1kgs", "1rs"),
    ("2kgs", "2rs"),
    ("ezr", "ed"),
    ("eph", "ef"),
    ("ps", "sl"),
    ("psa", "sl"),
    ("psalms", "sl"),
    ("prov", "pv"),
    ("prv", "pv"),
    ("ecc", "ec"),
    ("eccl", "ec"),
    ("act", "at"),
    ("acts", "at"),
    ("job", "jó"),
    ("lk", "lc"),
    ("mk", "mc"),
    ("jm", "tg"),
    ("ph", "fp"),
    ("phm", "fm"),
    ("jud", "jz"),
    ("so", "ct"),
    ("zp", "sf"),
    ("re", "ap"),
    ("ho", "os"),
    ("hg", "ag"),
    ("hk", "hc"),
    ("mi", "mq"),
];

/// Book names as they appear in the flat Hebrew source, unpointed.
const HEBREW_NAMES: &[(&str, &str)] = &[
    ("בראשית", "gn"),
    ("שמות", "ex"),
    ("ויקרא", "lv"),
    ("במדבר", "nm"),
    ("דברים", "dt"),
    ("יהושע", "js"),
    ("שופטים", "jz"),
    ("רות", "rt"),
    ("שמואל א", "1sm"),
    ("שמואל ב", "2sm"),
    ("מלכים א", "1rs"),
    ("מלכים ב", "2rs"),
    ("דברי הימים א", "1cr"),
    ("דברי הימים ב", "2cr"),
    ("עזרא", "ed"),
    ("נחמיה", "ne"),
    ("אסתר", "et"),
    ("איוב", "jó"),
    ("תהלים", "sl"),
    ("משלי", "pv"),
    ("קהלת", "ec"),
    ("שיר השירים", "ct"),
    ("ישעיהו", "is"),
    ("ירמיהו", "jr"),
    ("איכה", "lm"),
    ("יחזקאל", "ez"),
    ("דניאל", "dn"),
    ("הושע", "os"),
    ("יואל", "jl"),
    ("עמוס", "am"),
    ("עבדיה", "ob"),
    ("יונה", "jn"),
    ("מיכה", "mq"),
    ("נחום", "na"),
    ("חבקוק", "hc"),
    ("צפניה", "sf"),
    ("חגי", "ag"),
    ("זכריה", "zc"),
    ("מלאכי", "ml"),
];

static FULL_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .map(|b| (b.abbreviation, b.full_name))
        .collect()
});

static ALIAS_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

static HEBREW_MAP: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    HEBREW_NAMES
        .iter()
        .map(|(name, abbrev)| (normalize(name), *abbrev))
        .collect()
});

/// Whether `abbrev` is one of the 66 catalog codes.
pub fn is_canonical(abbrev: &str) -> bool {
    FULL_NAMES.contains_key(abbrev)
}

/// Resolve a raw book abbreviation to its canonical code.
///
/// Periods and whitespace are removed and case is folded. A catalog code
/// (including the accented `jó`) resolves to itself; anything else is
/// stripped of diacritics and looked up in the alias table. Unknown input
/// is returned in its normalized form rather than rejected, so callers must
/// check [`is_canonical`] before relying on the key.
pub fn canonical_abbrev(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .nfc()
        .collect();
    if is_canonical(&compact) {
        return compact;
    }
    let normalized = normalize(&compact);
    match ALIAS_MAP.get(normalized.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => normalized,
    }
}

/// Display name for a canonical code; unknown codes come back unchanged.
pub fn full_name(abbrev: &str) -> &str {
    FULL_NAMES.get(abbrev).copied().unwrap_or(abbrev)
}

/// Canonical code for a literal Hebrew book name, pointed or not.
pub fn hebrew_book_abbrev(name: &str) -> Option<&'static str> {
    let key = normalize(name.trim());
    HEBREW_MAP.get(key.as_str()).copied()
}
