use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const FINAL_SIGMA: char = 'ς';
const SIGMA: char = 'σ';

/// Canonicalize text for comparison.
///
/// Lower-cases, applies canonical decomposition (NFD), removes every
/// combining mark and folds `ς` into `σ`. The result is idempotent:
/// `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    // Lower-case before decomposing: some case mappings emit combining marks
    // (`İ` lowers to `i` + U+0307).
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == FINAL_SIGMA { SIGMA } else { c })
        .collect()
}
