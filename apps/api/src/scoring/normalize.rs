use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Anything that is not a word char, whitespace, or one of the technical symbols
/// kept in tokens like `c++`, `c#`, `node.js` and `3+ years`.
static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s+\-#.]").unwrap());

/// Canonicalizes raw document text before feature extraction.
///
/// Lower-cases, drops punctuation outside `{+, -, #, .}`, collapses whitespace
/// runs to a single space and trims. Total and idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let filtered = RE_DISALLOWED.replace_all(&lowered, " ");
    // Collapse after filtering: replaced punctuation can open new space runs.
    RE_WHITESPACE.replace_all(&filtered, " ").trim().to_string()
}
