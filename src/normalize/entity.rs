//! Legal-entity suffix canonicalization and name casing.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Canonical legal-entity tokens, kept verbatim by [`title_case`].
pub const LEGAL_TOKENS: &[&str] = &["BV", "LTD", "VOF"];

// "B.V.", "b v", "Bv", "Ltd.", "V.O.F." and friends. The trailing dot is
// consumed so "Acme B.V." does not keep a stray period.
static LEGAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(b\.?\s*v|ltd|v\.?\s*o\.?\s*f)\b\.?").expect("legal suffix regex compiles")
});

/// Rewrite legal-entity markers to a dotless uppercase token and title-case
/// every other word.
///
/// ```
/// use factuur::normalize::normalize_entity_name;
///
/// assert_eq!(normalize_entity_name("acme b.v."), "Acme BV");
/// assert_eq!(normalize_entity_name("DE KROEG v.o.f."), "De Kroeg VOF");
/// ```
pub fn normalize_entity_name(name: &str) -> String {
    let collapsed = LEGAL_SUFFIX.replace_all(name, |caps: &Captures| {
        caps[1]
            .chars()
            .filter(|c| *c != '.' && !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    });
    title_case(&collapsed)
}

/// Capitalize each whitespace-separated word, leaving [`LEGAL_TOKENS`] untouched.
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let core = word.trim_end_matches(|c: char| !c.is_alphanumeric());
            if LEGAL_TOKENS.contains(&core) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
