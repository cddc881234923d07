use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::core::{ValueError, round2};

/// Number-like tokens: grouped thousands with an optional 1–2 digit
/// fraction, or a plain digit run with an optional fraction.
static NUMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:[.,\x20\x{a0}]\d{3})+(?:[.,]\d{1,2})?|\d+(?:[.,]\d{1,2})?")
        .expect("number token regex compiles")
});

/// How the payable amount was recognized in the citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountMatch {
    /// One of the formatted renderings of the amount occurs verbatim.
    Rendering,
    /// A number token in the citation is within epsilon of the amount.
    Token(Decimal),
}

/// Regular expressions for the ways an invoice may print `amount`.
///
/// Covers the plain decimal form, either decimal separator, thousands
/// groups separated by dot, comma, space or no-break space, and for whole
/// amounts the "1527,-" dash notation. The sign is ignored.
pub fn amount_renderings(amount: Decimal) -> Vec<String> {
    let exact = amount.abs().to_string();
    let mut rounded = round2(amount.abs());
    rounded.rescale(2);
    let fixed = rounded.to_string();
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut patterns = vec![
        regex::escape(&exact),
        format!(r"\b{int}[.,]{frac}\b"),
    ];

    let grouped = group_thousands(int);
    if grouped != int {
        patterns.push(format!(r"\b{grouped}[.,]{frac}\b"));
    }

    if frac == "00" {
        patterns.push(format!(r"\b{int}(?:[.,]-|-)"));
        if grouped != int {
            patterns.push(format!(r"\b{grouped}(?:[.,]-|-)"));
        }
    }

    patterns
}

// "1527" -> "1[., \x{a0}]527"
fn group_thousands(int: &str) -> String {
    let digits: Vec<char> = int.chars().collect();
    let head = digits.len() % 3;
    let mut out = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            out.push_str(r"[., \x{a0}]");
        }
        out.push(*c);
    }
    out
}

/// Every number-like token in `text`, normalized to a decimal.
///
/// When the last separator is followed by one or two digits it is the
/// decimal separator; every other dot, comma or space groups thousands.
pub fn number_tokens(text: &str) -> Vec<Decimal> {
    NUMBER_TOKEN
        .find_iter(text)
        .filter_map(|m| parse_token(m.as_str()))
        .collect()
}

fn parse_token(token: &str) -> Option<Decimal> {
    let is_sep = |c: char| matches!(c, '.' | ',' | ' ' | '\u{a0}');
    let (int, frac) = match token.rfind(['.', ',']) {
        Some(pos) if (2..=3).contains(&(token.len() - pos)) => {
            (&token[..pos], &token[pos + 1..])
        }
        _ => (token, ""),
    };
    let mut digits: String = int.chars().filter(|c| !is_sep(*c)).collect();
    if !frac.is_empty() {
        digits.push('.');
        digits.push_str(frac);
    }
    Decimal::from_str(&digits).ok()
}

// A rendering counts only when it spans a whole number token, so "527,87"
// is not found inside "1.527,87". A trailing dash form may extend the token.
fn rendering_found(citation: &str, amount: Decimal) -> bool {
    let patterns: Vec<Regex> = amount_renderings(amount)
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect();
    NUMBER_TOKEN.find_iter(citation).any(|token| {
        patterns.iter().any(|re| {
            re.find_at(citation, token.start()).is_some_and(|m| {
                m.start() == token.start()
                    && m.as_str().trim_end_matches(['-', ',', '.']).len() == token.len()
            })
        })
    })
}

/// Check that the citation shows the payable amount.
pub fn find_amount(
    citation: &str,
    amount: Decimal,
    epsilon: Decimal,
) -> Result<AmountMatch, ValueError> {
    if rendering_found(citation, amount) {
        return Ok(AmountMatch::Rendering);
    }

    let target = amount.abs();
    let tokens = number_tokens(citation);
    if let Some(hit) = tokens.iter().find(|t| (**t - target).abs() < epsilon) {
        return Ok(AmountMatch::Token(*hit));
    }

    let err = if tokens.is_empty() {
        ValueError::new(
            "amount_payable_not_found",
            "amount_payable",
            format!(
                "The amount payable '{amount}' was not found in the citation '{citation}'.\n\
                 The citation contains no number at all."
            ),
        )
    } else {
        let seen = tokens.iter().map(Decimal::to_string).collect::<Vec<_>>().join(", ");
        ValueError::new(
            "amount_payable_mismatch",
            "amount_payable",
            format!(
                "The amount payable '{amount}' does not match any number in the citation \
                 '{citation}'.\n\
                 Numbers found in the citation: {seen}."
            ),
        )
    };
    Err(err.with_remedy("Make sure the amount payable matches the citation exactly."))
}
