use crate::core::ValueError;

use super::similarity::similarity_ratio;

/// How a citation was found in the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteMatch {
    /// Literal substring after whitespace collapsing.
    Verbatim,
    /// Closest document window scored at or above the threshold.
    Approximate {
        /// The matching window of document words.
        window: String,
        /// Similarity of the citation to that window.
        ratio: f64,
    },
}

/// Collapse every run of whitespace (including newlines) into one space and
/// trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Best-scoring window of `width` consecutive document words, compared
/// case-insensitively. Returns `None` for an empty document.
///
/// Windows start at every word; the last ones are shorter than `width`.
/// Only a strictly better score replaces the current best, so the earliest
/// window wins ties.
pub fn closest_window(citation: &str, document: &str, width: usize) -> Option<(String, f64)> {
    let needle = citation.to_lowercase();
    let words: Vec<&str> = document.split_whitespace().collect();
    let width = width.max(1);

    let mut best: Option<(String, f64)> = None;
    for start in 0..words.len() {
        let end = (start + width).min(words.len());
        let window = words[start..end].join(" ");
        let ratio = similarity_ratio(&needle, &window.to_lowercase());
        if best.as_ref().is_none_or(|(_, r)| ratio > *r) {
            best = Some((window, ratio));
        }
    }
    best
}

/// Confirm `citation` is a quote from `document`, literally or approximately.
pub fn locate_quote(
    citation: &str,
    document: &str,
    window_words: usize,
    threshold: f64,
) -> Result<QuoteMatch, ValueError> {
    let citation = collapse_whitespace(citation);
    let document = collapse_whitespace(document);

    if document.contains(&citation) {
        return Ok(QuoteMatch::Verbatim);
    }

    let (window, ratio) = closest_window(&citation, &document, window_words)
        .unwrap_or_else(|| (String::new(), 0.0));
    if ratio >= threshold {
        return Ok(QuoteMatch::Approximate { window, ratio });
    }

    Err(ValueError::new(
        "invalid_amount_payable_citation",
        "amount_payable_citation",
        format!(
            "You extracted '{citation}' as the amount payable citation.\n\
             This is not a direct quote from the document.\n\
             The citation must be an exact, direct quote from the document that clearly shows \
             the total amount payable.\n\
             If the citation spans multiple lines, include both lines in the citation.\n\
             The closest match found was: '{window}' (similarity {ratio:.2}).\n\
             Try extracting only the amount due without context, or a citation with more context."
        ),
    )
    .with_remedy("Copy the citation character for character from the document text."))
}
