//! Citation verification.
//!
//! The generator must back its payable amount with a verbatim excerpt of the
//! source document. Verification has two independent parts:
//!
//! 1. the citation is a quote from the document: a literal match after
//!    whitespace collapsing, or failing that a sliding-window approximate
//!    match scored with a Ratcliff/Obershelp similarity ratio;
//! 2. the payable amount is recoverable from the citation, under the
//!    number formats Dutch and international invoices print.
//!
//! # Example
//!
//! ```
//! use factuur::citation::verify_citation;
//! use factuur::core::EngineConfig;
//! use rust_decimal_macros::dec;
//!
//! let document = "Subtotaal 89,55\nBTW 9% 8,05\nTotaal €  97,55";
//! let found = verify_citation("Totaal €  97,55", document, dec!(97.55), &EngineConfig::default());
//! assert!(found.is_ok());
//! ```

mod amount;
mod quote;
mod similarity;

pub use amount::{AmountMatch, amount_renderings, find_amount, number_tokens};
pub use quote::{QuoteMatch, closest_window, collapse_whitespace, locate_quote};
pub use similarity::similarity_ratio;

use rust_decimal::Decimal;

use crate::core::{EngineConfig, ValueError};

/// Outcome of a successful [`verify_citation`].
#[derive(Debug, Clone, PartialEq)]
pub struct CitationMatch {
    pub quote: QuoteMatch,
    pub amount: AmountMatch,
}

/// Verify that `citation` quotes `document` and shows `amount`.
///
/// The quote is checked first; its failure is reported even if the amount
/// would not have been found either.
pub fn verify_citation(
    citation: &str,
    document: &str,
    amount: Decimal,
    config: &EngineConfig,
) -> Result<CitationMatch, ValueError> {
    let quote = locate_quote(
        citation,
        document,
        config.citation_window_words,
        config.citation_similarity_threshold,
    )?;
    let amount = find_amount(citation, amount, config.amount_match_epsilon)?;
    Ok(CitationMatch { quote, amount })
}
