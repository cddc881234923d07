//! Field normalization: legal-entity suffixes, currency codes and known
//! recipient/supplier aliases.
//!
//! Every function here is a pure string transform. Input that matches no
//! rule passes through unchanged; nothing in this module fails.
//!
//! # Example
//!
//! ```
//! use factuur::core::EngineConfig;
//! use factuur::normalize::*;
//!
//! let config = EngineConfig::default();
//! assert_eq!(normalize_currency("euro"), "EUR");
//! assert_eq!(
//!     normalize_recipient("lobstershack amsterdam", &config),
//!     "Louisiana Lobstershack BV"
//! );
//! assert_eq!(
//!     normalize_primary_supplier("sligro zaandam b.v.", &config),
//!     "Heineken Sligro Stichting Derdengelden"
//! );
//! ```

mod alias;
mod entity;

pub use alias::resolve_alias;
pub use entity::{LEGAL_TOKENS, normalize_entity_name, title_case};

use crate::core::EngineConfig;

/// Rewrite the word "euro" to "EUR"; every other code passes through.
pub fn normalize_currency(code: &str) -> String {
    if code.trim().eq_ignore_ascii_case("euro") {
        "EUR".to_string()
    } else {
        code.to_string()
    }
}

/// Map a recipient onto its canonical name, or return it unchanged.
pub fn normalize_recipient(name: &str, config: &EngineConfig) -> String {
    resolve_alias(name, &config.recipient_aliases, config.alias_precedence)
        .map_or_else(|| name.to_string(), str::to_string)
}

/// Canonicalize the issuer name: legal suffixes and casing first, then the
/// supplier alias table.
pub fn normalize_primary_supplier(name: &str, config: &EngineConfig) -> String {
    let cleaned = normalize_entity_name(name);
    resolve_alias(&cleaned, &config.supplier_aliases, config.alias_precedence)
        .map_or(cleaned, str::to_string)
}
