//! Engine configuration.
//!
//! [`EngineConfig::default`] carries the constants the consistency rules were
//! tuned with; change them only deliberately.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::money::{HIGH_VAT_RATE, LOW_VAT_RATE};

/// IBAN of the invoice recipient; it can never be a supplier's account.
pub const RECIPIENT_IBAN: &str = "NL85INGB0006814971";

/// Substring key mapped to a canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Lowercase substring to look for.
    pub key: String,
    /// Canonical replacement value.
    pub canonical: String,
}

impl Alias {
    pub fn new(key: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            key: key.into().to_lowercase(),
            canonical: canonical.into(),
        }
    }
}

/// Which alias wins when several keys occur in the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasPrecedence {
    /// Longest key first; equal lengths keep table order.
    #[default]
    LongestKey,
    /// First key in table order.
    TableOrder,
}

/// Tunables for the consistency engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Low VAT rate (9%).
    pub low_vat_rate: Decimal,
    /// High VAT rate (21%).
    pub high_vat_rate: Decimal,
    /// Relative tolerance on both sides of a tax pair before a warning is recorded.
    pub tax_pair_tolerance: Decimal,
    /// Absolute tolerance between a supplier's excl.-tax amount and its bases.
    pub excl_tax_tolerance: Decimal,
    /// Absolute tolerance between the aggregate excl.-tax amount and all supplier bases.
    pub aggregate_excl_tax_tolerance: Decimal,
    /// Absolute tolerance of the payable reconciliation.
    pub payable_tolerance: Decimal,
    /// Minimum similarity ratio for an approximate citation match.
    pub citation_similarity_threshold: f64,
    /// Width in words of the sliding citation window.
    pub citation_window_words: usize,
    /// Maximum distance between a number in the citation and the payable amount.
    pub amount_match_epsilon: Decimal,
    /// IBANs that must never be extracted as the issuer's.
    pub excluded_ibans: Vec<String>,
    /// Recipient name aliases.
    pub recipient_aliases: Vec<Alias>,
    /// Primary supplier name aliases.
    pub supplier_aliases: Vec<Alias>,
    /// How overlapping alias keys are resolved.
    pub alias_precedence: AliasPrecedence,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            low_vat_rate: LOW_VAT_RATE,
            high_vat_rate: HIGH_VAT_RATE,
            tax_pair_tolerance: dec!(0.01),
            excl_tax_tolerance: dec!(0.02),
            aggregate_excl_tax_tolerance: dec!(0.05),
            payable_tolerance: dec!(0.05),
            citation_similarity_threshold: 0.8,
            citation_window_words: 10,
            amount_match_epsilon: dec!(0.01),
            excluded_ibans: vec![RECIPIENT_IBAN.to_string()],
            recipient_aliases: default_recipient_aliases(),
            supplier_aliases: vec![Alias::new(
                "sligro",
                "Heineken Sligro Stichting Derdengelden",
            )],
            alias_precedence: AliasPrecedence::default(),
        }
    }
}

fn default_recipient_aliases() -> Vec<Alias> {
    [
        ("louisiana", "Louisiana Lobstershack BV"),
        ("lobstershack", "Louisiana Lobstershack BV"),
        ("step", "Step into Liquid BV"),
        ("fausto", "Fausto Albers"),
        ("albers", "Fausto Albers"),
        ("benedek", "Louisiana Lobstershack BV"),
        ("gaal", "Louisiana Lobstershack BV"),
        ("waitler", "Bar Bonds BV"),
        ("barbonds", "Bar Bonds BV"),
        ("bar bonds", "Bar Bonds BV"),
    ]
    .into_iter()
    .map(|(k, v)| Alias::new(k, v))
    .collect()
}
