//! Tax pair resolution per supplier.
//!
//! For each VAT tier (9% and 21%) a supplier's base and tax are
//! cross-checked or the missing one inferred. Out-of-tolerance pairs are a
//! soft failure: the warning is appended to the supplier's rationale and
//! processing continues. The null (0%) base is never taxed.

mod pair;

pub use pair::{PairOutcome, RateMismatch, TaxPair, resolve_pair};

use log::warn;
use rust_decimal::Decimal;

use crate::core::{EngineConfig, SupplierLedger, ValueError, round2};

/// The two taxed VAT tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VatTier {
    /// 9%.
    Low,
    /// 21%.
    High,
}

impl VatTier {
    pub const ALL: [VatTier; 2] = [VatTier::Low, VatTier::High];

    /// Field prefix in the candidate schema ("low" / "high").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }

    pub fn rate(&self, config: &EngineConfig) -> Decimal {
        match self {
            Self::Low => config.low_vat_rate,
            Self::High => config.high_vat_rate,
        }
    }

    fn pair(&self, ledger: &SupplierLedger) -> TaxPair {
        match self {
            Self::Low => TaxPair::new(ledger.low_tax_base, ledger.low_tax),
            Self::High => TaxPair::new(ledger.high_tax_base, ledger.high_tax),
        }
    }

    fn with_pair(&self, mut ledger: SupplierLedger, pair: TaxPair) -> SupplierLedger {
        match self {
            Self::Low => {
                ledger.low_tax_base = pair.base;
                ledger.low_tax = pair.tax;
            }
            Self::High => {
                ledger.high_tax_base = pair.base;
                ledger.high_tax = pair.tax;
            }
        }
        ledger
    }
}

/// A resolved ledger plus the soft warnings raised while resolving it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerResolution {
    pub ledger: SupplierLedger,
    pub mismatches: Vec<(VatTier, RateMismatch)>,
}

/// Resolve both taxed tiers of a supplier ledger.
///
/// Inferred members are filled in; mismatch warnings are appended to the
/// rationale of the returned ledger.
pub fn resolve_ledger(ledger: &SupplierLedger, config: &EngineConfig) -> LedgerResolution {
    let mut resolved = ledger.clone();
    let mut mismatches = Vec::new();

    for tier in VatTier::ALL {
        let (pair, outcome) = resolve_pair(
            tier.pair(&resolved),
            tier.rate(config),
            config.tax_pair_tolerance,
        );
        resolved = tier.with_pair(resolved, pair);
        if let PairOutcome::Mismatch(mismatch) = outcome {
            let warning = mismatch.warning(tier.name());
            warn!("{warning}");
            resolved = resolved.with_note(&warning);
            mismatches.push((tier, mismatch));
        }
    }

    LedgerResolution {
        ledger: resolved,
        mismatches,
    }
}

/// Derive or check the supplier's amount excluding tax against its bases.
///
/// Absent: set to `round2(null + low + high base)` when that sum is
/// positive. Present: must be within `tolerance` of the base sum whenever the
/// sum is positive.
pub fn settle_excl_tax(
    ledger: SupplierLedger,
    index: usize,
    tolerance: Decimal,
) -> Result<SupplierLedger, ValueError> {
    let bases = ledger.base_total();
    match ledger.amount_excl_tax {
        None if bases > Decimal::ZERO => Ok(SupplierLedger {
            amount_excl_tax: Some(round2(bases)),
            ..ledger
        }),
        Some(declared) if bases > Decimal::ZERO && (declared - bases).abs() > tolerance => {
            Err(ValueError::new(
                "invalid_amount_excl_tax",
                format!("suppliers[{index}].amount_excl_tax"),
                format!(
                    "The amount excluding tax ({declared}) of supplier {} does not match \
                     the sum of tax bases ({bases}).",
                    ledger.label(index)
                ),
            )
            .with_remedy(
                "The amount excluding tax is the sum of the null, low and high tax bases.",
            ))
        }
        _ => Ok(ledger),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SupplierLedgerBuilder;
    use rust_decimal_macros::dec;

    #[test]
    fn infers_both_tiers() {
        let ledger = SupplierLedgerBuilder::new()
            .low_base(dec!(100))
            .high_tax(dec!(21))
            .build();
        let out = resolve_ledger(&ledger, &EngineConfig::default());
        assert_eq!(out.ledger.low_tax, Some(dec!(9.00)));
        assert_eq!(out.ledger.high_tax_base, Some(dec!(100.00)));
        assert!(out.mismatches.is_empty());
        assert_eq!(out.ledger.rationale, None);
    }

    #[test]
    fn mismatch_appends_to_rationale() {
        let ledger = SupplierLedgerBuilder::new()
            .high(dec!(100), dec!(9))
            .rationale("Single supplier.")
            .build();
        let out = resolve_ledger(&ledger, &EngineConfig::default());
        assert_eq!(out.mismatches.len(), 1);
        assert_eq!(out.mismatches[0].0, VatTier::High);
        let rationale = out.ledger.rationale.unwrap();
        assert!(rationale.starts_with("Single supplier.\nWARNING: Possible error on invoice."));
        // Values are kept as extracted.
        assert_eq!(out.ledger.high_tax, Some(dec!(9)));
    }

    #[test]
    fn null_base_untaxed() {
        let ledger = SupplierLedgerBuilder::new().null_base(dec!(50)).build();
        let out = resolve_ledger(&ledger, &EngineConfig::default());
        assert_eq!(out.ledger, ledger);
    }

    #[test]
    fn excl_tax_derived() {
        let ledger = SupplierLedgerBuilder::new()
            .null_base(dec!(10))
            .low(dec!(89.55), dec!(8.05))
            .build();
        let settled = settle_excl_tax(ledger, 0, dec!(0.02)).unwrap();
        assert_eq!(settled.amount_excl_tax, Some(dec!(99.55)));
    }

    #[test]
    fn excl_tax_not_derived_from_zero_bases() {
        let ledger = SupplierLedgerBuilder::new().low(dec!(0), dec!(0)).build();
        let settled = settle_excl_tax(ledger, 0, dec!(0.02)).unwrap();
        assert_eq!(settled.amount_excl_tax, None);
    }

    #[test]
    fn excl_tax_mismatch() {
        let ledger = SupplierLedgerBuilder::new()
            .name("Acme BV")
            .low(dec!(89.55), dec!(8.05))
            .amount_excl_tax(dec!(97.60))
            .build();
        let err = settle_excl_tax(ledger, 2, dec!(0.02)).unwrap_err();
        assert_eq!(err.id, "invalid_amount_excl_tax");
        assert_eq!(err.field, "suppliers[2].amount_excl_tax");
        assert!(err.detail.contains("'Acme BV'"));
    }

    #[test]
    fn excl_tax_within_tolerance() {
        let ledger = SupplierLedgerBuilder::new()
            .low(dec!(89.55), dec!(8.05))
            .amount_excl_tax(dec!(89.57))
            .build();
        assert!(settle_excl_tax(ledger, 0, dec!(0.02)).is_ok());
    }
}
