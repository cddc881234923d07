//! Amount reconciliation.
//!
//! The declared payable amount must be explained by one of four candidate
//! sums built from the resolved supplier ledgers:
//!
//! | Tier | Sum |
//! |------|-----|
//! | A | bases + taxes |
//! | B | A + packaging deposit |
//! | C | A + adjustment (discount, credit, deduction) |
//! | D | A + packaging deposit + adjustment |
//!
//! Tiers are tried in order and the first within tolerance wins. A failure
//! carries every candidate and every contributing input, so a retrying
//! generator sees the whole computation.

mod tier;

pub use tier::{PayableSlots, Tier};

use rust_decimal::Decimal;

use crate::core::money::show;
use crate::core::{InvoiceRecord, SupplierLedger, ValueError, round2};

/// Successful reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// First tier within tolerance.
    pub tier: Tier,
    /// Its candidate sum.
    pub sum: Decimal,
    /// `|sum - amount_payable|`.
    pub difference: Decimal,
}

/// Reject any negative financial field on any supplier.
pub fn check_non_negative(suppliers: &[SupplierLedger]) -> Result<(), ValueError> {
    for (index, supplier) in suppliers.iter().enumerate() {
        for (field, value) in supplier.amounts() {
            if let Some(v) = value.filter(|v| *v < Decimal::ZERO) {
                return Err(ValueError::new(
                    "negative_amount",
                    format!("suppliers[{index}].{field}"),
                    format!(
                        "{field} for supplier {} cannot be negative (got {v}).\n\
                         Tax bases and taxes are always recorded as positive amounts; \
                         discounts and deposit refunds belong in the adjustment or the \
                         packaging deposit.",
                        supplier.label(index)
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// `round2(Σ bases + Σ taxes)` over all suppliers.
pub fn base_amount(suppliers: &[SupplierLedger]) -> Decimal {
    round2(
        suppliers
            .iter()
            .map(|s| s.base_total() + s.tax_total())
            .sum(),
    )
}

/// When the record declares an aggregate amount excluding tax, it must be
/// within `tolerance` of the sum of all supplier bases.
pub fn check_aggregate_excl_tax(
    record: &InvoiceRecord,
    tolerance: Decimal,
) -> Result<(), ValueError> {
    let Some(declared) = record.amount_excl_tax else {
        return Ok(());
    };
    let expected: Decimal = record.suppliers.iter().map(SupplierLedger::base_total).sum();
    let difference = (declared - expected).abs();
    if difference <= tolerance {
        return Ok(());
    }

    let total = |pick: fn(&SupplierLedger) -> Option<Decimal>| -> Decimal {
        record.suppliers.iter().filter_map(pick).sum()
    };
    Err(ValueError::new(
        "amount_excl_tax_mismatch",
        "amount_excl_tax",
        format!(
            "The amount_excl_tax ({declared}) does not match the expected value ({expected}).\n\
             This was calculated by summing up the low_tax_base {}, high_tax_base {} and \
             null_tax_base {} for the supplier(s).\n\
             The difference ({difference}) exceeds the allowed tolerance of {tolerance}.\n\
             Common mistakes include mixing up packaging costs, null_tax_base or discounts.",
            total(|s| s.low_tax_base),
            total(|s| s.high_tax_base),
            total(|s| s.null_tax_base),
        ),
    )
    .with_remedy(
        "Recompute amount_excl_tax as the sum of all tax bases, excluding deposits and discounts.",
    ))
}

/// Find the first tier whose sum is within `tolerance` of the payable amount.
pub fn reconcile(
    record: &InvoiceRecord,
    tolerance: Decimal,
) -> Result<Reconciliation, ValueError> {
    let base = base_amount(&record.suppliers);
    let slots = PayableSlots::new(record.packaging_deposit, record.adjustment.as_ref());
    let payable = record.amount_payable;

    let candidates: Vec<(Tier, Option<Decimal>)> = Tier::ORDER
        .iter()
        .map(|tier| (*tier, slots.candidate(*tier, base)))
        .collect();

    let matched = candidates.iter().find_map(|(tier, sum)| {
        let sum = (*sum)?;
        let difference = (sum - payable).abs();
        (difference <= tolerance).then_some(Reconciliation {
            tier: *tier,
            sum,
            difference,
        })
    });

    matched.ok_or_else(|| reconciliation_failure(record, &candidates, slots, tolerance))
}

fn reconciliation_failure(
    record: &InvoiceRecord,
    candidates: &[(Tier, Option<Decimal>)],
    slots: PayableSlots,
    tolerance: Decimal,
) -> ValueError {
    let payable = record.amount_payable;
    let mut lines = vec![format!(
        "The amount payable found was {payable}, and it is not explained by any of the \
         candidate sums."
    )];

    lines.extend(candidates.iter().map(|(tier, sum)| match sum {
        Some(sum) => format!(
            "Validation_{} '{}' got: {sum}, difference: {}.",
            tier.letter(),
            tier.description(),
            (*sum - payable).abs()
        ),
        None => format!(
            "Validation_{} '{}' got: n/a, a required amount is not specified.",
            tier.letter(),
            tier.description()
        ),
    }));
    lines.push(format!(
        "At least one of the differences has to be within the tolerance of {tolerance} \
         to pass the validation."
    ));

    lines.push("The values extracted in the last attempt were:".to_string());
    lines.extend(record.suppliers.iter().enumerate().map(|(index, s)| {
        format!(
            "  - supplier {}: null_tax_base {}, low_tax_base {}, low_tax {}, \
             high_tax_base {}, high_tax {}",
            s.label(index),
            show(s.null_tax_base),
            show(s.low_tax_base),
            show(s.low_tax),
            show(s.high_tax_base),
            show(s.high_tax),
        )
    }));
    lines.push(format!("  - amount_payable: {payable}"));
    for (name, value) in [
        ("null_tax_base", record.null_tax_base),
        ("low_tax_base", record.low_tax_base),
        ("high_tax_base", record.high_tax_base),
        ("amount_excl_tax", record.amount_excl_tax),
        ("low_tax", record.low_tax),
        ("high_tax", record.high_tax),
        ("packaging deposit", record.packaging_deposit),
    ] {
        lines.push(format!("  - {name}: {}", show(value)));
    }
    lines.push(match &record.adjustment {
        Some(adj) => format!("  - adjustment: {} ({})", adj.amount, adj.kind.as_str()),
        None => "  - adjustment: not specified".to_string(),
    });
    lines.push(format!(
        "  - deposit used in the sums: {}, adjustment used in the sums: {}",
        show(slots.deposit),
        show(slots.adjustment)
    ));
    let detail = lines.join("\n");

    ValueError::new("amount_reconciliation_failed", "amount_payable", detail).with_remedy(
        "Check the tax bases, taxes, packaging deposit and adjustment against the invoice totals.",
    )
}
